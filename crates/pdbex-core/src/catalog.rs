//! # Catalog
//!
//! Name lookup over the named aggregates of a [`TypeStore`].
//!
//! The catalog indexes every concrete struct, union and enum by name.
//! Forward references are never indexed: a dump must always reach the record
//! that carries the field list.
//!
//! ## Name Collisions
//!
//! C keeps struct, union and enum tags in one namespace, so a name declared
//! under two kinds is ambiguous. The first record seen (lowest index) wins and
//! the name is recorded in [`Catalog::collisions`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::index::TypeIndex;
use crate::records::TypeRecord;
use crate::store::TypeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind
{
    Struct,
    Union,
    Enum,
}

impl fmt::Display for AggregateKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            AggregateKind::Struct => "struct",
            AggregateKind::Union => "union",
            AggregateKind::Enum => "enum",
        };
        write!(f, "{label}")
    }
}

/// Result of a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry
{
    /// The name actually matched, which may differ from the query by a leading underscore.
    pub name: String,
    pub kind: AggregateKind,
    pub index: TypeIndex,
}

/// Number of catalogued names per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogCounts
{
    pub structs: usize,
    pub unions: usize,
    pub enums: usize,
}

impl fmt::Display for CatalogCounts
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} structs, {} unions, {} enums", self.structs, self.unions, self.enums)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog
{
    structs: HashMap<String, TypeIndex>,
    unions: HashMap<String, TypeIndex>,
    enums: HashMap<String, TypeIndex>,
    by_name: HashMap<String, (AggregateKind, TypeIndex)>,
    collisions: BTreeSet<String>,
}

impl Catalog
{
    /// Index all named, concrete aggregates of `store`.
    pub fn build(store: &TypeStore) -> Self
    {
        let mut catalog = Catalog::default();

        for (index, record) in store.iter() {
            let kind = match record {
                TypeRecord::Structure(_) => AggregateKind::Struct,
                TypeRecord::Union(_) => AggregateKind::Union,
                TypeRecord::Enum(_) => AggregateKind::Enum,
                _ => continue,
            };
            if record.is_forward_reference() {
                continue;
            }
            let Some(name) = record.name() else {
                continue;
            };
            // compiler-generated tags such as <unnamed-tag>
            if name.starts_with('<') {
                continue;
            }
            catalog.add(name, kind, index);
        }

        tracing::debug!(
            counts = %catalog.counts(),
            collisions = catalog.collisions.len(),
            "built type catalog"
        );
        catalog
    }

    fn add(&mut self, name: &str, kind: AggregateKind, index: TypeIndex)
    {
        let map = match kind {
            AggregateKind::Struct => &mut self.structs,
            AggregateKind::Union => &mut self.unions,
            AggregateKind::Enum => &mut self.enums,
        };
        map.entry(name.to_string()).or_insert(index);

        match self.by_name.get(name).copied() {
            None => {
                self.by_name.insert(name.to_string(), (kind, index));
            }
            Some((first_kind, first_index)) if first_kind != kind => {
                if self.collisions.insert(name.to_string()) {
                    tracing::warn!(
                        name,
                        kept = %first_kind,
                        kept_index = %first_index,
                        ignored = %kind,
                        ignored_index = %index,
                        "name declared as more than one kind of type"
                    );
                }
            }
            Some(_) => {}
        }
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<(AggregateKind, TypeIndex)>
    {
        self.by_name.get(name).copied()
    }

    /// Look up `name`, retrying once with a leading underscore toggled.
    ///
    /// `FOO` finds `_FOO` and `_FOO` finds `FOO` when the exact name is absent.
    pub fn lookup(&self, name: &str) -> Option<CatalogEntry>
    {
        let alternate = match name.strip_prefix('_') {
            Some(stripped) => stripped.to_string(),
            None => format!("_{name}"),
        };

        for candidate in [name, alternate.as_str()] {
            if let Some((kind, index)) = self.get(candidate) {
                return Some(CatalogEntry {
                    name: candidate.to_string(),
                    kind,
                    index,
                });
            }
        }
        None
    }

    /// All catalogued names, sorted and deduplicated.
    pub fn list_all(&self) -> Vec<String>
    {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Case-insensitive substring filter over [`Catalog::list_all`].
    pub fn search(&self, query: &str) -> Vec<String>
    {
        let query = query.to_uppercase();
        self.list_all()
            .into_iter()
            .filter(|name| name.to_uppercase().contains(&query))
            .collect()
    }

    /// Names declared under more than one kind, sorted.
    pub fn collisions(&self) -> impl Iterator<Item = &str>
    {
        self.collisions.iter().map(String::as_str)
    }

    pub fn counts(&self) -> CatalogCounts
    {
        CatalogCounts {
            structs: self.structs.len(),
            unions: self.unions.len(),
            enums: self.enums.len(),
        }
    }

    /// Index of the concrete record named `name` of `kind`.
    pub fn index_of(&self, kind: AggregateKind, name: &str) -> Option<TypeIndex>
    {
        let map = match kind {
            AggregateKind::Struct => &self.structs,
            AggregateKind::Union => &self.unions,
            AggregateKind::Enum => &self.enums,
        };
        map.get(name).copied()
    }

    pub fn len(&self) -> usize
    {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.by_name.is_empty()
    }
}

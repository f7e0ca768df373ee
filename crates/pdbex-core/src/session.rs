//! # Dump Session
//!
//! Name-driven dumping of declarations.
//!
//! A session owns the per-file mutable state: the [`Resolver`] cache and the
//! set of declarations already printed. Each session belongs to one loaded
//! file; open a new one per file (or per thread) instead of sharing it.

use std::collections::HashSet;
use std::fmt;

use crate::catalog::Catalog;
use crate::dependencies::DependencyWalker;
use crate::diagnostics::Diagnostics;
use crate::format::format_declaration;
use crate::index::TypeIndex;
use crate::resolver::Resolver;
use crate::store::TypeStore;

/// Result of dumping one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpOutcome
{
    /// Declarations, dependencies first, separated by blank lines.
    Found(String),
    /// The name (with and without a leading underscore) is not catalogued.
    NotFound(String),
}

impl DumpOutcome
{
    pub fn is_found(&self) -> bool
    {
        matches!(self, DumpOutcome::Found(_))
    }
}

impl fmt::Display for DumpOutcome
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            DumpOutcome::Found(text) => write!(f, "{text}"),
            DumpOutcome::NotFound(name) => writeln!(f, "/* '{name}' not found */"),
        }
    }
}

pub struct DumpSession<'s>
{
    store: &'s TypeStore,
    catalog: &'s Catalog,
    resolver: Resolver<'s>,
    printed: HashSet<TypeIndex>,
}

impl<'s> DumpSession<'s>
{
    pub fn new(store: &'s TypeStore, catalog: &'s Catalog) -> Self
    {
        Self {
            store,
            catalog,
            resolver: Resolver::new(store),
            printed: HashSet::new(),
        }
    }

    /// Dump the declaration named `name`.
    ///
    /// With `inline`, every aggregate the target embeds by value is emitted
    /// first, each at most once per session.
    pub fn dump_by_name(&mut self, name: &str, inline: bool) -> DumpOutcome
    {
        let Some(entry) = self.catalog.lookup(name) else {
            tracing::debug!(name, "type not found in catalog");
            return DumpOutcome::NotFound(name.to_string());
        };

        let mut blocks = Vec::new();
        if inline {
            let dependencies = DependencyWalker::new(self.store, self.catalog).dependencies(entry.index);
            for dependency in dependencies {
                if !self.printed.insert(dependency) {
                    continue;
                }
                let text = self.format(dependency);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }

        let text = self.format(entry.index);
        if !text.is_empty() {
            blocks.push(text);
        }
        self.printed.insert(entry.index);

        DumpOutcome::Found(blocks.join("\n"))
    }

    /// Declarations of every catalogued name, in sorted name order.
    pub fn dump_all(&mut self) -> Vec<String>
    {
        let names = self.catalog.list_all();
        let mut declarations = Vec::with_capacity(names.len());
        for name in names {
            match self.dump_by_name(&name, false) {
                DumpOutcome::Found(text) if !text.is_empty() => declarations.push(text),
                _ => {}
            }
        }
        declarations
    }

    /// Format a single index with this session's resolver.
    pub fn format(&mut self, index: TypeIndex) -> String
    {
        format_declaration(&mut self.resolver, index)
    }

    /// The session's resolver, sharing its cache and diagnostics.
    pub fn resolver(&mut self) -> &mut Resolver<'s>
    {
        &mut self.resolver
    }

    /// Placeholders emitted by this session so far.
    pub fn diagnostics(&self) -> &Diagnostics
    {
        self.resolver.diagnostics()
    }

    /// Whether `index` has been emitted by this session.
    pub fn is_printed(&self, index: TypeIndex) -> bool
    {
        self.printed.contains(&index)
    }
}

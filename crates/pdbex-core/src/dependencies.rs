//! # Dependency Walker
//!
//! Orders the aggregates a declaration needs before it can be emitted.
//!
//! A struct that embeds another struct by value can only be declared after
//! it. Pointers are different: `struct X *` needs no complete type, so pointer
//! members never create a dependency, which is also what breaks the cycles of
//! self-referential lists and trees.
//!
//! ## Ordering
//!
//! Depth-first post-order: every dependency appears before the aggregate that
//! needs it. The starting index itself is never part of the result; callers
//! emit it last.

use std::collections::HashSet;

use crate::catalog::{AggregateKind, Catalog};
use crate::index::TypeIndex;
use crate::records::{Field, TypeRecord};
use crate::store::TypeStore;

/// Maximum number of array/modifier layers peeled off a member type.
const MAX_TYPE_REF_DEPTH: usize = 32;

pub struct DependencyWalker<'a>
{
    store: &'a TypeStore,
    catalog: &'a Catalog,
}

impl<'a> DependencyWalker<'a>
{
    pub fn new(store: &'a TypeStore, catalog: &'a Catalog) -> Self
    {
        Self { store, catalog }
    }

    /// Aggregates `index` embeds by value, dependencies first.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pdbex_core::catalog::Catalog;
    /// use pdbex_core::dependencies::DependencyWalker;
    /// use pdbex_core::records::{AggregateRecord, Field, TypeRecord};
    /// use pdbex_core::store::TypeStore;
    /// use pdbex_core::TypeIndex;
    ///
    /// let store = TypeStore::from_records([
    ///     (TypeIndex::new(0x1000), TypeRecord::Structure(AggregateRecord::new("_INNER", 4, None))),
    ///     (TypeIndex::new(0x1001), TypeRecord::field_list(vec![Field::member("Inner", TypeIndex::new(0x1000), 0)])),
    ///     (TypeIndex::new(0x1002), TypeRecord::Structure(AggregateRecord::new("_OUTER", 4, Some(TypeIndex::new(0x1001))))),
    /// ]);
    /// let catalog = Catalog::build(&store);
    ///
    /// let walker = DependencyWalker::new(&store, &catalog);
    /// assert_eq!(walker.dependencies(TypeIndex::new(0x1002)), vec![TypeIndex::new(0x1000)]);
    /// ```
    pub fn dependencies(&self, index: TypeIndex) -> Vec<TypeIndex>
    {
        let mut visited = HashSet::new();
        let mut ordered = Vec::new();
        self.walk(index, &mut visited, &mut ordered);
        ordered
    }

    fn walk(&self, index: TypeIndex, visited: &mut HashSet<TypeIndex>, ordered: &mut Vec<TypeIndex>)
    {
        if !visited.insert(index) {
            return;
        }

        let fields = match self.store.get(index) {
            Some(TypeRecord::Structure(record) | TypeRecord::Union(record)) => self.store.fields(record.fields),
            _ => return,
        };

        for field in fields {
            let Field::Member { field_type, .. } = field else {
                continue;
            };
            let Some(dependency) = self.member_dependency(*field_type, 0) else {
                continue;
            };
            if visited.contains(&dependency) {
                continue;
            }
            self.walk(dependency, visited, ordered);
            ordered.push(dependency);
        }
    }

    /// The aggregate a member of type `index` embeds by value, if any.
    fn member_dependency(&self, index: TypeIndex, depth: usize) -> Option<TypeIndex>
    {
        if depth > MAX_TYPE_REF_DEPTH || index.is_primitive() {
            return None;
        }

        let record = self.store.get(index)?;
        let kind = match record {
            TypeRecord::Structure(_) => AggregateKind::Struct,
            TypeRecord::Union(_) => AggregateKind::Union,
            TypeRecord::Enum(_) => AggregateKind::Enum,
            TypeRecord::Array { element, .. } => return self.member_dependency(*element, depth + 1),
            TypeRecord::Modifier { underlying, .. } => return self.member_dependency(*underlying, depth + 1),
            _ => return None,
        };

        if !record.is_forward_reference() {
            return Some(index);
        }

        let name = record.name()?;
        let concrete = self
            .catalog
            .index_of(kind, name)
            .or_else(|| self.catalog.get(name).map(|(_, index)| index));
        if concrete.is_none() {
            tracing::debug!(%index, name, "forward reference without definition dropped from dependencies");
        }
        concrete
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::records::AggregateRecord;

    #[test]
    fn test_pointer_members_do_not_contribute()
    {
        let store = TypeStore::from_records([
            (TypeIndex::new(0x1000), TypeRecord::Structure(AggregateRecord::new("_OTHER", 4, None))),
            (TypeIndex::new(0x1001), TypeRecord::pointer(TypeIndex::new(0x1000))),
            (
                TypeIndex::new(0x1002),
                TypeRecord::field_list(vec![Field::member("Other", TypeIndex::new(0x1001), 0)]),
            ),
            (
                TypeIndex::new(0x1003),
                TypeRecord::Structure(AggregateRecord::new("_HOLDER", 8, Some(TypeIndex::new(0x1002)))),
            ),
        ]);
        let catalog = Catalog::build(&store);
        let walker = DependencyWalker::new(&store, &catalog);
        assert!(walker.dependencies(TypeIndex::new(0x1003)).is_empty());
    }

    #[test]
    fn test_unresolvable_forward_reference_is_dropped()
    {
        let store = TypeStore::from_records([
            (TypeIndex::new(0x1000), TypeRecord::Structure(AggregateRecord::forward("_OPAQUE"))),
            (
                TypeIndex::new(0x1001),
                TypeRecord::field_list(vec![Field::member("Opaque", TypeIndex::new(0x1000), 0)]),
            ),
            (
                TypeIndex::new(0x1002),
                TypeRecord::Structure(AggregateRecord::new("_HOLDER", 8, Some(TypeIndex::new(0x1001)))),
            ),
        ]);
        let catalog = Catalog::build(&store);
        let walker = DependencyWalker::new(&store, &catalog);
        assert!(walker.dependencies(TypeIndex::new(0x1002)).is_empty());
    }

    #[test]
    fn test_non_aggregate_start_has_no_dependencies()
    {
        let store = TypeStore::from_records([(TypeIndex::new(0x1000), TypeRecord::pointer(TypeIndex::new(0x74)))]);
        let catalog = Catalog::build(&store);
        let walker = DependencyWalker::new(&store, &catalog);
        assert!(walker.dependencies(TypeIndex::new(0x1000)).is_empty());
        assert!(walker.dependencies(TypeIndex::new(0x74)).is_empty());
    }
}

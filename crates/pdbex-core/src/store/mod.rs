//! # Type Record Store
//!
//! Immutable index→record map built once per symbol file.
//!
//! The store is populated either by the PDB loader ([`TypeStore::open`]) or
//! directly from records ([`TypeStore::from_records`]), which is how the
//! engine is exercised without a PDB on disk.
//!
//! ## Usage
//!
//! ```rust
//! use pdbex_core::records::{AggregateRecord, Field, TypeRecord};
//! use pdbex_core::store::TypeStore;
//! use pdbex_core::TypeIndex;
//!
//! let store = TypeStore::from_records([
//!     (TypeIndex::new(0x1000), TypeRecord::field_list(vec![Field::member("Value", TypeIndex::new(0x74), 0)])),
//!     (TypeIndex::new(0x1001), TypeRecord::Structure(AggregateRecord::new("_BOX", 4, Some(TypeIndex::new(0x1000))))),
//! ]);
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.fields(Some(TypeIndex::new(0x1000))).len(), 1);
//! ```

mod loader;

use std::collections::{BTreeMap, HashSet};

use crate::index::TypeIndex;
use crate::records::{Field, TypeRecord};

/// Decoded type stream of one symbol file.
///
/// Records are kept in index order, which is the order the compiler emitted
/// them. Primitive indices are never stored here.
#[derive(Debug, Clone, Default)]
pub struct TypeStore
{
    records: BTreeMap<TypeIndex, TypeRecord>,
}

impl TypeStore
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Build a store from `(index, record)` pairs. Primitive indices are ignored.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (TypeIndex, TypeRecord)>,
    {
        let mut store = Self::new();
        for (index, record) in records {
            store.insert(index, record);
        }
        store
    }

    /// Insert a record, replacing any previous record at `index`.
    pub fn insert(&mut self, index: TypeIndex, record: TypeRecord)
    {
        if index.is_primitive() {
            tracing::debug!(%index, "ignoring record at primitive index");
            return;
        }
        self.records.insert(index, record);
    }

    /// Look up a record. Always `None` for primitive indices.
    pub fn get(&self, index: TypeIndex) -> Option<&TypeRecord>
    {
        if index.is_primitive() {
            return None;
        }
        self.records.get(&index)
    }

    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    /// All records in index order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeIndex, &TypeRecord)>
    {
        self.records.iter().map(|(index, record)| (*index, record))
    }

    /// Entries of the field list at `index`, following `LF_INDEX` continuations.
    ///
    /// Missing or non-field-list records yield an empty list.
    pub fn fields(&self, index: Option<TypeIndex>) -> Vec<&Field>
    {
        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        let mut next = index;

        while let Some(current) = next {
            if !seen.insert(current) {
                tracing::debug!(index = %current, "field list continuation loops back");
                break;
            }
            match self.get(current) {
                Some(TypeRecord::FieldList {
                    fields: entries,
                    continuation,
                }) => {
                    fields.extend(entries.iter());
                    next = *continuation;
                }
                _ => break,
            }
        }

        fields
    }

    /// Argument types of the argument list at `index`.
    pub fn arguments(&self, index: Option<TypeIndex>) -> &[TypeIndex]
    {
        match index.and_then(|index| self.get(index)) {
            Some(TypeRecord::ArgumentList(arguments)) => arguments,
            _ => &[],
        }
    }
}

//! # Type Resolver
//!
//! Turns a type index into C text.
//!
//! Resolution is recursive (a pointer resolves its pointee, an array its
//! element) and memoized per `(index, context)` for the lifetime of one
//! [`Resolver`]. It never fails: missing records, unsupported kinds and
//! self-referential chains all render as comment placeholders and are filed in
//! [`Diagnostics`].
//!
//! ## Rendering Rules
//!
//! | record              | spelling                        | suffix          |
//! |---------------------|---------------------------------|-----------------|
//! | primitive           | base type table                 |                 |
//! | pointer             | `<pointee> *` / `<pointee> * const` | pointee's  |
//! | array               | element                         | `[n]`           |
//! | modifier            | `const volatile <inner>`        | inner's         |
//! | bitfield            | base integer                    | ` : <width>`    |
//! | struct/union/enum   | `struct <name>`                 |                 |
//! | procedure           | `/* func: <ret> (*)(<args>) */` |                 |
//! | missing record      | `/* 0x<index> */`               |                 |
//! | anything else       | `/* LF_<kind> */`               |                 |

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::base_types::base_type;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::index::{ResolvedType, TypeIndex};
use crate::records::{ProcedureRecord, TypeRecord};
use crate::store::TypeStore;

/// Maximum number of modifier/array/bitfield links followed when sizing a type.
const MAX_TYPE_REF_DEPTH: usize = 32;

/// Size of every pointer record. Type streams handled here are 64-bit.
const POINTER_SIZE: u64 = 8;

/// Enums without an underlying type are `int` sized.
const DEFAULT_ENUM_SIZE: u64 = 4;

/// Prefix of a rendered function pointer.
///
/// Function types render as an annotation rather than a composable type, so
/// pointers over them pass the annotation through unchanged.
pub const FUNCTION_PREFIX: &str = "/* func:";

/// Where a type is being rendered. Part of the memoization key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolveContext
{
    /// Member, static member or base class declaration.
    #[default]
    Declaration,
    /// Entry of a function argument list.
    Argument,
}

/// Memoizing index→text resolver over one [`TypeStore`].
pub struct Resolver<'s>
{
    store: &'s TypeStore,
    cache: HashMap<(TypeIndex, ResolveContext), ResolvedType>,
    active: HashSet<TypeIndex>,
    diagnostics: Diagnostics,
}

impl<'s> Resolver<'s>
{
    pub fn new(store: &'s TypeStore) -> Self
    {
        Self {
            store,
            cache: HashMap::new(),
            active: HashSet::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn store(&self) -> &'s TypeStore
    {
        self.store
    }

    /// Placeholders emitted so far.
    pub fn diagnostics(&self) -> &Diagnostics
    {
        &self.diagnostics
    }

    /// Number of memoized `(index, context)` entries.
    pub fn cache_len(&self) -> usize
    {
        self.cache.len()
    }

    /// Resolve `index` to its C spelling and suffix.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pdbex_core::records::{AggregateRecord, TypeRecord};
    /// use pdbex_core::resolver::{ResolveContext, Resolver};
    /// use pdbex_core::store::TypeStore;
    /// use pdbex_core::TypeIndex;
    ///
    /// let store = TypeStore::from_records([
    ///     (TypeIndex::new(0x1000), TypeRecord::Structure(AggregateRecord::new("_LIST_ENTRY", 16, None))),
    ///     (TypeIndex::new(0x1001), TypeRecord::pointer(TypeIndex::new(0x1000))),
    /// ]);
    /// let mut resolver = Resolver::new(&store);
    ///
    /// let ty = resolver.resolve(TypeIndex::new(0x1001), ResolveContext::Declaration);
    /// assert_eq!(ty.spelling, "struct _LIST_ENTRY *");
    /// ```
    pub fn resolve(&mut self, index: TypeIndex, context: ResolveContext) -> ResolvedType
    {
        if index.is_primitive() {
            return ResolvedType::plain(base_type(index).spelling);
        }

        let key = (index, context);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        if !self.active.insert(index) {
            self.diagnostics.report(index, DiagnosticKind::RecursiveType);
            return ResolvedType::plain(format!("/* recursive {index} */"));
        }
        let resolved = self.resolve_record(index, context);
        self.active.remove(&index);

        self.cache.insert(key, resolved.clone());
        resolved
    }

    /// Like [`Resolver::resolve`], with an absent index rendering as `void`.
    pub fn resolve_optional(&mut self, index: Option<TypeIndex>, context: ResolveContext) -> ResolvedType
    {
        match index {
            Some(index) => self.resolve(index, context),
            None => ResolvedType::plain("void"),
        }
    }

    fn resolve_record(&mut self, index: TypeIndex, context: ResolveContext) -> ResolvedType
    {
        let store = self.store;
        let Some(record) = store.get(index) else {
            self.diagnostics.report(index, DiagnosticKind::UnresolvedIndex);
            return ResolvedType::plain(format!("/* {index} */"));
        };

        match record {
            TypeRecord::Pointer { pointee, is_const } => {
                let inner = self.resolve(*pointee, context);
                if inner.spelling.starts_with(FUNCTION_PREFIX) {
                    return inner;
                }
                let pointer = if *is_const { "* const" } else { "*" };
                ResolvedType::new(format!("{} {pointer}", inner.spelling), inner.suffix)
            }
            TypeRecord::Array { element, size } => {
                let inner = self.resolve(*element, context);
                let element_size = self.size_of(*element);
                let suffix = if element_size > 0 {
                    format!("[{}]", size / element_size)
                } else if *size > 0 {
                    format!("[/* {size}b */]")
                } else {
                    "[]".to_string()
                };
                ResolvedType::new(inner.spelling, suffix)
            }
            TypeRecord::Modifier {
                underlying,
                is_const,
                is_volatile,
            } => {
                let inner = self.resolve(*underlying, context);
                let mut qualifiers: SmallVec<[&str; 2]> = SmallVec::new();
                if *is_const {
                    qualifiers.push("const");
                }
                if *is_volatile {
                    qualifiers.push("volatile");
                }
                if qualifiers.is_empty() {
                    return inner;
                }
                ResolvedType::new(format!("{} {}", qualifiers.join(" "), inner.spelling), inner.suffix)
            }
            TypeRecord::Bitfield { underlying, width, .. } => {
                let inner = self.resolve(*underlying, context);
                ResolvedType::new(inner.spelling, format!(" : {width}"))
            }
            TypeRecord::Structure(record) => {
                ResolvedType::plain(format!("struct {}", record.name.as_deref().unwrap_or("<anon>")))
            }
            TypeRecord::Union(record) => {
                ResolvedType::plain(format!("union {}", record.name.as_deref().unwrap_or("<anon>")))
            }
            TypeRecord::Enum(record) => {
                ResolvedType::plain(format!("enum {}", record.name.as_deref().unwrap_or("<anon>")))
            }
            TypeRecord::Procedure(procedure) | TypeRecord::MemberFunction(procedure) => {
                self.function_pointer(procedure)
            }
            TypeRecord::ArgumentList(_) | TypeRecord::FieldList { .. } | TypeRecord::Other(_) => {
                let kind = record.leaf_kind();
                self.diagnostics.report(index, DiagnosticKind::UnknownLeafKind(kind));
                ResolvedType::plain(format!("/* {kind} */"))
            }
        }
    }

    fn function_pointer(&mut self, procedure: &ProcedureRecord) -> ResolvedType
    {
        let store = self.store;
        let return_type = self.resolve_optional(procedure.return_type, ResolveContext::Declaration);

        let arguments: Vec<String> = store
            .arguments(procedure.arguments)
            .iter()
            .map(|argument| self.resolve(*argument, ResolveContext::Argument).to_string())
            .collect();
        let arguments = if arguments.is_empty() {
            "void".to_string()
        } else {
            arguments.join(", ")
        };

        ResolvedType::plain(format!("{FUNCTION_PREFIX} {} (*)({arguments}) */", return_type.spelling))
    }

    /// Byte size of `index`; 0 when unknown.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pdbex_core::records::TypeRecord;
    /// use pdbex_core::resolver::Resolver;
    /// use pdbex_core::store::TypeStore;
    /// use pdbex_core::TypeIndex;
    ///
    /// let store = TypeStore::from_records([(TypeIndex::new(0x1000), TypeRecord::array(TypeIndex::new(0x74), 16))]);
    /// let resolver = Resolver::new(&store);
    /// assert_eq!(resolver.size_of(TypeIndex::new(0x74)), 4);
    /// assert_eq!(resolver.size_of(TypeIndex::new(0x1000)), 16);
    /// ```
    pub fn size_of(&self, index: TypeIndex) -> u64
    {
        self.size_at_depth(index, 0)
    }

    fn size_at_depth(&self, index: TypeIndex, depth: usize) -> u64
    {
        if depth > MAX_TYPE_REF_DEPTH {
            return 0;
        }
        if index.is_primitive() {
            return base_type(index).size;
        }

        match self.store.get(index) {
            Some(TypeRecord::Structure(record) | TypeRecord::Union(record)) => record.size,
            Some(TypeRecord::Array { size, .. }) => *size,
            Some(TypeRecord::Enum(record)) => record
                .underlying
                .map_or(DEFAULT_ENUM_SIZE, |underlying| self.size_at_depth(underlying, depth + 1)),
            Some(TypeRecord::Pointer { .. }) => POINTER_SIZE,
            Some(TypeRecord::Modifier { underlying, .. } | TypeRecord::Bitfield { underlying, .. }) => {
                self.size_at_depth(*underlying, depth + 1)
            }
            _ => 0,
        }
    }
}

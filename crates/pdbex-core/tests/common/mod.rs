//! Shared type stream fixture for integration tests.
//!
//! Models a small slice of a kernel PDB:
//!
//! ```text
//! struct _LIST_ENTRY { struct _LIST_ENTRY *Flink, *Blink; }        0x10
//! enum _COLOR { RED = 0, GREEN = 1 }
//! struct _HEADER { enum _COLOR Color; unsigned long Flags : 3; } 0x8
//! struct _NODE {
//!     struct _HEADER Header;                  (via forward reference)
//!     struct _LIST_ENTRY Links[2];
//!     const struct _HEADER Shadow;
//!     unsigned char Tag[4];
//!     int (*Callback)(int, void *);
//!     struct _NODE *Parent;
//! }
//! ```

#![allow(dead_code)]

use pdbex_core::records::{AggregateRecord, EnumRecord, Field, LeafKind, ProcedureRecord, TypeRecord};
use pdbex_core::store::TypeStore;
use pdbex_core::TypeIndex;

pub const LIST_ENTRY_FORWARD: TypeIndex = TypeIndex::new(0x1000);
pub const LIST_ENTRY_POINTER: TypeIndex = TypeIndex::new(0x1001);
pub const LIST_ENTRY_FIELDS: TypeIndex = TypeIndex::new(0x1002);
pub const LIST_ENTRY: TypeIndex = TypeIndex::new(0x1003);
pub const COLOR_FIELDS: TypeIndex = TypeIndex::new(0x1004);
pub const COLOR: TypeIndex = TypeIndex::new(0x1005);
pub const FLAGS_BITFIELD: TypeIndex = TypeIndex::new(0x1006);
pub const HEADER_FORWARD: TypeIndex = TypeIndex::new(0x1007);
pub const HEADER_FIELDS: TypeIndex = TypeIndex::new(0x1008);
pub const HEADER: TypeIndex = TypeIndex::new(0x1009);
pub const LIST_ENTRY_ARRAY: TypeIndex = TypeIndex::new(0x100a);
pub const CONST_HEADER: TypeIndex = TypeIndex::new(0x100b);
pub const TAG_ARRAY: TypeIndex = TypeIndex::new(0x100c);
pub const CALLBACK_ARGS: TypeIndex = TypeIndex::new(0x100d);
pub const CALLBACK: TypeIndex = TypeIndex::new(0x100e);
pub const CALLBACK_POINTER: TypeIndex = TypeIndex::new(0x100f);
pub const NODE_FORWARD: TypeIndex = TypeIndex::new(0x1010);
pub const NODE_POINTER: TypeIndex = TypeIndex::new(0x1011);
pub const NODE_FIELDS: TypeIndex = TypeIndex::new(0x1012);
pub const NODE: TypeIndex = TypeIndex::new(0x1013);

pub const INT: TypeIndex = TypeIndex::new(0x74);
pub const UNSIGNED_LONG: TypeIndex = TypeIndex::new(0x22);
pub const UNSIGNED_CHAR: TypeIndex = TypeIndex::new(0x20);
pub const VOID: TypeIndex = TypeIndex::new(0x03);
pub const VOID_POINTER_64: TypeIndex = TypeIndex::new(0x603);

pub fn index(value: u32) -> TypeIndex
{
    TypeIndex::new(value)
}

pub fn structure(name: &str, size: u64, fields: TypeIndex) -> TypeRecord
{
    TypeRecord::Structure(AggregateRecord::new(name, size, Some(fields)))
}

pub fn forward_structure(name: &str) -> TypeRecord
{
    TypeRecord::Structure(AggregateRecord::forward(name))
}

pub fn kernel_store() -> TypeStore
{
    TypeStore::from_records([
        (LIST_ENTRY_FORWARD, forward_structure("_LIST_ENTRY")),
        (LIST_ENTRY_POINTER, TypeRecord::pointer(LIST_ENTRY_FORWARD)),
        (
            LIST_ENTRY_FIELDS,
            TypeRecord::field_list(vec![
                Field::member("Flink", LIST_ENTRY_POINTER, 0),
                Field::member("Blink", LIST_ENTRY_POINTER, 8),
            ]),
        ),
        (LIST_ENTRY, structure("_LIST_ENTRY", 0x10, LIST_ENTRY_FIELDS)),
        (
            COLOR_FIELDS,
            TypeRecord::field_list(vec![Field::enumerate("RED", 0), Field::enumerate("GREEN", 1)]),
        ),
        (COLOR, TypeRecord::Enum(EnumRecord::new("_COLOR", Some(INT), Some(COLOR_FIELDS)))),
        (
            FLAGS_BITFIELD,
            TypeRecord::Bitfield {
                underlying: UNSIGNED_LONG,
                width: 3,
                position: 0,
            },
        ),
        (HEADER_FORWARD, forward_structure("_HEADER")),
        (
            HEADER_FIELDS,
            TypeRecord::field_list(vec![
                Field::member("Color", COLOR, 0),
                Field::member("Flags", FLAGS_BITFIELD, 4),
            ]),
        ),
        (HEADER, structure("_HEADER", 0x8, HEADER_FIELDS)),
        (LIST_ENTRY_ARRAY, TypeRecord::array(LIST_ENTRY, 0x20)),
        (
            CONST_HEADER,
            TypeRecord::Modifier {
                underlying: HEADER,
                is_const: true,
                is_volatile: false,
            },
        ),
        (TAG_ARRAY, TypeRecord::array(UNSIGNED_CHAR, 4)),
        (CALLBACK_ARGS, TypeRecord::ArgumentList(vec![INT, VOID_POINTER_64])),
        (
            CALLBACK,
            TypeRecord::Procedure(ProcedureRecord {
                return_type: Some(INT),
                arguments: Some(CALLBACK_ARGS),
            }),
        ),
        (CALLBACK_POINTER, TypeRecord::pointer(CALLBACK)),
        (NODE_FORWARD, forward_structure("_NODE")),
        (NODE_POINTER, TypeRecord::pointer(NODE_FORWARD)),
        (
            NODE_FIELDS,
            TypeRecord::field_list(vec![
                Field::member("Header", HEADER_FORWARD, 0),
                Field::member("Links", LIST_ENTRY_ARRAY, 0x8),
                Field::member("Shadow", CONST_HEADER, 0x28),
                Field::member("Tag", TAG_ARRAY, 0x30),
                Field::member("Callback", CALLBACK_POINTER, 0x38),
                Field::member("Parent", NODE_POINTER, 0x40),
            ]),
        ),
        (NODE, structure("_NODE", 0x48, NODE_FIELDS)),
    ])
}

pub const BASE: TypeIndex = TypeIndex::new(0x1000);
pub const CONST_INT_POINTER: TypeIndex = TypeIndex::new(0x1001);
pub const CONST_VOLATILE_ULONG: TypeIndex = TypeIndex::new(0x1002);
pub const VTABLE_SHAPE: TypeIndex = TypeIndex::new(0x1003);
pub const METHOD: TypeIndex = TypeIndex::new(0x1004);
pub const EMPTY_ARGS: TypeIndex = TypeIndex::new(0x1005);
pub const METHOD_POINTER: TypeIndex = TypeIndex::new(0x1006);
pub const INNER: TypeIndex = TypeIndex::new(0x1007);
pub const DERIVED_FIELDS: TypeIndex = TypeIndex::new(0x1008);
pub const DERIVED: TypeIndex = TypeIndex::new(0x1009);

/// A C++-flavoured record exercising every member line kind:
///
/// ```text
/// struct _DERIVED : _BASE {
///     int * const P;
///     const volatile unsigned long V;
///     struct Inner;               (nested, plus one unnamed nested type)
///     static int Count;
///     <vtable shape> S;
///     void (*F)(void);            (member function, no arguments)
///     void Method();              (not rendered)
/// }
/// ```
pub fn derived_store() -> TypeStore
{
    TypeStore::from_records([
        (BASE, TypeRecord::Structure(AggregateRecord::new("_BASE", 4, None))),
        (
            CONST_INT_POINTER,
            TypeRecord::Pointer {
                pointee: INT,
                is_const: true,
            },
        ),
        (
            CONST_VOLATILE_ULONG,
            TypeRecord::Modifier {
                underlying: UNSIGNED_LONG,
                is_const: true,
                is_volatile: true,
            },
        ),
        (VTABLE_SHAPE, TypeRecord::Other(LeafKind::VirtualTableShape)),
        (
            METHOD,
            TypeRecord::MemberFunction(ProcedureRecord {
                return_type: Some(VOID),
                arguments: Some(EMPTY_ARGS),
            }),
        ),
        (EMPTY_ARGS, TypeRecord::ArgumentList(Vec::new())),
        (METHOD_POINTER, TypeRecord::pointer(METHOD)),
        (INNER, TypeRecord::Structure(AggregateRecord::new("Inner", 1, None))),
        (
            DERIVED_FIELDS,
            TypeRecord::field_list(vec![
                Field::BaseClass { base: BASE, offset: 0 },
                Field::member("P", CONST_INT_POINTER, 0x4),
                Field::member("V", CONST_VOLATILE_ULONG, 0x10),
                Field::NestedType {
                    name: "Inner".to_string(),
                    nested_type: INNER,
                },
                Field::NestedType {
                    name: String::new(),
                    nested_type: INNER,
                },
                Field::StaticMember {
                    name: "Count".to_string(),
                    field_type: INT,
                },
                Field::member("S", VTABLE_SHAPE, 0x14),
                Field::member("F", METHOD_POINTER, 0x18),
                Field::Other(LeafKind::OneMethod),
            ]),
        ),
        (DERIVED, structure("_DERIVED", 0x20, DERIVED_FIELDS)),
    ])
}

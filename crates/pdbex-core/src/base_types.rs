//! Primitive type decoding.
//!
//! Indices below `0x1000` are not records. Their low byte names a base type
//! and bits 8–11 name a pointer mode:
//!
//! | mode  | meaning                   | size |
//! |-------|---------------------------|------|
//! | 0     | direct value              | base |
//! | 1–3   | near / far / huge pointer | 2    |
//! | 4–5   | 32-bit pointer            | 4    |
//! | 6     | 64-bit pointer            | 8    |

use std::borrow::Cow;

use crate::index::TypeIndex;

/// Spelling and byte size of a primitive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseType
{
    pub spelling: Cow<'static, str>,
    pub size: u64,
}

/// Base types by low byte: (value, spelling, size).
const BASE_TYPES: &[(u32, &str, u64)] = &[
    (0x00, "T_NOTYPE", 0),
    (0x03, "void", 0),
    (0x08, "HRESULT", 0),
    (0x10, "signed char", 1),
    (0x11, "short", 2),
    (0x12, "long", 4),
    (0x13, "__int64", 8),
    (0x14, "__int128", 16),
    (0x20, "unsigned char", 1),
    (0x21, "unsigned short", 2),
    (0x22, "unsigned long", 4),
    (0x23, "unsigned __int64", 8),
    (0x24, "unsigned __int128", 16),
    (0x30, "unsigned char", 1),
    (0x31, "unsigned short", 2),
    (0x32, "unsigned long", 4),
    (0x33, "unsigned __int64", 8),
    (0x40, "float", 4),
    (0x41, "double", 8),
    (0x42, "long double", 10),
    (0x43, "__float128", 16),
    (0x68, "char", 1),
    (0x69, "unsigned char", 1),
    (0x70, "char", 1),
    (0x71, "wchar_t", 2),
    (0x72, "short", 2),
    (0x73, "unsigned short", 2),
    (0x74, "int", 4),
    (0x75, "unsigned int", 4),
    (0x76, "__int64", 8),
    (0x77, "unsigned __int64", 8),
];

/// Pointer width selected by the mode nibble, if the mode is a pointer mode.
fn pointer_size(mode: u32) -> Option<u64>
{
    match mode {
        1..=3 => Some(2),
        4 | 5 => Some(4),
        6 => Some(8),
        _ => None,
    }
}

/// Decode a primitive index.
///
/// Unknown base bytes render as `/* 0xNN */` with size 0; this never fails.
///
/// ```rust
/// use pdbex_core::base_types::base_type;
/// use pdbex_core::TypeIndex;
///
/// assert_eq!(base_type(TypeIndex::new(0x74)).spelling, "int");
/// assert_eq!(base_type(TypeIndex::new(0x674)).spelling, "int *");
/// assert_eq!(base_type(TypeIndex::new(0x674)).size, 8);
/// ```
pub fn base_type(index: TypeIndex) -> BaseType
{
    let base = index.value() & 0xff;
    let mode = (index.value() >> 8) & 0xf;

    let (spelling, size) = match BASE_TYPES.iter().find(|(value, _, _)| *value == base) {
        Some((_, spelling, size)) => (Cow::Borrowed(*spelling), *size),
        None => (Cow::Owned(format!("/* 0x{base:02X} */")), 0),
    };

    match pointer_size(mode) {
        Some(pointer) => BaseType {
            spelling: Cow::Owned(format!("{spelling} *")),
            size: pointer,
        },
        None => BaseType { spelling, size },
    }
}

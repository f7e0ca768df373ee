//! # Declaration Formatter
//!
//! Renders struct, union and enum records as C `typedef` declarations.
//!
//! ## Layout
//!
//! ```text
//! typedef struct _NAME
//! {
//!   /* 0x0000 */ unsigned long Length;
//!   /* 0x0008 */ struct _LIST_ENTRY * Next;
//! } NAME, *PNAME; /* 0x10 */
//! ```
//!
//! Members appear in field-list order, which is declaration order and not
//! necessarily offset order (union members all sit at offset 0).

use std::fmt::Write;

use crate::index::TypeIndex;
use crate::records::{AggregateRecord, EnumRecord, Field, TypeRecord};
use crate::resolver::{ResolveContext, Resolver};

/// Typedef alias for `name`: one leading underscore removed.
pub fn alias(name: &str) -> &str
{
    name.strip_prefix('_').unwrap_or(name)
}

/// Format the declaration of `index`.
///
/// Returns an empty string when `index` is not a struct, union or enum.
pub fn format_declaration(resolver: &mut Resolver<'_>, index: TypeIndex) -> String
{
    let store = resolver.store();
    match store.get(index) {
        Some(TypeRecord::Structure(record)) => format_aggregate(resolver, "struct", record),
        Some(TypeRecord::Union(record)) => format_aggregate(resolver, "union", record),
        Some(TypeRecord::Enum(record)) => format_enum(resolver, record),
        _ => String::new(),
    }
}

fn format_aggregate(resolver: &mut Resolver<'_>, keyword: &str, record: &AggregateRecord) -> String
{
    let store = resolver.store();
    let name = record.name.as_deref().unwrap_or("<anon>");

    let mut out = String::new();
    let _ = writeln!(out, "typedef {keyword} {name}");
    out.push_str("{\n");

    for field in store.fields(record.fields) {
        match field {
            Field::Member {
                name,
                field_type,
                offset,
            } => {
                let ty = resolver.resolve(*field_type, ResolveContext::Declaration);
                let _ = writeln!(out, "  /* 0x{offset:04X} */ {};", ty.declare(name));
            }
            Field::NestedType { name, .. } => {
                if !name.is_empty() {
                    let _ = writeln!(out, "  /* nested: {name} */");
                }
            }
            Field::StaticMember { name, field_type } => {
                let ty = resolver.resolve(*field_type, ResolveContext::Declaration);
                let _ = writeln!(out, "  /* static */ {};", ty.declare(name));
            }
            Field::BaseClass { base, offset } => {
                let ty = resolver.resolve(*base, ResolveContext::Declaration);
                let _ = writeln!(out, "  /* 0x{offset:04X} */ /* base: {} */", ty.spelling);
            }
            Field::Enumerate { .. } | Field::Other(_) => {}
        }
    }

    let alias = alias(name);
    let _ = writeln!(out, "}} {alias}, *P{alias}; /* 0x{:X} */", record.size);
    out
}

fn format_enum(resolver: &Resolver<'_>, record: &EnumRecord) -> String
{
    let store = resolver.store();
    let name = record.name.as_deref().unwrap_or("<anon>");

    let enumerators: Vec<_> = store
        .fields(record.fields)
        .into_iter()
        .filter_map(|field| match field {
            Field::Enumerate { name, value } => Some((name, value)),
            _ => None,
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "typedef enum {name}");
    out.push_str("{\n");
    for (position, (enumerator, value)) in enumerators.iter().enumerate() {
        let separator = if position + 1 < enumerators.len() { "," } else { "" };
        let _ = writeln!(out, "  {enumerator} = {value}{separator}");
    }
    let _ = writeln!(out, "}} {};", alias(name));
    out
}

//! PDB ingestion.
//!
//! Walks the TPI stream once with the `pdb` crate and converts every record
//! into a [`TypeRecord`]. Records the crate cannot parse are kept as
//! [`TypeRecord::Other`] so a single odd leaf never fails the whole load.

use std::fmt::Debug;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use pdb::FallibleIterator;

use super::TypeStore;
use crate::error::{PdbexError, PdbexResult};
use crate::index::TypeIndex;
use crate::records::{AggregateRecord, EnumRecord, EnumValue, Field, LeafKind, ProcedureRecord, TypeRecord};

impl TypeStore
{
    /// Load the type stream of the PDB at `path`.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The path does not exist (`FileNotFound`)
    /// - The file is not a PDB or its stream table is corrupt (`Pdb`)
    /// - The type stream cannot be read (`Pdb`, `Load`)
    pub fn open(path: impl AsRef<Path>) -> PdbexResult<Self>
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PdbexError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let store = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), records = store.len(), "loaded type stream");
        Ok(store)
    }

    /// Load the type stream from any seekable PDB byte source.
    ///
    /// ## Errors
    ///
    /// See [`TypeStore::open`].
    pub fn from_reader<R>(reader: R) -> PdbexResult<Self>
    where
        R: Read + Seek + Debug + 'static,
    {
        let mut pdb = pdb::PDB::open(reader)?;
        let type_information = pdb.type_information()?;

        let mut store = TypeStore::new();
        let mut iter = type_information.iter();
        let mut skipped = 0usize;

        while let Some(item) = iter
            .next()
            .map_err(|err| PdbexError::Load(format!("reading type record: {err}")))?
        {
            let index = TypeIndex::from(item.index());
            let record = match item.parse() {
                Ok(data) => convert_record(data),
                Err(pdb::Error::UnimplementedTypeKind(raw)) => TypeRecord::Other(LeafKind::from_raw(raw)),
                Err(err) => {
                    skipped += 1;
                    tracing::debug!(%index, %err, "unparseable type record");
                    TypeRecord::Other(LeafKind::from_raw(item.raw_kind()))
                }
            };
            store.insert(index, record);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "type records could not be decoded and render as placeholders");
        }

        Ok(store)
    }
}

fn owned_name(name: pdb::RawString<'_>) -> Option<String>
{
    let name = name.to_string();
    if name.is_empty() {
        None
    } else {
        Some(name.into_owned())
    }
}

fn convert_record(data: pdb::TypeData<'_>) -> TypeRecord
{
    match data {
        pdb::TypeData::Pointer(pointer) => TypeRecord::Pointer {
            pointee: pointer.underlying_type.into(),
            is_const: pointer.attributes.is_const(),
        },
        pdb::TypeData::Array(array) => TypeRecord::Array {
            element: array.element_type.into(),
            // dimensions are cumulative byte sizes; the last one covers the whole array
            size: array.dimensions.last().map_or(0, |size| u64::from(*size)),
        },
        pdb::TypeData::Modifier(modifier) => TypeRecord::Modifier {
            underlying: modifier.underlying_type.into(),
            is_const: modifier.constant,
            is_volatile: modifier.volatile,
        },
        pdb::TypeData::Bitfield(bitfield) => TypeRecord::Bitfield {
            underlying: bitfield.underlying_type.into(),
            width: u32::from(bitfield.length),
            position: u32::from(bitfield.position),
        },
        pdb::TypeData::Class(class) => TypeRecord::Structure(AggregateRecord {
            name: owned_name(class.name),
            size: class.size,
            fields: class.fields.map(TypeIndex::from),
            forward_reference: class.properties.forward_reference(),
        }),
        pdb::TypeData::Union(union) => TypeRecord::Union(AggregateRecord {
            name: owned_name(union.name),
            size: union.size,
            fields: non_null(union.fields),
            forward_reference: union.properties.forward_reference(),
        }),
        pdb::TypeData::Enumeration(enumeration) => TypeRecord::Enum(EnumRecord {
            name: owned_name(enumeration.name),
            underlying: non_null(enumeration.underlying_type),
            fields: non_null(enumeration.fields),
            forward_reference: enumeration.properties.forward_reference(),
        }),
        pdb::TypeData::Procedure(procedure) => TypeRecord::Procedure(ProcedureRecord {
            return_type: procedure.return_type.map(TypeIndex::from),
            arguments: non_null(procedure.argument_list),
        }),
        pdb::TypeData::MemberFunction(function) => TypeRecord::MemberFunction(ProcedureRecord {
            return_type: non_null(function.return_type),
            arguments: non_null(function.argument_list),
        }),
        pdb::TypeData::ArgumentList(list) => {
            TypeRecord::ArgumentList(list.arguments.into_iter().map(TypeIndex::from).collect())
        }
        pdb::TypeData::FieldList(list) => TypeRecord::FieldList {
            fields: list.fields.into_iter().map(convert_field).collect(),
            continuation: list.continuation.map(TypeIndex::from),
        },
        other => TypeRecord::Other(leaf_kind_of(&other)),
    }
}

fn convert_field(data: pdb::TypeData<'_>) -> Field
{
    match data {
        pdb::TypeData::Member(member) => Field::Member {
            name: member.name.to_string().into_owned(),
            field_type: member.field_type.into(),
            offset: member.offset,
        },
        pdb::TypeData::StaticMember(member) => Field::StaticMember {
            name: member.name.to_string().into_owned(),
            field_type: member.field_type.into(),
        },
        pdb::TypeData::Nested(nested) => Field::NestedType {
            name: nested.name.to_string().into_owned(),
            nested_type: nested.nested_type.into(),
        },
        pdb::TypeData::BaseClass(base) => Field::BaseClass {
            base: base.base_class.into(),
            offset: u64::from(base.offset),
        },
        pdb::TypeData::Enumerate(enumerate) => Field::Enumerate {
            name: enumerate.name.to_string().into_owned(),
            value: EnumValue::from(enumerate.value),
        },
        other => Field::Other(leaf_kind_of(&other)),
    }
}

/// Index 0 (`T_NOTYPE`) stands for "absent" in record attributes.
fn non_null(index: pdb::TypeIndex) -> Option<TypeIndex>
{
    (index.0 != 0).then(|| TypeIndex::from(index))
}

fn leaf_kind_of(data: &pdb::TypeData<'_>) -> LeafKind
{
    match data {
        pdb::TypeData::Class(_) => LeafKind::Class,
        pdb::TypeData::Member(_) => LeafKind::Member,
        pdb::TypeData::MemberFunction(_) => LeafKind::MemberFunction,
        pdb::TypeData::OverloadedMethod(_) => LeafKind::Method,
        pdb::TypeData::Method(_) => LeafKind::OneMethod,
        pdb::TypeData::StaticMember(_) => LeafKind::StaticMember,
        pdb::TypeData::Nested(_) => LeafKind::NestedType,
        pdb::TypeData::BaseClass(_) => LeafKind::BaseClass,
        pdb::TypeData::VirtualBaseClass(_) => LeafKind::VirtualBaseClass,
        pdb::TypeData::VirtualFunctionTablePointer(_) => LeafKind::VirtualFunctionTable,
        pdb::TypeData::Procedure(_) => LeafKind::Procedure,
        pdb::TypeData::Pointer(_) => LeafKind::Pointer,
        pdb::TypeData::Modifier(_) => LeafKind::Modifier,
        pdb::TypeData::Enumeration(_) => LeafKind::Enum,
        pdb::TypeData::Enumerate(_) => LeafKind::Enumerate,
        pdb::TypeData::Array(_) => LeafKind::Array,
        pdb::TypeData::Union(_) => LeafKind::Union,
        pdb::TypeData::Bitfield(_) => LeafKind::Bitfield,
        pdb::TypeData::FieldList(_) => LeafKind::FieldList,
        pdb::TypeData::ArgumentList(_) => LeafKind::ArgumentList,
        pdb::TypeData::MethodList(_) => LeafKind::MethodList,
        _ => LeafKind::Raw(0),
    }
}

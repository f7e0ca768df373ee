//! Decoded type records.
//!
//! Every record in the type stream is converted once, at load time, into one
//! variant of the closed [`TypeRecord`] enum. Field lists hold [`Field`]
//! entries. Nothing downstream ever looks at the raw container again.

use std::fmt;

use crate::index::TypeIndex;

/// Leaf kind tag of a type record or field list entry.
///
/// Only used for placeholders and diagnostics; the modelled kinds are carried
/// by the [`TypeRecord`] and [`Field`] variants themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind
{
    Pointer,
    Array,
    Modifier,
    Bitfield,
    Class,
    Structure,
    Interface,
    Union,
    Enum,
    Procedure,
    MemberFunction,
    ArgumentList,
    FieldList,
    MethodList,
    Member,
    StaticMember,
    NestedType,
    BaseClass,
    VirtualBaseClass,
    Enumerate,
    Method,
    OneMethod,
    VirtualFunctionTable,
    VirtualTableShape,
    Label,
    Alias,
    /// Raw leaf value with no symbolic name here
    Raw(u16),
}

impl LeafKind
{
    /// Map a raw `LF_*` value to its tag.
    pub fn from_raw(raw: u16) -> Self
    {
        match raw {
            0x000a => LeafKind::VirtualTableShape,
            0x000e => LeafKind::Label,
            0x1001 => LeafKind::Modifier,
            0x1002 => LeafKind::Pointer,
            0x1008 => LeafKind::Procedure,
            0x1009 => LeafKind::MemberFunction,
            0x1201 => LeafKind::ArgumentList,
            0x1203 => LeafKind::FieldList,
            0x1205 => LeafKind::Bitfield,
            0x1206 => LeafKind::MethodList,
            0x1400 => LeafKind::BaseClass,
            0x1401 | 0x1402 => LeafKind::VirtualBaseClass,
            0x1409 => LeafKind::VirtualFunctionTable,
            0x1502 => LeafKind::Enumerate,
            0x1503 | 0x1516 => LeafKind::Array,
            0x1504 => LeafKind::Class,
            0x1505 => LeafKind::Structure,
            0x1506 => LeafKind::Union,
            0x1507 => LeafKind::Enum,
            0x150a => LeafKind::Alias,
            0x150d => LeafKind::Member,
            0x150e => LeafKind::StaticMember,
            0x150f => LeafKind::Method,
            0x1510 => LeafKind::NestedType,
            0x1511 => LeafKind::OneMethod,
            0x1519 => LeafKind::Interface,
            other => LeafKind::Raw(other),
        }
    }
}

impl fmt::Display for LeafKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            LeafKind::Pointer => "LF_POINTER",
            LeafKind::Array => "LF_ARRAY",
            LeafKind::Modifier => "LF_MODIFIER",
            LeafKind::Bitfield => "LF_BITFIELD",
            LeafKind::Class => "LF_CLASS",
            LeafKind::Structure => "LF_STRUCTURE",
            LeafKind::Interface => "LF_INTERFACE",
            LeafKind::Union => "LF_UNION",
            LeafKind::Enum => "LF_ENUM",
            LeafKind::Procedure => "LF_PROCEDURE",
            LeafKind::MemberFunction => "LF_MFUNCTION",
            LeafKind::ArgumentList => "LF_ARGLIST",
            LeafKind::FieldList => "LF_FIELDLIST",
            LeafKind::MethodList => "LF_METHODLIST",
            LeafKind::Member => "LF_MEMBER",
            LeafKind::StaticMember => "LF_STMEMBER",
            LeafKind::NestedType => "LF_NESTTYPE",
            LeafKind::BaseClass => "LF_BCLASS",
            LeafKind::VirtualBaseClass => "LF_VBCLASS",
            LeafKind::Enumerate => "LF_ENUMERATE",
            LeafKind::Method => "LF_METHOD",
            LeafKind::OneMethod => "LF_ONEMETHOD",
            LeafKind::VirtualFunctionTable => "LF_VFUNCTAB",
            LeafKind::VirtualTableShape => "LF_VTSHAPE",
            LeafKind::Label => "LF_LABEL",
            LeafKind::Alias => "LF_ALIAS",
            LeafKind::Raw(raw) => return write!(f, "LF_0x{raw:04X}"),
        };
        write!(f, "{label}")
    }
}

/// `struct`, `class` or `union` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRecord
{
    /// `None` for records with an empty name.
    pub name: Option<String>,
    pub size: u64,
    /// Field list index; forward references usually have none.
    pub fields: Option<TypeIndex>,
    pub forward_reference: bool,
}

impl AggregateRecord
{
    pub fn new(name: impl Into<String>, size: u64, fields: Option<TypeIndex>) -> Self
    {
        Self {
            name: Some(name.into()),
            size,
            fields,
            forward_reference: false,
        }
    }

    /// Incomplete declaration of `name` with no body.
    pub fn forward(name: impl Into<String>) -> Self
    {
        Self {
            name: Some(name.into()),
            size: 0,
            fields: None,
            forward_reference: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRecord
{
    pub name: Option<String>,
    pub underlying: Option<TypeIndex>,
    pub fields: Option<TypeIndex>,
    pub forward_reference: bool,
}

impl EnumRecord
{
    pub fn new(name: impl Into<String>, underlying: Option<TypeIndex>, fields: Option<TypeIndex>) -> Self
    {
        Self {
            name: Some(name.into()),
            underlying,
            fields,
            forward_reference: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureRecord
{
    pub return_type: Option<TypeIndex>,
    pub arguments: Option<TypeIndex>,
}

/// A decoded type record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRecord
{
    Pointer
    {
        pointee: TypeIndex,
        is_const: bool,
    },
    /// `size` is the total byte size of the array.
    Array
    {
        element: TypeIndex,
        size: u64,
    },
    Modifier
    {
        underlying: TypeIndex,
        is_const: bool,
        is_volatile: bool,
    },
    Bitfield
    {
        underlying: TypeIndex,
        width: u32,
        position: u32,
    },
    Structure(AggregateRecord),
    Union(AggregateRecord),
    Enum(EnumRecord),
    Procedure(ProcedureRecord),
    MemberFunction(ProcedureRecord),
    ArgumentList(Vec<TypeIndex>),
    FieldList
    {
        fields: Vec<Field>,
        continuation: Option<TypeIndex>,
    },
    /// Any kind not modelled above.
    Other(LeafKind),
}

impl TypeRecord
{
    pub fn pointer(pointee: TypeIndex) -> Self
    {
        TypeRecord::Pointer {
            pointee,
            is_const: false,
        }
    }

    pub fn array(element: TypeIndex, size: u64) -> Self
    {
        TypeRecord::Array { element, size }
    }

    pub fn field_list(fields: Vec<Field>) -> Self
    {
        TypeRecord::FieldList {
            fields,
            continuation: None,
        }
    }

    pub fn leaf_kind(&self) -> LeafKind
    {
        match self {
            TypeRecord::Pointer { .. } => LeafKind::Pointer,
            TypeRecord::Array { .. } => LeafKind::Array,
            TypeRecord::Modifier { .. } => LeafKind::Modifier,
            TypeRecord::Bitfield { .. } => LeafKind::Bitfield,
            TypeRecord::Structure(_) => LeafKind::Structure,
            TypeRecord::Union(_) => LeafKind::Union,
            TypeRecord::Enum(_) => LeafKind::Enum,
            TypeRecord::Procedure(_) => LeafKind::Procedure,
            TypeRecord::MemberFunction(_) => LeafKind::MemberFunction,
            TypeRecord::ArgumentList(_) => LeafKind::ArgumentList,
            TypeRecord::FieldList { .. } => LeafKind::FieldList,
            TypeRecord::Other(kind) => *kind,
        }
    }

    /// Name of a struct, union or enum record.
    pub fn name(&self) -> Option<&str>
    {
        match self {
            TypeRecord::Structure(record) | TypeRecord::Union(record) => record.name.as_deref(),
            TypeRecord::Enum(record) => record.name.as_deref(),
            _ => None,
        }
    }

    pub fn is_forward_reference(&self) -> bool
    {
        match self {
            TypeRecord::Structure(record) | TypeRecord::Union(record) => record.forward_reference,
            TypeRecord::Enum(record) => record.forward_reference,
            _ => false,
        }
    }
}

/// Value of an enumerator, wide enough for every signed and unsigned width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumValue(pub i128);

impl fmt::Display for EnumValue
{
    /// Unpadded uppercase hex; negative values keep their sign.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        if self.0 < 0 {
            write!(f, "-0x{:X}", self.0.unsigned_abs())
        } else {
            write!(f, "0x{:X}", self.0)
        }
    }
}

impl From<pdb::Variant> for EnumValue
{
    fn from(value: pdb::Variant) -> Self
    {
        let wide = match value {
            pdb::Variant::U8(v) => i128::from(v),
            pdb::Variant::U16(v) => i128::from(v),
            pdb::Variant::U32(v) => i128::from(v),
            pdb::Variant::U64(v) => i128::from(v),
            pdb::Variant::I8(v) => i128::from(v),
            pdb::Variant::I16(v) => i128::from(v),
            pdb::Variant::I32(v) => i128::from(v),
            pdb::Variant::I64(v) => i128::from(v),
        };
        EnumValue(wide)
    }
}

/// An entry of a field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field
{
    Member
    {
        name: String,
        field_type: TypeIndex,
        offset: u64,
    },
    StaticMember
    {
        name: String,
        field_type: TypeIndex,
    },
    NestedType
    {
        name: String,
        nested_type: TypeIndex,
    },
    BaseClass
    {
        base: TypeIndex,
        offset: u64,
    },
    Enumerate
    {
        name: String,
        value: EnumValue,
    },
    /// Methods, vtable pointers and other entries with no C rendering.
    Other(LeafKind),
}

impl Field
{
    pub fn member(name: impl Into<String>, field_type: TypeIndex, offset: u64) -> Self
    {
        Field::Member {
            name: name.into(),
            field_type,
            offset,
        }
    }

    pub fn enumerate(name: impl Into<String>, value: i128) -> Self
    {
        Field::Enumerate {
            name: name.into(),
            value: EnumValue(value),
        }
    }
}

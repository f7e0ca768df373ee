//! Type index and resolved type values.

use std::fmt;

/// First index that refers to a record in the type stream.
///
/// Everything below is a primitive whose meaning is encoded in the index
/// itself (see [`crate::base_types`]).
pub const FIRST_RECORD_INDEX: u32 = 0x1000;

/// Strongly typed index into the type information stream
///
/// ## Index Space
///
/// - `0x0000..0x1000`: primitive types. Bits 0–7 select the base type,
///   bits 8–11 select a pointer mode.
/// - `0x1000..`: records stored in the [`TypeStore`](crate::store::TypeStore).
///
/// ## Example
///
/// ```rust
/// use pdbex_core::TypeIndex;
///
/// assert!(TypeIndex::new(0x74).is_primitive());
/// assert!(!TypeIndex::new(0x1000).is_primitive());
/// assert_eq!(TypeIndex::new(0x1a2b).to_string(), "0x1A2B");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TypeIndex(pub u32);

impl TypeIndex
{
    /// Create a new index from its raw value.
    pub const fn new(value: u32) -> Self
    {
        TypeIndex(value)
    }

    /// Raw `u32` value of the index.
    pub const fn value(self) -> u32
    {
        self.0
    }

    /// Whether this index is decoded from its bits rather than looked up.
    pub const fn is_primitive(self) -> bool
    {
        self.0 < FIRST_RECORD_INDEX
    }
}

impl From<u32> for TypeIndex
{
    fn from(value: u32) -> Self
    {
        TypeIndex(value)
    }
}

impl From<TypeIndex> for u32
{
    fn from(index: TypeIndex) -> Self
    {
        index.0
    }
}

impl From<pdb::TypeIndex> for TypeIndex
{
    fn from(index: pdb::TypeIndex) -> Self
    {
        TypeIndex(index.0)
    }
}

impl fmt::Display for TypeIndex
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::UpperHex for TypeIndex
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// A type rendered as C text, split around the declarator name.
///
/// C puts part of a type before the name and part after it
/// (`char name[16]`, `unsigned long flag : 1`). `spelling` is the part before,
/// `suffix` the part after.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedType
{
    pub spelling: String,
    pub suffix: String,
}

impl ResolvedType
{
    pub fn new(spelling: impl Into<String>, suffix: impl Into<String>) -> Self
    {
        Self {
            spelling: spelling.into(),
            suffix: suffix.into(),
        }
    }

    /// A type with no suffix.
    pub fn plain(spelling: impl Into<String>) -> Self
    {
        Self::new(spelling, String::new())
    }

    /// Compose a declaration of `name` with this type.
    ///
    /// ```rust
    /// use pdbex_core::ResolvedType;
    ///
    /// let ty = ResolvedType::new("char", "[16]");
    /// assert_eq!(ty.declare("Name"), "char Name[16]");
    /// ```
    pub fn declare(&self, name: &str) -> String
    {
        format!("{} {}{}", self.spelling, name, self.suffix)
    }
}

impl fmt::Display for ResolvedType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}{}", self.spelling, self.suffix)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_primitive_boundary()
    {
        assert!(TypeIndex::new(0x0fff).is_primitive());
        assert!(!TypeIndex::new(FIRST_RECORD_INDEX).is_primitive());
    }

    #[test]
    fn test_display_is_unpadded_upper_hex()
    {
        assert_eq!(TypeIndex::new(0x1abc).to_string(), "0x1ABC");
        assert_eq!(format!("{:04X}", TypeIndex::new(0x74)), "0074");
    }

    #[test]
    fn test_declare_bitfield()
    {
        let ty = ResolvedType::new("unsigned long", " : 3");
        assert_eq!(ty.declare("Flags"), "unsigned long Flags : 3");
        assert_eq!(ty.to_string(), "unsigned long : 3");
    }
}

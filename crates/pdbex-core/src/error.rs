//! # Error Types
//!
//! Error handling for loading symbol files.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Only loading can fail. Once a [`TypeStore`](crate::store::TypeStore) exists,
//! resolution, formatting, and dependency walking never return errors: bad
//! records degrade to inline placeholders (see [`crate::diagnostics`]) and
//! unknown names produce a not-found marker (see [`crate::session::DumpOutcome`]).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for symbol file operations
///
/// ## Error Categories
///
/// 1. **Input errors**: FileNotFound
/// 2. **Container errors**: Pdb, Load
/// 3. **I/O errors**: Io
#[derive(Error, Debug)]
pub enum PdbexError
{
    /// The symbol file path does not exist
    #[error("'{}' not found", .0.display())]
    FileNotFound(PathBuf),

    /// The container could be opened but its type information is unusable
    ///
    /// Examples:
    /// - The PDB has no TPI stream
    /// - The type stream header is truncated
    #[error("Failed to load type information: {0}")]
    Load(String),

    /// Error reported by the `pdb` crate while decoding the MSF container
    ///
    /// This covers files that are not PDBs at all (`UnrecognizedFileFormat`),
    /// pre-2002 formats and corrupt page tables.
    #[error("PDB error: {0}")]
    Pdb(#[from] pdb::Error),

    /// I/O error (for file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, PdbexError>`
///
/// ```rust
/// use pdbex_core::error::PdbexResult;
/// fn foo() -> PdbexResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type PdbexResult<T> = std::result::Result<T, PdbexError>;

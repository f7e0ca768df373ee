//! Tests for error handling

use std::io::Write;

use pdbex_core::store::TypeStore;
use pdbex_core::{PdbexError, TypeDatabase};

#[test]
fn test_missing_file()
{
    let result = TypeStore::open("/nonexistent/path/ntdll.pdb");
    match result {
        Err(PdbexError::FileNotFound(path)) => assert!(path.ends_with("ntdll.pdb")),
        other => panic!("Expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_missing_file_message()
{
    let error = PdbexError::FileNotFound("missing.pdb".into());
    assert_eq!(error.to_string(), "'missing.pdb' not found");
}

#[test]
fn test_garbage_file_is_rejected()
{
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(&[0xAB; 4096]).expect("write garbage");

    let result = TypeDatabase::open(file.path());
    assert!(matches!(result, Err(PdbexError::Pdb(_))), "got {:?}", result.map(|db| db.counts()));
}

#[test]
fn test_io_error_conversion()
{
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: PdbexError = io_err.into();
    assert!(matches!(error, PdbexError::Io(_)));
    assert!(error.to_string().contains("denied"));
}

#[test]
fn test_load_error_display()
{
    let error = PdbexError::Load("truncated stream".to_string());
    assert_eq!(error.to_string(), "Failed to load type information: truncated stream");
}

//! # pdbex-core
//!
//! Reconstructs C type declarations from the type information of Windows
//! PDB symbol files.
//!
//! This crate provides:
//! - Loading of the TPI stream into an immutable [`TypeStore`]
//! - Primitive type decoding ([`base_types`])
//! - A memoizing index→C text [`Resolver`]
//! - Dependency ordering for inline dumps ([`dependencies`])
//! - `typedef` rendering for structs, unions and enums ([`format`])
//! - Name lookup and dumping ([`Catalog`], [`DumpSession`])
//!
//! ## Failure Model
//!
//! Only loading returns errors. Everything after that degrades to inline
//! placeholders so one malformed record never aborts a dump of thousands.
//!
//! ## Example
//!
//! ```rust
//! use pdbex_core::records::{AggregateRecord, Field, TypeRecord};
//! use pdbex_core::store::TypeStore;
//! use pdbex_core::{TypeDatabase, TypeIndex};
//!
//! let store = TypeStore::from_records([
//!     (TypeIndex::new(0x1000), TypeRecord::field_list(vec![Field::member("Count", TypeIndex::new(0x22), 0)])),
//!     (TypeIndex::new(0x1001), TypeRecord::Structure(AggregateRecord::new("_COUNTER", 4, Some(TypeIndex::new(0x1000))))),
//! ]);
//! let database = TypeDatabase::from_store(store);
//!
//! let text = database.session().dump_by_name("COUNTER", false).to_string();
//! assert_eq!(
//!     text,
//!     "typedef struct _COUNTER\n{\n  /* 0x0000 */ unsigned long Count;\n} COUNTER, *PCOUNTER; /* 0x4 */\n"
//! );
//! ```

pub mod base_types;
pub mod catalog;
pub mod database;
pub mod dependencies;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod index;
pub mod records;
pub mod resolver;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use catalog::Catalog;
pub use database::TypeDatabase;
pub use error::{PdbexError, PdbexResult};
pub use index::{ResolvedType, TypeIndex};
pub use resolver::{ResolveContext, Resolver};
pub use session::{DumpOutcome, DumpSession};
pub use store::TypeStore;

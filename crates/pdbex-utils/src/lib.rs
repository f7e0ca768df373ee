//! # pdbex Utilities
//!
//! Shared logging setup for the pdbex workspace, built on `tracing`.
//!
//! Diagnostics always go to stderr (and optionally a file) so that stdout
//! carries nothing but reconstructed declarations.

pub mod logging;

pub use logging::{init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};

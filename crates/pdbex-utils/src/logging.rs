//! # Logging Utilities
//!
//! Logging infrastructure for pdbex using `tracing`.
//!
//! This module provides structured logging with support for:
//! - Pretty and JSON output formats
//! - Environment variable configuration
//! - Optional file output next to the console
//!
//! Console output always goes to stderr. Declarations are written to stdout
//! and must not be interleaved with log lines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdbex_utils::init_logging;
//!
//! // Reads RUST_LOG, PDBEX_LOG_FORMAT and PDBEX_LOG_FILE
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::warn!("Shown by default");
//! tracing::debug!("Shown with RUST_LOG=debug");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=pdbex_core=debug`), default `warn`
//! - `PDBEX_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `PDBEX_LOG_FILE`: Optional log file path, or a directory to receive a dated log file

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::env;

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_VAR: &str = "PDBEX_LOG_FORMAT";

/// Environment variable enabling file output.
pub const LOG_FILE_VAR: &str = "PDBEX_LOG_FILE";

/// Level used when neither `RUST_LOG` nor an explicit level is given.
const DEFAULT_LEVEL: Level = Level::WARN;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    #[default]
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl LogFormat
{
    /// Format named by `PDBEX_LOG_FORMAT`, falling back to [`LogFormat::Pretty`].
    pub fn from_env() -> Self
    {
        env::var(LOG_FORMAT_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(format!(
                "{s}. Use 'pretty' or 'json'"
            ))),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(format!(
                "{s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            ))),
        }
    }
}

/// Keeps the background file writer alive.
///
/// Hold this until the process exits; dropping it flushes and stops file
/// logging. Console logging is unaffected.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug, Default)]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter, default `warn`
/// - `PDBEX_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `PDBEX_LOG_FILE`: Optional log file or directory
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The log file cannot be created (if `PDBEX_LOG_FILE` is set)
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    // RUST_LOG may carry per-module directives, so hand it to EnvFilter as-is
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL.to_string()));
    init_logging_internal(LogFormat::from_env(), filter)
}

/// Initialize logging with explicit level and format
///
/// The explicit level takes precedence over `RUST_LOG`.
///
/// ## Example
///
/// ```rust,no_run
/// use pdbex_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    init_logging_internal(format, EnvFilter::new(Level::from(level).to_string()))
}

fn init_logging_internal(format: LogFormat, filter: EnvFilter) -> Result<LoggingGuard, LoggingError>
{
    let mut layers: Vec<BoxedLayer> = vec![console_layer(format, filter.clone())];
    let mut file_worker = None;

    if let Some(value) = env::var_os(LOG_FILE_VAR) {
        let path = log_file_path(Path::new(&value));
        let (layer, worker) = file_layer(format, filter, &path)?;
        layers.push(layer);
        file_worker = Some(worker);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(LoggingGuard { _file: file_worker })
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, filter: EnvFilter, path: &Path) -> Result<(BoxedLayer, WorkerGuard), LoggingError>
{
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&directory)?;

    let file_name = path.file_name().unwrap_or_default();
    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    };

    Ok((layer, worker))
}

/// Resolve `PDBEX_LOG_FILE`: a directory receives `YYYY-MM-DD-pdbex.log`.
fn log_file_path(value: &Path) -> PathBuf
{
    if value.is_dir() {
        let today = Utc::now().format("%Y-%m-%d");
        value.join(format!("{today}-pdbex.log"))
    } else {
        value.to_path_buf()
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

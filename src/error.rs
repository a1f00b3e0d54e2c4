//! Unified error types for email-scraper.
//!
//! This module provides a single [`ScraperError`] enum that covers every fatal
//! error in the library. Recoverable per-email classification faults live in
//! [`crate::core::classifier::ClassificationFault`] and never surface here.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get a message naming the failing stage and input
//! - **The binary** maps each error to a distinguishable exit status

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for email-scraper operations.
///
/// # Example
///
/// ```rust
/// use email_scraper::error::Result;
/// use email_scraper::EmailRecord;
///
/// fn load_nothing() -> Result<Vec<EmailRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScraperError>;

/// The stage of a run in which a fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading the mailbox or decoding its messages.
    Load,
    /// Running a processor over the record batch.
    Processing,
    /// Rendering or saving results.
    Output,
    /// Anything else (bad arguments, registry lookups).
    Other,
}

impl Stage {
    /// Process exit status used by the binary for errors in this stage.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::Other => 1,
            Stage::Load => 2,
            Stage::Processing => 3,
            Stage::Output => 4,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Processing => write!(f, "processing"),
            Stage::Output => write!(f, "output"),
            Stage::Other => write!(f, "setup"),
        }
    }
}

/// The error type for all email-scraper operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScraperError {
    /// An I/O error outside of mailbox loading (e.g. writing output).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The mailbox could not be opened or is structurally invalid.
    ///
    /// Fatal to the whole run; no partial batch is returned.
    #[error("Failed to load mailbox {}: {source}", path.display())]
    Load {
        /// The mailbox path
        path: PathBuf,
        /// What went wrong
        #[source]
        source: LoadErrorKind,
    },

    /// A message field could not be interpreted as UTF-8 text.
    #[error("Failed to decode {field} as UTF-8: {source}")]
    Decoding {
        /// The header name or `"body"`
        field: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::str::Utf8Error,
    },

    /// A processor failed internally and the run was aborted.
    #[error("Processor '{processor}' failed: {message}")]
    Processor {
        /// Name of the failing processor
        processor: String,
        /// Description of the fault
        message: String,
    },

    /// Piped input could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No processor is registered under this name.
    #[error("Unknown processor: '{name}'. Expected one of: {}", known.join(", "))]
    UnknownProcessor {
        /// The requested name
        name: String,
        /// Registered names
        known: Vec<String>,
    },

    /// No formatter is registered under this name.
    #[error("Unknown format: '{name}'. Expected one of: {}", known.join(", "))]
    UnknownFormat {
        /// The requested name
        name: String,
        /// Registered names
        known: Vec<String>,
    },

    /// Nested data was passed to a flat formatter in checked mode.
    #[error("Data is nested under '{key}'; retry with --unchecked")]
    NestedData {
        /// The top-level key holding nested data
        key: String,
    },

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// YAML serialization error.
    #[cfg(feature = "yaml-output")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Kinds of mailbox load failures.
#[derive(Debug, Error)]
pub enum LoadErrorKind {
    /// The file could not be read
    #[error("{0}")]
    Io(#[from] io::Error),
    /// The file is not an mbox container
    #[error("not an mbox file: {0}")]
    InvalidContainer(String),
    /// A single message exceeded the configured maximum size
    #[error("message {index} is {actual_size} bytes (maximum: {max_size} bytes)")]
    MessageTooLarge {
        /// Position of the message in the file
        index: usize,
        /// Maximum allowed size in bytes
        max_size: usize,
        /// Actual size encountered
        actual_size: usize,
    },
    /// A message could not be parsed as RFC 5322
    #[error("message {index}: {source}")]
    Message {
        /// Position of the message in the file
        index: usize,
        /// The underlying parse error
        #[source]
        source: mailparse::MailParseError,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ScraperError {
    /// Creates a load error for the given mailbox path.
    pub fn load(path: impl Into<PathBuf>, source: impl Into<LoadErrorKind>) -> Self {
        ScraperError::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a decoding error for a header or the body.
    pub fn decoding(field: impl Into<String>, source: std::str::Utf8Error) -> Self {
        ScraperError::Decoding {
            field: field.into(),
            source,
        }
    }

    /// Creates a processor fault.
    pub fn processor(processor: impl Into<String>, message: impl Into<String>) -> Self {
        ScraperError::Processor {
            processor: processor.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ScraperError::InvalidInput(message.into())
    }

    /// Returns the stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ScraperError::Load { .. } | ScraperError::Decoding { .. } => Stage::Load,
            ScraperError::InvalidInput(_) => Stage::Load,
            ScraperError::Processor { .. } => Stage::Processing,
            ScraperError::Io(_) | ScraperError::NestedData { .. } | ScraperError::Json(_) => {
                Stage::Output
            }
            #[cfg(feature = "csv-output")]
            ScraperError::Csv(_) => Stage::Output,
            #[cfg(feature = "yaml-output")]
            ScraperError::Yaml(_) => Stage::Output,
            ScraperError::UnknownProcessor { .. } | ScraperError::UnknownFormat { .. } => {
                Stage::Other
            }
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        self.stage().exit_code()
    }

    /// Returns `true` if this is a mailbox load error.
    pub fn is_load(&self) -> bool {
        matches!(self, ScraperError::Load { .. })
    }

    /// Returns `true` if this is a decoding error.
    pub fn is_decoding(&self) -> bool {
        matches!(self, ScraperError::Decoding { .. })
    }

    /// Returns `true` if this is a processor fault.
    pub fn is_processor(&self) -> bool {
        matches!(self, ScraperError::Processor { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

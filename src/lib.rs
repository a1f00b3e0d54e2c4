//! # email-scraper
//!
//! A Rust library for auditing archived job-application email: read mbox
//! files, normalize each message into an [`EmailRecord`], and run pluggable
//! analysis steps over the batch.
//!
//! ## Overview
//!
//! - **Loading** - [`mbox::MboxReader`] splits an mbox file; each message is
//!   decoded into an [`EmailRecord`]
//! - **Processing** - every [`Processor`](core::Processor) receives the same
//!   read-only batch; results are merged by processor name
//! - **Built-in processors** - [`StatisticsProcessor`](core::StatisticsProcessor)
//!   (counts, top senders/subjects, date range) and
//!   [`Classifier`](core::Classifier) (keyword categories with confidence)
//! - **Output** - JSON, CSV or YAML through [`format::Formatter`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use email_scraper::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let registry = Registry::with_defaults();
//!     let processors = registry.processors(["statistics", "classifier"])?;
//!
//!     let pipeline = Pipeline::new(MboxReader::new());
//!     let results = pipeline.run(Path::new("inbox.mbox"), &processors)?;
//!
//!     let json = registry.formatter("json")?;
//!     println!("{}", json.format(&results, &FormatOptions::new())?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`record`] - [`EmailRecord`], [`Headers`](record::Headers)
//! - [`mbox`] - [`MailboxReader`](mbox::MailboxReader), [`MboxReader`](mbox::MboxReader)
//! - [`core`] - processors, pipeline and result writers
//! - [`format`] - [`Formatter`](format::Formatter) implementations
//! - [`registry`] - [`Registry`](registry::Registry) of processors and formatters
//! - [`config`] - configuration structs
//! - [`error`] - [`ScraperError`], [`Result`]
//! - [`cli`] - command-line definitions (feature `cli`)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod mbox;
pub mod record;
pub mod registry;

// Re-export the main types at the crate root for convenience
pub use error::{Result, ScraperError};
pub use record::EmailRecord;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use email_scraper::prelude::*;
/// ```
pub mod prelude {
    pub use crate::EmailRecord;

    pub use crate::error::{Result, ScraperError};

    pub use crate::config::{ClassifierConfig, FormatOptions, MboxConfig, StatisticsConfig};

    pub use crate::core::{
        Category, Classification, Classifier, Pipeline, PipelineResults, Processor,
        StatisticsProcessor, run_processors,
    };

    pub use crate::format::Formatter;
    pub use crate::mbox::{MailboxReader, MboxReader};
    pub use crate::registry::Registry;
}

//! Core processing logic for email-scraper.
//!
//! This module contains:
//! - [`processor`] - The [`Processor`] contract and the [`Pipeline`]
//! - [`statistics`] - Aggregate counts and date range
//! - [`classifier`] - Keyword categorization with confidence scoring
//! - [`output`] - Result writers (JSON, CSV, YAML)
//!
//! # Quick Start
//!
//! ```rust
//! use email_scraper::core::{Classifier, Processor, StatisticsProcessor, run_processors};
//! use email_scraper::EmailRecord;
//!
//! let records = vec![EmailRecord::new("hr@acme.com", "Interview", "", "Can we schedule a call?")];
//! let stats = StatisticsProcessor::new();
//! let classifier = Classifier::new();
//!
//! let results = run_processors(&records, &[&stats, &classifier])?;
//! assert_eq!(results["classifier"]["classifications"][0]["category"], "Interview request");
//! # Ok::<(), email_scraper::ScraperError>(())
//! ```

pub mod classifier;
pub mod output;
pub mod processor;
pub mod statistics;

pub use classifier::{Category, Classification, ClassificationReport, Classifier, KeywordTable};
pub use processor::{Pipeline, PipelineResults, Processor, run_processors};
pub use statistics::{Statistics, StatisticsProcessor};

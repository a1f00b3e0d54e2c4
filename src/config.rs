//! Configuration types for the reader, processors and formatters.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. Every struct has a [`Default`]
//! that reproduces the tool's stock behavior.
//!
//! # Example
//!
//! ```rust
//! use email_scraper::config::{ClassifierConfig, StatisticsConfig};
//! use email_scraper::core::{Classifier, StatisticsProcessor};
//!
//! let stats = StatisticsProcessor::with_config(StatisticsConfig::new().with_top_n(5));
//! let classifier = Classifier::with_config(ClassifierConfig::new()).unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::core::classifier::KeywordTable;

/// Default ceiling for a single message or search text: 10MB.
pub const DEFAULT_MAX_SIZE: usize = 10 * 1024 * 1024;

/// Configuration for reading mbox files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MboxConfig {
    /// Maximum size of a single message in bytes (default: 10MB)
    pub max_message_size: usize,
}

impl Default for MboxConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl MboxConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum message size.
    #[must_use]
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }
}

/// Configuration for the statistics processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// How many senders/subjects to keep in the ranked lists (default: 10)
    pub top_n: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl StatisticsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Configuration for the keyword classifier.
///
/// # Example
///
/// ```rust
/// use email_scraper::config::ClassifierConfig;
///
/// let config = ClassifierConfig::new().with_max_text_size(64 * 1024);
/// assert_eq!(config.max_text_size, 64 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Category → keyword phrases, in scoring order
    pub keywords: KeywordTable,

    /// Maximum size of `subject + " " + content` in bytes (default: 10MB,
    /// the same ceiling as a single mbox message).
    ///
    /// This is a deliberate resource limit, not a parse failure: an email
    /// above it is reported as `"Processing Error"` with confidence `0.0`
    /// instead of being scored, and the rest of the batch is still
    /// classified. Raise it with [`with_max_text_size`](Self::with_max_text_size)
    /// for archives with unusually large bodies; `usize::MAX` disables it.
    pub max_text_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordTable::default(),
            max_text_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the keyword table.
    #[must_use]
    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    /// Sets the maximum search text size.
    #[must_use]
    pub fn with_max_text_size(mut self, size: usize) -> Self {
        self.max_text_size = size;
        self
    }
}

/// Options passed to every formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Skip the nested-data check in flat formats (CSV)
    pub unchecked: bool,

    /// Field delimiter for CSV output (default: `,`)
    pub delimiter: u8,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            unchecked: false,
            delimiter: b',',
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unchecked(mut self, unchecked: bool) -> Self {
        self.unchecked = unchecked;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

//! Processor contract and the pipeline that runs processors over a mailbox.
//!
//! # Example
//!
//! ```rust,no_run
//! use email_scraper::core::{Classifier, Pipeline, Processor, StatisticsProcessor};
//! use email_scraper::mbox::MboxReader;
//! use std::path::Path;
//!
//! let stats = StatisticsProcessor::new();
//! let classifier = Classifier::new();
//! let processors: Vec<&dyn Processor> = vec![&stats, &classifier];
//!
//! let pipeline = Pipeline::new(MboxReader::new());
//! let results = pipeline.run(Path::new("inbox.mbox"), &processors)?;
//! assert!(results.contains_key("statistics"));
//! # Ok::<(), email_scraper::ScraperError>(())
//! ```

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Result, ScraperError};
use crate::mbox::MailboxReader;
use crate::record::EmailRecord;

/// Combined pipeline output: processor name → processor result.
///
/// Keys keep the order processors ran in.
pub type PipelineResults = serde_json::Map<String, serde_json::Value>;

/// An analysis stage over a record batch.
///
/// Implementations receive the batch as an immutable slice and must not keep
/// state between calls, so a run can be repeated with identical results.
///
/// # Example Implementation
///
/// ```rust
/// use email_scraper::core::Processor;
/// use email_scraper::{EmailRecord, Result};
///
/// struct CountProcessor;
///
/// impl Processor for CountProcessor {
///     fn name(&self) -> &'static str { "count" }
///     fn description(&self) -> &'static str { "Counts emails." }
///
///     fn process(&self, records: &[EmailRecord]) -> Result<serde_json::Value> {
///         Ok(serde_json::json!({ "count": records.len() }))
///     }
/// }
/// ```
pub trait Processor: Send + Sync {
    /// Unique name, used as the registry key and result key.
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    /// Analyzes the batch.
    ///
    /// An `Err` aborts the whole pipeline run.
    fn process(&self, records: &[EmailRecord]) -> Result<serde_json::Value>;
}

/// Loads a mailbox once and runs processors over it in order.
pub struct Pipeline<R> {
    reader: R,
}

impl<R: MailboxReader> Pipeline<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads every message and converts it to an [`EmailRecord`].
    ///
    /// Any read, parse or decoding failure aborts the load; no partial batch
    /// is returned.
    pub fn load(&self, source: &Path) -> Result<Vec<EmailRecord>> {
        let start = Instant::now();
        let raw = self.reader.read(source)?;

        let records = raw
            .iter()
            .map(|message| {
                let parsed = message.parse().map_err(|e| ScraperError::load(source, e))?;
                EmailRecord::from_parsed(&parsed)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            reader = self.reader.name(),
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded mailbox"
        );
        Ok(records)
    }

    /// Loads `source` then runs `processors` against the shared batch.
    pub fn run(&self, source: &Path, processors: &[&dyn Processor]) -> Result<PipelineResults> {
        let records = self.load(source)?;
        run_processors(&records, processors)
    }
}

/// Runs `processors` in order over an already loaded batch.
///
/// A later processor with the same name as an earlier one overwrites its
/// result. Processor errors are not caught.
pub fn run_processors(
    records: &[EmailRecord],
    processors: &[&dyn Processor],
) -> Result<PipelineResults> {
    let mut results = PipelineResults::new();

    for processor in processors {
        let start = Instant::now();
        debug!(processor = processor.name(), "running processor");
        let output = processor.process(records)?;
        info!(
            processor = processor.name(),
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "processor finished"
        );
        results.insert(processor.name().to_string(), output);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Classifier, StatisticsProcessor};
    use crate::mbox::RawMessage;
    use serde_json::json;

    struct MemoryReader(Vec<&'static [u8]>);

    impl MailboxReader for MemoryReader {
        fn name(&self) -> &'static str {
            "memory"
        }

        fn read(&self, _path: &Path) -> Result<Vec<RawMessage>> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, bytes)| RawMessage::new(i, *bytes))
                .collect())
        }
    }

    struct Fixed(&'static str, serde_json::Value);

    impl Processor for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "fixed output"
        }

        fn process(&self, _records: &[EmailRecord]) -> Result<serde_json::Value> {
            Ok(self.1.clone())
        }
    }

    struct Failing;

    impl Processor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn description(&self) -> &'static str {
            "always fails"
        }

        fn process(&self, _records: &[EmailRecord]) -> Result<serde_json::Value> {
            Err(ScraperError::processor("failing", "boom"))
        }
    }

    fn reader() -> MemoryReader {
        MemoryReader(vec![
            &b"From: a@example.com\r\nSubject: Interview\r\n\r\nschedule a call"[..],
            &b"From: b@example.com\r\nSubject: Update\r\n\r\nunfortunately"[..],
        ])
    }

    #[test]
    fn test_load_converts_in_order() {
        let records = Pipeline::new(reader()).load(Path::new("mem")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sender(), "a@example.com");
        assert_eq!(records[1].sender(), "b@example.com");
    }

    #[test]
    fn test_run_merges_by_name() {
        let stats = StatisticsProcessor::new();
        let classifier = Classifier::new();
        let results = Pipeline::new(reader())
            .run(Path::new("mem"), &[&stats, &classifier])
            .unwrap();

        let keys: Vec<_> = results.keys().cloned().collect();
        assert_eq!(keys, vec!["statistics", "classifier"]);
        assert_eq!(results["statistics"]["total_messages"], 2);
        assert_eq!(
            results["classifier"]["classifications"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let first = Fixed("same", json!(1));
        let second = Fixed("same", json!(2));
        let results = run_processors(&[], &[&first, &second]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results["same"], json!(2));
    }

    #[test]
    fn test_processor_error_aborts_run() {
        let stats = StatisticsProcessor::new();
        let err = Pipeline::new(reader())
            .run(Path::new("mem"), &[&stats, &Failing])
            .unwrap_err();
        assert!(err.is_processor());
    }

    #[test]
    fn test_decoding_error_aborts_load() {
        let bad: &'static [u8] =
            b"From: a@example.com\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n\xff\xfe";
        let reader = MemoryReader(vec![&b"From: ok@example.com\r\n\r\nfine"[..], bad]);
        let err = Pipeline::new(reader).load(Path::new("mem")).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_run_is_repeatable() {
        let stats = StatisticsProcessor::new();
        let classifier = Classifier::new();
        let pipeline = Pipeline::new(reader());
        let first = pipeline.run(Path::new("mem"), &[&stats, &classifier]).unwrap();
        let second = pipeline.run(Path::new("mem"), &[&stats, &classifier]).unwrap();
        assert_eq!(first, second);
    }
}

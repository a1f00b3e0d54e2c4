//! Aggregate statistics over a record batch.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::StatisticsConfig;
use crate::core::processor::Processor;
use crate::error::Result;
use crate::record::EmailRecord;

/// Frequency counter that remembers first-seen order.
#[derive(Debug, Clone, Default)]
struct Counter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl Counter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    /// Most frequent first; equal counts stay in first-seen order.
    fn most_common(&self, n: usize) -> RankedCounts {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        RankedCounts(ranked)
    }
}

/// Ordered `(value, count)` list, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts(pub Vec<(String, usize)>);

impl RankedCounts {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Earliest and latest parseable dates, as RFC 3339 strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Output of [`StatisticsProcessor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_messages: usize,
    pub unique_senders: usize,
    pub top_senders: RankedCounts,
    pub date_range: DateRange,
    pub top_subjects: RankedCounts,
}

/// Counts messages, senders, subjects and the date span of a batch.
///
/// # Example
///
/// ```rust
/// use email_scraper::core::StatisticsProcessor;
/// use email_scraper::EmailRecord;
///
/// let records = vec![
///     EmailRecord::new("a@x.com", "Hi", "Mon, 15 Jan 2024 10:00:00 +0000", ""),
///     EmailRecord::new("a@x.com", "Re: Hi", "", ""),
/// ];
/// let stats = StatisticsProcessor::new().compute(&records);
///
/// assert_eq!(stats.total_messages, 2);
/// assert_eq!(stats.unique_senders, 1);
/// assert_eq!(stats.top_senders.get("a@x.com"), Some(2));
/// assert_eq!(stats.date_range.start.as_deref(), Some("2024-01-15T10:00:00+00:00"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatisticsProcessor {
    config: StatisticsConfig,
}

impl StatisticsProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StatisticsConfig) -> Self {
        Self { config }
    }

    /// Single pass over `records`.
    pub fn compute(&self, records: &[EmailRecord]) -> Statistics {
        let mut senders = Counter::default();
        let mut subjects = Counter::default();
        let mut dates: Vec<DateTime<FixedOffset>> = Vec::new();

        for record in records {
            if !record.sender().is_empty() {
                senders.add(record.sender());
            }
            if let Some(date) = record.parsed_date() {
                dates.push(date);
            }
            if !record.subject().is_empty() {
                subjects.add(record.subject());
            }
        }

        let date_range = match (dates.iter().min(), dates.iter().max()) {
            (Some(start), Some(end)) => DateRange {
                start: Some(start.to_rfc3339()),
                end: Some(end.to_rfc3339()),
            },
            _ => DateRange::default(),
        };

        Statistics {
            total_messages: records.len(),
            unique_senders: senders.len(),
            top_senders: senders.most_common(self.config.top_n),
            date_range,
            top_subjects: subjects.most_common(self.config.top_n),
        }
    }
}

impl Processor for StatisticsProcessor {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn description(&self) -> &'static str {
        "Generates basic email statistics."
    }

    fn process(&self, records: &[EmailRecord]) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.compute(records))?)
    }
}

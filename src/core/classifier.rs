//! Keyword-based category classification.
//!
//! Every email is scored against a [`KeywordTable`]: each keyword found
//! (case-insensitive substring) in `subject + " " + content` adds one point
//! to its category. The best-scoring category wins; its confidence is the
//! margin over the runner-up, normalized by the winning score.
//!
//! | Outcome | Category | Confidence |
//! |---------|----------|------------|
//! | no keyword matched | `Other` | `1.0` |
//! | single best category | that category | `(s1 - s2) / s1` |
//! | tie for best score | `Human Review Needed` | `0.5` |
//! | fault while scoring | `Processing Error` | `0.0` |
//!
//! # Example
//!
//! ```rust
//! use email_scraper::core::classifier::{Category, Classifier};
//! use email_scraper::EmailRecord;
//!
//! let classifier = Classifier::new();
//! let email = EmailRecord::new("hr@acme.com", "Job Offer", "", "Congratulations!");
//! let result = classifier.classify(&email);
//!
//! assert_eq!(result.category, Category::Offer);
//! assert_eq!(result.confidence, 1.0);
//! assert_eq!(result.matched_keywords, vec!["congratulations", "job offer"]);
//! ```

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::core::processor::Processor;
use crate::error::{Result, ScraperError};
use crate::record::EmailRecord;

/// Confidence reported when two or more categories tie for the best score.
pub const TIE_CONFIDENCE: f64 = 0.5;

/// Classification labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Application confirmation")]
    ApplicationConfirmation,
    #[serde(rename = "OA invitation")]
    OaInvitation,
    #[serde(rename = "Interview request")]
    InterviewRequest,
    Rejection,
    Offer,
    Other,
    /// Two or more categories tied for the best score.
    #[serde(rename = "Human Review Needed")]
    HumanReviewNeeded,
    /// Scoring failed for this email.
    #[serde(rename = "Processing Error")]
    ProcessingError,
}

impl Category {
    /// The label used in output.
    pub fn label(&self) -> &'static str {
        match self {
            Category::ApplicationConfirmation => "Application confirmation",
            Category::OaInvitation => "OA invitation",
            Category::InterviewRequest => "Interview request",
            Category::Rejection => "Rejection",
            Category::Offer => "Offer",
            Category::Other => "Other",
            Category::HumanReviewNeeded => "Human Review Needed",
            Category::ProcessingError => "Processing Error",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered mapping from category to keyword phrases.
///
/// Iteration order drives both scoring and the order of matched keywords.
/// Each category appears once and each keyword once per category; repeats
/// are merged into the first occurrence when the table is built or
/// deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<(Category, Vec<String>)>",
    into = "Vec<(Category, Vec<String>)>"
)]
pub struct KeywordTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl KeywordTable {
    /// Builds a table from `(category, keywords)` pairs, in order.
    ///
    /// A category listed again has its keywords appended to the first
    /// entry; repeated keywords are dropped.
    ///
    /// ```rust
    /// use email_scraper::core::{Category, KeywordTable};
    ///
    /// let table = KeywordTable::new([
    ///     (Category::Offer, vec!["job offer"]),
    ///     (Category::Rejection, vec!["unfortunately"]),
    ///     (Category::Offer, vec!["welcome aboard", "job offer"]),
    /// ]);
    /// assert_eq!(table.categories().count(), 2);
    /// assert_eq!(table.keywords(Category::Offer).unwrap(), ["job offer", "welcome aboard"]);
    /// ```
    pub fn new<I, K, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged: Vec<(Category, Vec<String>)> = Vec::new();
        for (category, keywords) in entries {
            let index = match merged.iter().position(|(c, _)| *c == category) {
                Some(index) => index,
                None => {
                    merged.push((category, Vec::new()));
                    merged.len() - 1
                }
            };
            let slot = &mut merged[index].1;
            for keyword in keywords {
                let keyword = keyword.into();
                if !slot.contains(&keyword) {
                    slot.push(keyword);
                }
            }
        }
        Self { entries: merged }
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn keywords(&self, category: Category) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, k)| k.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.entries.iter().map(|(c, k)| (*c, k.as_slice()))
    }
}

impl From<Vec<(Category, Vec<String>)>> for KeywordTable {
    fn from(entries: Vec<(Category, Vec<String>)>) -> Self {
        Self::new(entries)
    }
}

impl From<KeywordTable> for Vec<(Category, Vec<String>)> {
    fn from(table: KeywordTable) -> Self {
        table.entries
    }
}

impl Default for KeywordTable {
    /// The stock job-application table.
    fn default() -> Self {
        KeywordTable::new([
            (
                Category::ApplicationConfirmation,
                vec![
                    "thank you for applying",
                    "application received",
                    "we have received your application",
                    "thank you so much for taking the time to apply",
                ],
            ),
            (
                Category::OaInvitation,
                vec![
                    "online assessment",
                    "coding test",
                    "hackerrank",
                    "codeSignal",
                    "assessment link",
                ],
            ),
            (
                Category::InterviewRequest,
                vec![
                    "interview",
                    "schedule a call",
                    "speak with you",
                    "chat about your application",
                ],
            ),
            (
                Category::Rejection,
                vec![
                    "unfortunately",
                    "we regret to inform you",
                    "not moving forward",
                    "consider other candidates",
                    "decided not to move forward with your application",
                ],
            ),
            (
                Category::Offer,
                vec![
                    "excited to offer",
                    "we are pleased to offer",
                    "congratulations",
                    "job offer",
                ],
            ),
            (Category::Other, vec![]),
        ])
    }
}

/// Per-email classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Echoed from the input email; not unique
    pub subject: String,
    pub category: Category,
    /// In `[0.0, 1.0]`
    pub confidence: f64,
    /// Keywords as declared in the table, in discovery order
    pub matched_keywords: Vec<String>,
}

/// Output of [`Classifier::classify_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classifications: Vec<Classification>,
}

/// A recoverable fault while scoring one email.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClassificationFault {
    /// The search text exceeds the configured limit.
    #[error("text too large: {actual_size} bytes (maximum: {max_size} bytes)")]
    TextTooLarge { max_size: usize, actual_size: usize },
}

struct CompiledKeyword {
    category_index: usize,
    keyword: String,
    pattern: Regex,
}

/// Keyword classifier.
///
/// Holds only the compiled keyword table; classifying never mutates it, so
/// repeated runs over the same records give identical results.
pub struct Classifier {
    categories: Vec<Category>,
    keywords: Vec<CompiledKeyword>,
    max_text_size: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Creates a classifier with the stock keyword table.
    pub fn new() -> Self {
        // Escaped literal patterns from the stock table always compile.
        Self::with_config(ClassifierConfig::default())
            .expect("stock keyword table compiles")
    }

    /// Creates a classifier from a custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        let mut categories = Vec::new();
        let mut keywords = Vec::new();

        for (category_index, (category, phrases)) in config.keywords.iter().enumerate() {
            categories.push(category);
            for phrase in phrases {
                let pattern = RegexBuilder::new(&regex::escape(phrase))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ScraperError::processor(
                            "classifier",
                            format!("invalid keyword '{phrase}': {e}"),
                        )
                    })?;
                keywords.push(CompiledKeyword {
                    category_index,
                    keyword: phrase.clone(),
                    pattern,
                });
            }
        }

        Ok(Self {
            categories,
            keywords,
            max_text_size: config.max_text_size,
        })
    }

    /// Classifies one email. Faults are reported in-band as
    /// [`Category::ProcessingError`].
    pub fn classify(&self, email: &EmailRecord) -> Classification {
        let (category, confidence, matched_keywords) = match self.score(email) {
            Ok((scores, matched)) => {
                let (category, confidence) = self.decide(&scores);
                (category, confidence, matched)
            }
            Err(fault) => {
                warn!(subject = email.subject(), "classification failed: {fault}");
                (
                    Category::ProcessingError,
                    0.0,
                    vec![format!("Error: {fault}")],
                )
            }
        };

        Classification {
            subject: email.subject().to_string(),
            category,
            confidence,
            matched_keywords,
        }
    }

    /// Classifies every email, in input order.
    pub fn classify_all(&self, emails: &[EmailRecord]) -> ClassificationReport {
        let classifications: Vec<_> = emails.iter().map(|e| self.classify(e)).collect();
        debug!(count = classifications.len(), "classified emails");
        ClassificationReport { classifications }
    }

    /// Per-category scores (table order) and matched keywords.
    fn score(
        &self,
        email: &EmailRecord,
    ) -> std::result::Result<(Vec<usize>, Vec<String>), ClassificationFault> {
        let text_size = email.subject().len() + 1 + email.content().len();
        if text_size > self.max_text_size {
            return Err(ClassificationFault::TextTooLarge {
                max_size: self.max_text_size,
                actual_size: text_size,
            });
        }

        let text = format!("{} {}", email.subject(), email.content());
        let mut scores = vec![0; self.categories.len()];
        let mut matched = Vec::new();

        for keyword in &self.keywords {
            if keyword.pattern.is_match(&text) {
                scores[keyword.category_index] += 1;
                matched.push(keyword.keyword.clone());
            }
        }

        Ok((scores, matched))
    }

    fn decide(&self, scores: &[usize]) -> (Category, f64) {
        let mut ranked: Vec<usize> = scores.iter().copied().filter(|&s| s > 0).collect();
        if ranked.is_empty() {
            return (Category::Other, 1.0);
        }
        ranked.sort_unstable_by(|a, b| b.cmp(a));

        let best = ranked[0];
        let mut leaders = scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == best)
            .map(|(i, _)| self.categories[i]);

        match (leaders.next(), leaders.next()) {
            (Some(category), None) => {
                let runner_up = ranked.get(1).copied().unwrap_or(0);
                (category, (best - runner_up) as f64 / best as f64)
            }
            _ => (Category::HumanReviewNeeded, TIE_CONFIDENCE),
        }
    }
}

impl Processor for Classifier {
    fn name(&self) -> &'static str {
        "classifier"
    }

    fn description(&self) -> &'static str {
        "Classifies emails into categories based on keywords."
    }

    fn process(&self, records: &[EmailRecord]) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.classify_all(records))?)
    }
}

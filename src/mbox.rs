//! Mailbox reading.
//!
//! [`MailboxReader`] is the seam between the pipeline and the storage format;
//! [`MboxReader`] is the stock implementation for mbox files, framed by
//! `mail_parser`. Each message in the file starts with a `From ` separator
//! line, which is dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! use email_scraper::mbox::{MailboxReader, MboxReader};
//! use std::path::Path;
//!
//! let messages = MboxReader::new().read(Path::new("inbox.mbox"))?;
//! for message in &messages {
//!     let record = message.to_record()?;
//!     println!("{}", record.subject());
//! }
//! # Ok::<(), email_scraper::ScraperError>(())
//! ```

use std::fs;
use std::path::Path;

use mail_parser::mailbox::mbox::MessageIterator;
use tracing::debug;

use crate::config::MboxConfig;
use crate::error::{LoadErrorKind, Result, ScraperError};
use crate::record::EmailRecord;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// One undecoded message from a mailbox, separator line removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    index: usize,
    bytes: Vec<u8>,
}

impl RawMessage {
    pub fn new(index: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            index,
            bytes: bytes.into(),
        }
    }

    /// Position of the message in its mailbox.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parses the message headers and MIME structure.
    pub fn parse(&self) -> std::result::Result<mailparse::ParsedMail<'_>, LoadErrorKind> {
        mailparse::parse_mail(&self.bytes).map_err(|source| LoadErrorKind::Message {
            index: self.index,
            source,
        })
    }

    /// Parses the message and converts it into an [`EmailRecord`].
    pub fn to_record(&self) -> Result<EmailRecord> {
        let parsed = self
            .parse()
            .map_err(|e| ScraperError::invalid_input(e.to_string()))?;
        EmailRecord::from_parsed(&parsed)
    }
}

/// Source of raw messages for the pipeline.
///
/// Implementations return messages in file order. Failing to open the
/// source, or finding it structurally invalid, is fatal.
pub trait MailboxReader {
    /// Human-readable name of the container format.
    fn name(&self) -> &'static str;

    /// Reads every message from `path`.
    fn read(&self, path: &Path) -> Result<Vec<RawMessage>>;
}

/// Reader for mbox (mboxo/mboxrd) files.
#[derive(Debug, Clone, Default)]
pub struct MboxReader {
    config: MboxConfig,
}

impl MboxReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MboxConfig) -> Self {
        Self { config }
    }

    /// Splits in-memory mbox content into messages.
    ///
    /// Separator lines and `>From ` quoting are handled by
    /// [`mail_parser`]'s mbox iterator. A leading UTF-8 byte order mark is
    /// ignored. Empty or whitespace-only content yields no messages; content
    /// whose first non-blank line is not a `From ` separator is rejected.
    pub fn split(&self, content: &[u8]) -> std::result::Result<Vec<RawMessage>, LoadErrorKind> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let first_line = content
            .split(|&b| b == b'\n')
            .find(|line| !line.iter().all(u8::is_ascii_whitespace));
        match first_line {
            None => return Ok(Vec::new()),
            Some(line) if !line.starts_with(b"From ") => {
                let preview = String::from_utf8_lossy(line);
                return Err(LoadErrorKind::InvalidContainer(format!(
                    "expected a 'From ' separator line, found '{}'",
                    preview.trim_end()
                )));
            }
            Some(_) => {}
        }

        MessageIterator::new(content)
            .enumerate()
            .map(|(index, message)| {
                let message = message.map_err(|e| {
                    LoadErrorKind::InvalidContainer(format!("unreadable message {index}: {e:?}"))
                })?;
                self.finish(index, message.contents().to_vec())
            })
            .collect()
    }

    fn finish(
        &self,
        index: usize,
        mut bytes: Vec<u8>,
    ) -> std::result::Result<RawMessage, LoadErrorKind> {
        // A blank line left before the next separator belongs to the container.
        if bytes.ends_with(b"\r\n\r\n") {
            bytes.truncate(bytes.len() - 2);
        } else if bytes.ends_with(b"\n\n") {
            bytes.truncate(bytes.len() - 1);
        }

        if bytes.len() > self.config.max_message_size {
            return Err(LoadErrorKind::MessageTooLarge {
                index,
                max_size: self.config.max_message_size,
                actual_size: bytes.len(),
            });
        }

        Ok(RawMessage::new(index, bytes))
    }
}

impl MailboxReader for MboxReader {
    fn name(&self) -> &'static str {
        "mbox"
    }

    fn read(&self, path: &Path) -> Result<Vec<RawMessage>> {
        let content = fs::read(path).map_err(|e| ScraperError::load(path, e))?;
        let messages = self
            .split(&content)
            .map_err(|e| ScraperError::load(path, e))?;
        debug!(
            path = %path.display(),
            bytes = content.len(),
            messages = messages.len(),
            "read mbox"
        );
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_MESSAGES: &[u8] = b"From sender1@example.com Mon Jan 15 10:30:00 2024\n\
From: sender1@example.com\n\
Subject: Test Subject 1\n\
\n\
First body\n\
\n\
From sender2@example.com Tue Jan 16 10:30:00 2024\n\
From: sender2@example.com\n\
Subject: Test Subject 2\n\
\n\
Second body\n";

    #[test]
    fn test_split_two_messages() {
        let messages = MboxReader::new().split(TWO_MESSAGES).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].index(), 0);
        assert_eq!(messages[1].index(), 1);
        assert!(messages[0].as_bytes().starts_with(b"From: sender1"));
        assert!(messages[0].as_bytes().windows(10).any(|w| w == b"First body"));
        assert!(!messages[0].as_bytes().ends_with(b"\n\n"));
    }

    #[test]
    fn test_split_ignores_byte_order_mark() {
        let mut content = UTF8_BOM.to_vec();
        content.extend_from_slice(TWO_MESSAGES);
        let messages = MboxReader::new().split(&content).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].to_record().unwrap().subject(), "Test Subject 1");
    }

    #[test]
    fn test_split_unquotes_escaped_from_lines() {
        let content = b"From a@example.com Mon Jan 15 10:30:00 2024\n\
From: a@example.com\n\
Subject: Newsletter\n\
\n\
Hello,\n\
>From the team\n";
        let messages = MboxReader::new().split(content).unwrap();
        assert_eq!(messages.len(), 1);

        let record = messages[0].to_record().unwrap();
        assert!(record.content().contains("\nFrom the team"));
        assert!(!record.content().contains(">From"));
    }

    #[test]
    fn test_split_empty() {
        assert!(MboxReader::new().split(b"").unwrap().is_empty());
        assert!(MboxReader::new().split(b"\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_split_rejects_non_mbox() {
        let err = MboxReader::new()
            .split(b"Subject: hi\n\nbody\n")
            .unwrap_err();
        assert!(matches!(err, LoadErrorKind::InvalidContainer(_)));
    }

    #[test]
    fn test_split_message_too_large() {
        let reader = MboxReader::with_config(MboxConfig::new().with_max_message_size(10));
        let err = reader.split(TWO_MESSAGES).unwrap_err();
        assert!(matches!(err, LoadErrorKind::MessageTooLarge { index: 0, .. }));
    }

    #[test]
    fn test_to_record() {
        let messages = MboxReader::new().split(TWO_MESSAGES).unwrap();
        let record = messages[1].to_record().unwrap();
        assert_eq!(record.sender(), "sender2@example.com");
        assert_eq!(record.subject(), "Test Subject 2");
        assert!(record.content().contains("Second body"));
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TWO_MESSAGES).unwrap();

        let messages = MboxReader::new().read(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let err = MboxReader::new()
            .read(Path::new("/nonexistent/inbox.mbox"))
            .unwrap_err();
        assert!(err.is_load());
        assert!(err.to_string().contains("/nonexistent/inbox.mbox"));
    }
}

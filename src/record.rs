//! Normalized email record.
//!
//! This module provides [`EmailRecord`], the representation of one parsed
//! email message that every processor consumes. Records are built once per
//! load from raw mailbox messages and are read-only afterwards.
//!
//! # Examples
//!
//! ## From raw RFC 5322 bytes
//!
//! ```
//! use email_scraper::EmailRecord;
//!
//! let raw = b"From: hr@example.com\r\nSubject: Hello\r\nDate: Thu, 02 Jan 2025 12:00:00 +0000\r\n\r\nBody";
//! let record = EmailRecord::from_raw(raw)?;
//!
//! assert_eq!(record.sender(), "hr@example.com");
//! assert_eq!(record.content(), "Body");
//! assert!(record.parsed_date().is_some());
//! # Ok::<(), email_scraper::ScraperError>(())
//! ```
//!
//! ## Serialization
//!
//! The raw date is stored under the `date` key so batches can be piped
//! between commands:
//!
//! ```
//! use email_scraper::EmailRecord;
//!
//! let record = EmailRecord::new("a@example.com", "Hi", "not a date", "text");
//! let json = serde_json::to_string(&record)?;
//! assert!(json.contains(r#""date":"not a date""#));
//!
//! let parsed: EmailRecord = serde_json::from_str(&json)?;
//! assert_eq!(parsed, record);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset};
use mailparse::ParsedMail;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScraperError};

/// One parsed email.
///
/// | Field | Source |
/// |-------|--------|
/// | `sender` | last `From` header, or empty |
/// | `subject` | last `Subject` header, or empty |
/// | `date_raw` | last `Date` header, or empty |
/// | `content` | flattened body text |
/// | `headers` | every header in message order, duplicates collapsed |
///
/// The parsed timestamp is not stored; see [`parsed_date`](Self::parsed_date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    sender: String,
    subject: String,
    #[serde(rename = "date")]
    date_raw: String,
    content: String,
    #[serde(default)]
    headers: Headers,
}

impl EmailRecord {
    /// Creates a record with no headers.
    pub fn new(
        sender: impl Into<String>,
        subject: impl Into<String>,
        date_raw: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            subject: subject.into(),
            date_raw: date_raw.into(),
            content: content.into(),
            headers: Headers::new(),
        }
    }

    /// Attaches a header map.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Parses raw message bytes and builds a record from them.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw).map_err(|e| {
            ScraperError::invalid_input(format!("message is not valid RFC 5322: {e}"))
        })?;
        Self::from_parsed(&parsed)
    }

    /// Builds a record from an already parsed message.
    ///
    /// Header values are stored raw: RFC 2047 encoded words stay encoded.
    /// Fails with [`ScraperError::Decoding`] when a header value or a
    /// UTF-8/ASCII text body is not valid UTF-8.
    pub fn from_parsed(mail: &ParsedMail<'_>) -> Result<Self> {
        // Values are kept exactly as received; encoded words are not decoded.
        let mut raw_values = Vec::with_capacity(mail.headers.len());
        for header in &mail.headers {
            let key = header.get_key();
            let value = std::str::from_utf8(header.get_value_raw())
                .map_err(|e| ScraperError::decoding(key.clone(), e))?;
            raw_values.push((key, value));
        }

        let last = |name: &str| {
            raw_values
                .iter()
                .rev()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_default()
        };

        let content = if mail.subparts.is_empty() {
            part_text(mail)?
        } else {
            mail.subparts
                .iter()
                .map(part_text)
                .collect::<Result<Vec<_>>>()?
                .join("\n")
        };

        Ok(Self {
            sender: last("from"),
            subject: last("subject"),
            date_raw: last("date"),
            content,
            headers: raw_values.iter().map(|(k, v)| (k.as_str(), *v)).collect(),
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The `Date` header exactly as received.
    pub fn date_raw(&self) -> &str {
        &self.date_raw
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Parses [`date_raw`](Self::date_raw) as an RFC 5322 date.
    ///
    /// Returns `None` for empty or malformed values; never fails. The result
    /// is recomputed on each call and is stable for a given raw value.
    ///
    /// ```
    /// use email_scraper::EmailRecord;
    ///
    /// let ok = EmailRecord::new("", "", "Mon, 15 Jan 2024 10:30:00 +0100", "");
    /// assert_eq!(ok.parsed_date().unwrap().to_rfc3339(), "2024-01-15T10:30:00+01:00");
    ///
    /// let bad = EmailRecord::new("", "", "yesterday", "");
    /// assert!(bad.parsed_date().is_none());
    /// ```
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.date_raw.trim();
        if raw.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc2822(raw).ok()
    }
}

/// Text of a single (sub)part after transfer decoding.
///
/// UTF-8 and ASCII parts must decode strictly; other declared charsets are
/// converted by `mailparse`.
fn part_text(part: &ParsedMail<'_>) -> Result<String> {
    let charset = part.ctype.charset.to_ascii_lowercase();
    if matches!(charset.as_str(), "utf-8" | "utf8" | "us-ascii" | "ascii") {
        let raw = part
            .get_body_raw()
            .map_err(|e| ScraperError::invalid_input(format!("undecodable body: {e}")))?;
        String::from_utf8(raw).map_err(|e| ScraperError::decoding("body", e.utf8_error()))
    } else {
        part.get_body()
            .map_err(|e| ScraperError::invalid_input(format!("undecodable body: {e}")))
    }
}

/// Ordered header map.
///
/// Keys keep the case they were received with and the position of their
/// first occurrence; a repeated key overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a header (exact key match).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Headers, A::Error> {
                let mut headers = Headers::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    headers.insert(k, v);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_from_raw_simple() {
        let raw = b"From: test@example.com\r\n\
                    Subject: Test Subject\r\n\
                    Date: Mon, 15 Jan 2024 10:30:00 +0000\r\n\
                    \r\n\
                    Test content\r\n";

        let record = EmailRecord::from_raw(raw).unwrap();

        assert_eq!(record.sender(), "test@example.com");
        assert_eq!(record.subject(), "Test Subject");
        assert_eq!(record.date_raw(), "Mon, 15 Jan 2024 10:30:00 +0000");
        assert!(record.content().contains("Test content"));
        assert_eq!(
            record.parsed_date().unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_headers_are_empty() {
        let record = EmailRecord::from_raw(b"X-Custom: 1\r\n\r\nbody").unwrap();
        assert_eq!(record.sender(), "");
        assert_eq!(record.subject(), "");
        assert_eq!(record.date_raw(), "");
        assert!(record.parsed_date().is_none());
    }

    #[test]
    fn test_header_lookup_case_insensitive_last_wins() {
        let raw = b"FROM: first@example.com\r\nfrom: second@example.com\r\n\r\nbody";
        let record = EmailRecord::from_raw(raw).unwrap();
        assert_eq!(record.sender(), "second@example.com");
    }

    #[test]
    fn test_encoded_words_stay_raw() {
        let raw = b"From: =?UTF-8?Q?Acme_HR?= <hr@acme.com>\r\n\
                    Subject: =?UTF-8?B?Sm9iIE9mZmVy?=\r\n\
                    \r\n\
                    body";
        let record = EmailRecord::from_raw(raw).unwrap();

        assert_eq!(record.sender(), "=?UTF-8?Q?Acme_HR?= <hr@acme.com>");
        assert_eq!(record.subject(), "=?UTF-8?B?Sm9iIE9mZmVy?=");
        assert_eq!(record.headers().get("Subject"), Some("=?UTF-8?B?Sm9iIE9mZmVy?="));
        assert_eq!(
            record.headers().get("From"),
            Some("=?UTF-8?Q?Acme_HR?= <hr@acme.com>")
        );
    }

    #[test]
    fn test_headers_keep_order_and_case() {
        let raw = b"Subject: one\r\nX-Tag: a\r\nFrom: x@example.com\r\nX-Tag: b\r\n\r\nbody";
        let record = EmailRecord::from_raw(raw).unwrap();
        let keys: Vec<_> = record.headers().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Subject", "X-Tag", "From"]);
        assert_eq!(record.headers().get("X-Tag"), Some("b"));
        assert_eq!(record.headers().get("x-tag"), None);
    }

    #[test]
    fn test_multipart_parts_joined_in_order() {
        let raw = b"From: a@example.com\r\n\
                    Content-Type: multipart/alternative; boundary=\"XX\"\r\n\
                    \r\n\
                    --XX\r\n\
                    Content-Type: text/plain; charset=utf-8\r\n\
                    \r\n\
                    first part\r\n\
                    --XX\r\n\
                    Content-Type: text/html; charset=utf-8\r\n\
                    \r\n\
                    <p>second part</p>\r\n\
                    --XX--\r\n";

        let record = EmailRecord::from_raw(raw).unwrap();
        let content = record.content();
        let first = content.find("first part").unwrap();
        let second = content.find("<p>second part</p>").unwrap();
        assert!(first < second);
        assert!(content.contains('\n'));
    }

    #[test]
    fn test_invalid_utf8_body_is_decoding_error() {
        let mut raw = b"From: a@example.com\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        let err = EmailRecord::from_raw(&raw).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_invalid_utf8_header_is_decoding_error() {
        let mut raw = b"From: a@example.com\r\nSubject: ".to_vec();
        raw.extend_from_slice(&[0xc3, 0x28]);
        raw.extend_from_slice(b"\r\n\r\nbody");
        let err = EmailRecord::from_raw(&raw).unwrap_err();
        assert!(err.to_string().contains("Subject"));
    }

    #[test]
    fn test_parsed_date_malformed() {
        for raw in ["", "   ", "not a date", "2024-01-15", "Mon, 45 Foo 2024"] {
            let record = EmailRecord::new("", "", raw, "");
            assert!(record.parsed_date().is_none(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn test_parsed_date_is_stable() {
        let record = EmailRecord::new("", "", "Tue, 16 Jan 2024 08:00:00 -0500", "");
        assert_eq!(record.parsed_date(), record.parsed_date());
    }

    #[test]
    fn test_headers_serde_preserves_order() {
        let headers: Headers = [("Subject", "s"), ("From", "f"), ("Date", "d")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"{"Subject":"s","From":"f","Date":"d"}"#);

        let parsed: Headers = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, headers);
    }

    #[test]
    fn test_record_deserialize_without_headers() {
        let json = r#"{"sender":"a","subject":"b","date":"","content":"c"}"#;
        let record: EmailRecord = serde_json::from_str(json).unwrap();
        assert!(record.headers().is_empty());
    }
}

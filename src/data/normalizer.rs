//! Field normalizer
//!
//! Turns a [`RawRecord`] into a [`CleanRecord`]: parses the timestamp with a
//! single fixed format and reduces the tweet text to the printable form the
//! sentiment lexicon works on.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::error::{RejectReason, Rejection};
use crate::models::{CleanRecord, RawRecord};

/// Timestamp format of the archive, e.g. `2017-03-05T02:15:00`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// HTML entities that appear in exported tweet text
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
];

/// Normalizer for raw archive rows
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    timestamp_format: String,
    strip_mentions: bool,
    decode_entities: bool,
}

impl FieldNormalizer {
    pub fn new() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            strip_mentions: true,
            decode_entities: true,
        }
    }

    /// Set the chrono format used for every timestamp of the run
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Remove `@user` mentions from the text
    pub fn with_strip_mentions(mut self, strip: bool) -> Self {
        self.strip_mentions = strip;
        self
    }

    /// Decode HTML entities such as `&amp;`
    pub fn with_decode_entities(mut self, decode: bool) -> Self {
        self.decode_entities = decode;
        self
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Validate and normalize one record
    pub fn normalize(&self, raw: &RawRecord) -> Result<CleanRecord, Rejection> {
        let id = raw.id.trim();
        if id.is_empty() {
            return Err(Rejection::new(raw.line, None, RejectReason::EmptyId));
        }

        let reject = |reason| Rejection::new(raw.line, Some(id.to_string()), reason);

        let timestamp = self.parse_timestamp(&raw.timestamp).ok_or_else(|| {
            reject(RejectReason::InvalidTimestamp {
                value: raw.timestamp.clone(),
            })
        })?;

        let text = self.normalize_text(&raw.text);
        if text.is_empty() {
            return Err(reject(RejectReason::EmptyText));
        }

        Ok(CleanRecord {
            id: id.to_string(),
            timestamp,
            text,
            original_text: raw.text.clone(),
        })
    }

    /// Parse a timestamp with the configured format
    pub fn parse_timestamp(&self, value: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), &self.timestamp_format).ok()
    }

    /// Normalize tweet text
    ///
    /// Steps:
    /// 1. Unicode NFC
    /// 2. Decode HTML entities
    /// 3. Remove URLs and (optionally) mentions
    /// 4. Drop characters outside printable ASCII
    /// 5. Collapse whitespace and trim
    pub fn normalize_text(&self, text: &str) -> String {
        let mut result: String = text.nfc().collect();

        if self.decode_entities {
            for (entity, replacement) in HTML_ENTITIES {
                if result.contains(entity) {
                    result = result.replace(entity, replacement);
                }
            }
        }

        result = URL_REGEX.replace_all(&result, " ").into_owned();

        if self.strip_mentions {
            result = MENTION_REGEX.replace_all(&result, " ").into_owned();
        }

        let printable: String = result
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        WHITESPACE_REGEX
            .replace_all(&printable, " ")
            .trim()
            .to_string()
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// FeedbackReport - core/parser.rs
//
// Extraction of feedback records from raw interaction log text.
// Core layer: accepts text or bytes, never touches the filesystem directly.

use crate::core::model::{Extraction, FeedbackRecord, MalformedLine, MalformedLinePolicy};
use crate::util::constants;
use crate::util::error::ParseError;
use chrono::NaiveDateTime;

/// Configuration for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Substrings marking a feedback event line; any one qualifies a line.
    pub markers: Vec<String>,

    /// Handling of marker lines that lack the label field.
    pub malformed_policy: MalformedLinePolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            markers: constants::DEFAULT_FEEDBACK_MARKERS
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
            malformed_policy: MalformedLinePolicy::default(),
        }
    }
}

impl ExtractConfig {
    /// Default markers with the given malformed-line policy.
    pub fn with_policy(malformed_policy: MalformedLinePolicy) -> Self {
        Self {
            malformed_policy,
            ..Default::default()
        }
    }

    fn is_candidate(&self, line: &str) -> bool {
        self.markers.iter().any(|m| line.contains(m.as_str()))
    }
}

/// Classification of a single log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line is a well-formed feedback event.
    Record(FeedbackRecord),

    /// The line carries no feedback marker.
    Skip,

    /// The line carries a marker but not the `timestamp<TAB>label` shape.
    Malformed(MalformedLine),
}

/// Classify one line.
///
/// A timestamp that does not match the fixed format is an error rather than
/// an outcome: it aborts the whole extraction regardless of policy.
pub fn parse_line(
    line: &str,
    line_number: u64,
    config: &ExtractConfig,
) -> Result<LineOutcome, ParseError> {
    if !config.is_candidate(line) {
        return Ok(LineOutcome::Skip);
    }

    let mut fields = line.split(constants::FIELD_SEPARATOR);
    let (raw_ts, label) = match (fields.next(), fields.next()) {
        (Some(ts), Some(label)) => (ts.trim(), label.trim()),
        _ => {
            return Ok(LineOutcome::Malformed(MalformedLine {
                line_number,
                fields: 1,
                text: line.to_string(),
            }))
        }
    };

    let timestamp = parse_timestamp(raw_ts, line_number)?;

    Ok(LineOutcome::Record(FeedbackRecord {
        timestamp,
        feedback_type: label.to_string(),
        line_number,
    }))
}

/// Parse an event timestamp such as `2024-01-01 AM 9:05`.
///
/// Only the fixed format is tried; there is no fallback.
pub fn parse_timestamp(raw: &str, line_number: u64) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(raw, constants::TIMESTAMP_FORMAT).map_err(|source| {
        ParseError::TimestampParse {
            line_number,
            raw_timestamp: raw.to_string(),
            format: constants::TIMESTAMP_FORMAT,
            source,
        }
    })
}

/// Extract feedback records from log text.
///
/// Records come back in line order. Lines without a marker are ignored.
/// Malformed marker lines follow `config.malformed_policy`.
pub fn extract(content: &str, config: &ExtractConfig) -> Result<Extraction, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut extraction = Extraction::default();

    for (line_idx, line) in content.lines().enumerate() {
        extraction.lines_processed += 1;
        let line_number = (line_idx as u64) + 1;

        match parse_line(line, line_number, config)? {
            LineOutcome::Record(record) => extraction.records.push(record),
            LineOutcome::Skip => {}
            LineOutcome::Malformed(malformed) => match config.malformed_policy {
                MalformedLinePolicy::Fail => {
                    return Err(ParseError::MalformedLine {
                        line_number: malformed.line_number,
                        fields: malformed.fields,
                        line: malformed.text,
                    });
                }
                MalformedLinePolicy::Skip => {
                    tracing::warn!(
                        line = malformed.line_number,
                        fields = malformed.fields,
                        "Skipping malformed feedback line"
                    );
                    extraction.skipped_malformed.push(malformed);
                }
            },
        }
    }

    tracing::debug!(
        lines = extraction.lines_processed,
        records = extraction.records.len(),
        skipped = extraction.skipped_malformed.len(),
        "Extraction complete"
    );

    Ok(extraction)
}

/// Decode raw uploaded bytes as UTF-8 and extract feedback records.
pub fn extract_bytes(bytes: &[u8], config: &ExtractConfig) -> Result<Extraction, ParseError> {
    let content =
        std::str::from_utf8(bytes).map_err(|source| ParseError::InvalidEncoding { source })?;
    extract(content, config)
}

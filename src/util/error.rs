// FeedbackReport - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every top-level variant names the pipeline stage that failed so the
// message shown to the operator says where the run stopped.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all FeedbackReport operations.
#[derive(Debug)]
pub enum FeedbackReportError {
    /// Log extraction failed.
    Extraction(ParseError),

    /// Filter derivation or application failed.
    Filter(FilterError),

    /// Export failed.
    Export(ExportError),

    /// I/O error with path context (reading the input log).
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for FeedbackReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction(e) => write!(f, "Extraction failed: {e}"),
            Self::Filter(e) => write!(f, "Filtering failed: {e}"),
            Self::Export(e) => write!(f, "Export failed: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for FeedbackReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Extraction(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors raised while extracting feedback records from log text.
#[derive(Debug)]
pub enum ParseError {
    /// Uploaded content is not valid UTF-8.
    InvalidEncoding { source: std::str::Utf8Error },

    /// A line carrying a feedback marker lacks the label field.
    MalformedLine {
        line_number: u64,
        fields: usize,
        line: String,
    },

    /// A timestamp string does not match the fixed event format.
    TimestampParse {
        line_number: u64,
        raw_timestamp: String,
        format: &'static str,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding { source } => {
                write!(f, "input is not valid UTF-8 text: {source}")
            }
            Self::MalformedLine {
                line_number,
                fields,
                line,
            } => write!(
                f,
                "line {line_number}: expected a tab-separated timestamp and feedback label, \
                 found {fields} field(s) in '{line}'"
            ),
            Self::TimestampParse {
                line_number,
                raw_timestamp,
                format,
                source,
            } => write!(
                f,
                "line {line_number}: cannot parse timestamp '{raw_timestamp}' \
                 with format '{format}': {source}"
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEncoding { source } => Some(source),
            Self::TimestampParse { source, .. } => Some(source),
            Self::MalformedLine { .. } => None,
        }
    }
}

impl From<ParseError> for FeedbackReportError {
    fn from(e: ParseError) -> Self {
        Self::Extraction(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter criteria.
#[derive(Debug)]
pub enum FilterError {
    /// No feedback records were extracted, so no default range exists.
    EmptyRecordSet,

    /// A date override could not be parsed.
    InvalidDate {
        input: String,
        source: chrono::ParseError,
    },

    /// A time-of-day override could not be parsed.
    InvalidTime { input: String },

    /// Only one end of the time-of-day range was supplied.
    IncompleteTimeRange,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRecordSet => write!(
                f,
                "no feedback events found in the input; a date range cannot be derived"
            ),
            Self::InvalidDate { input, source } => {
                write!(f, "invalid date '{input}' (expected YYYY-MM-DD): {source}")
            }
            Self::InvalidTime { input } => {
                write!(f, "invalid time '{input}' (expected HH:MM or HH:MM:SS)")
            }
            Self::IncompleteTimeRange => {
                write!(f, "a time range needs both a start time and an end time")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDate { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for FeedbackReportError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing or re-reading the export artifact.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing or reading the export file.
    Io { path: PathBuf, source: io::Error },

    /// Spreadsheet serialisation error.
    XlsxWrite {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },

    /// Spreadsheet could not be opened or read back.
    XlsxRead {
        path: PathBuf,
        source: calamine::XlsxError,
    },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A re-read artifact does not have the expected shape.
    MalformedArtifact {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::XlsxWrite { path, source } => {
                write!(f, "Spreadsheet export error '{}': {source}", path.display())
            }
            Self::XlsxRead { path, source } => {
                write!(f, "Spreadsheet read error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::MalformedArtifact { path, row, reason } => {
                write!(f, "'{}' row {row}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::XlsxWrite { source, .. } => Some(source),
            Self::XlsxRead { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::MalformedArtifact { .. } => None,
        }
    }
}

impl From<ExportError> for FeedbackReportError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading config.toml.
///
/// Never fatal: each one is reported as a warning and the affected setting
/// falls back to its default.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for FeedbackReport results.
pub type Result<T> = std::result::Result<T, FeedbackReportError>;

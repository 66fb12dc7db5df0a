// FeedbackReport - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Feedback record (normalised output of extraction)
// =============================================================================

/// One customer-service feedback event extracted from a log line.
///
/// Created once during extraction and never mutated afterwards. This is the
/// unit that flows through filtering, the table view and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Event time, parsed from the `YYYY-MM-DD AM|PM H:MM` prefix.
    pub timestamp: NaiveDateTime,

    /// Feedback label taken verbatim (trimmed) from the second field,
    /// e.g. "Customer felt frustrated".
    pub feedback_type: String,

    /// 1-based line number in the source log. Diagnostic only; not exported.
    #[serde(skip)]
    pub line_number: u64,
}

impl FeedbackRecord {
    pub fn new(timestamp: NaiveDateTime, feedback_type: impl Into<String>) -> Self {
        Self {
            timestamp,
            feedback_type: feedback_type.into(),
            line_number: 0,
        }
    }

    /// Whether two records carry the same exported content
    /// (timestamp and label), ignoring source line numbers.
    pub fn same_content(&self, other: &FeedbackRecord) -> bool {
        self.timestamp == other.timestamp && self.feedback_type == other.feedback_type
    }
}

/// Records in log line order. No sort is ever applied.
pub type RecordSet = Vec<FeedbackRecord>;

// =============================================================================
// Malformed line policy
// =============================================================================

/// What extraction does with a marker line that lacks the label field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Record a warning and continue with the next line.
    #[default]
    Skip,

    /// Abort the whole extraction.
    Fail,
}

impl MalformedLinePolicy {
    pub fn label(&self) -> &'static str {
        match self {
            MalformedLinePolicy::Skip => "skip",
            MalformedLinePolicy::Fail => "fail",
        }
    }
}

/// A marker line that was skipped because it lacked the label field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line_number: u64,
    /// Number of tab-separated fields found.
    pub fields: usize,
    pub text: String,
}

impl std::fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} field(s), expected timestamp<TAB>label",
            self.line_number, self.fields
        )
    }
}

// =============================================================================
// Extraction result
// =============================================================================

/// Output of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Feedback records in line order.
    pub records: RecordSet,

    /// Marker lines skipped under `MalformedLinePolicy::Skip`.
    pub skipped_malformed: Vec<MalformedLine>,

    /// Total lines read, matching or not.
    pub lines_processed: u64,
}

// =============================================================================
// Export format
// =============================================================================

/// File format of an export artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json]
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Human-readable label for menus and dialogs.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel workbook",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    /// Parse a format name as written in config.toml or on the CLI.
    pub fn from_name(name: &str) -> Option<ExportFormat> {
        match name.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

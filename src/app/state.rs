// FeedbackReport - app/state.rs
//
// State of the desktop window: the loaded records, the sidebar selections
// as editable text, and the current filtered view.
// Owned by the eframe::App implementation. All filtering goes through core.

use crate::app::pipeline::FilterOverrides;
use crate::core::export::{self, ExportArtifact};
use crate::core::filter::{self, FilterCriteria, TimeRange};
use crate::core::model::{ExportFormat, FeedbackRecord, RecordSet};
use crate::core::parser::{self, ExtractConfig};
use crate::platform;
use crate::util::constants;
use crate::util::error::{ExportError, FeedbackReportError, FilterError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level window state.
#[derive(Debug)]
pub struct AppState {
    /// Extraction settings from config.toml / CLI.
    pub extract_config: ExtractConfig,

    /// Format offered first in the save dialog.
    pub export_format: ExportFormat,

    /// File the records were loaded from.
    pub source_path: Option<PathBuf>,

    /// All extracted records, in log line order.
    pub records: RecordSet,

    /// Criteria derived from `records` at load time.
    pub defaults: Option<FilterCriteria>,

    /// Start date text (YYYY-MM-DD).
    pub start_date_input: String,

    /// End date text (YYYY-MM-DD).
    pub end_date_input: String,

    /// Whether the time-of-day range is applied.
    pub filter_time: bool,

    /// Start time text (HH:MM[:SS]).
    pub start_time_input: String,

    /// End time text (HH:MM[:SS]).
    pub end_time_input: String,

    /// Feedback types present in the selected date/time range.
    pub available_types: Vec<String>,

    /// Types the operator unchecked. Everything else available is kept.
    pub excluded_types: HashSet<String>,

    /// Criteria behind `filtered_indices`.
    pub criteria: Option<FilterCriteria>,

    /// Indices into `records` matching the current criteria.
    pub filtered_indices: Vec<usize>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config problems, skipped lines).
    pub warnings: Vec<String>,
}

impl AppState {
    pub fn new(extract_config: ExtractConfig, export_format: ExportFormat) -> Self {
        let full_day = TimeRange::full_day();
        Self {
            extract_config,
            export_format,
            source_path: None,
            records: Vec::new(),
            defaults: None,
            start_date_input: String::new(),
            end_date_input: String::new(),
            filter_time: false,
            start_time_input: full_day.start.format("%H:%M:%S").to_string(),
            end_time_input: full_day.end.format("%H:%M:%S").to_string(),
            available_types: Vec::new(),
            excluded_types: HashSet::new(),
            criteria: None,
            filtered_indices: Vec::new(),
            status_message: "Open a log file to begin.".to_string(),
            warnings: Vec::new(),
        }
    }

    /// Drop the loaded records and selections.
    pub fn clear(&mut self) {
        let fresh = Self::new(self.extract_config.clone(), self.export_format);
        *self = Self {
            warnings: std::mem::take(&mut self.warnings),
            ..fresh
        };
    }

    /// Read and load a log file.
    pub fn load_path(&mut self, path: &Path) -> Result<(), FeedbackReportError> {
        let bytes = platform::fs::read_log_bytes(path)?;
        self.load_bytes(&bytes)?;
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Extract records from uploaded bytes and reset selections to defaults.
    ///
    /// On failure the previous state is cleared and the error returned.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), FeedbackReportError> {
        self.clear();

        let extraction = parser::extract_bytes(bytes, &self.extract_config)?;
        for skipped in &extraction.skipped_malformed {
            self.warnings.push(format!("Skipped malformed {skipped}"));
        }
        let defaults = filter::derive_default_criteria(&extraction.records)?;

        self.start_date_input = defaults.start_date().to_string();
        self.end_date_input = defaults.end_date().to_string();
        self.records = extraction.records;
        self.defaults = Some(defaults);
        self.apply_filters();

        self.status_message = format!(
            "Loaded {} feedback events from {} lines.",
            self.records.len(),
            extraction.lines_processed
        );
        Ok(())
    }

    /// Parse the sidebar inputs into overrides (types excluded).
    pub fn overrides(&self) -> Result<FilterOverrides, FilterError> {
        let time_range = if self.filter_time {
            Some(TimeRange::new(
                filter::parse_time_input(&self.start_time_input)?,
                filter::parse_time_input(&self.end_time_input)?,
            ))
        } else {
            None
        };
        Ok(FilterOverrides {
            start_date: Some(filter::parse_date_input(&self.start_date_input)?),
            end_date: Some(filter::parse_date_input(&self.end_date_input)?),
            time_range,
            feedback_types: None,
        })
    }

    /// Recompute the filtered view from the sidebar inputs.
    ///
    /// The type list is rebuilt from the records inside the selected range;
    /// unchecked types stay unchecked. Invalid input keeps the previous view
    /// and reports the problem in the status bar.
    pub fn apply_filters(&mut self) {
        let Some(defaults) = self.defaults.as_ref() else {
            return;
        };

        let in_range = match self.overrides().map(|o| o.resolve(defaults)) {
            Ok(criteria) => FilterCriteria {
                allowed_feedback_types: defaults.allowed_feedback_types.clone(),
                ..criteria
            },
            Err(e) => {
                self.status_message = format!("Filter not applied: {e}");
                return;
            }
        };

        let range_records: RecordSet = filter::filter_records(&self.records, &in_range);
        self.available_types = filter::feedback_types(&range_records);

        let allowed = self
            .available_types
            .iter()
            .filter(|t| !self.excluded_types.contains(*t))
            .cloned()
            .collect();
        let criteria = FilterCriteria {
            allowed_feedback_types: allowed,
            ..in_range
        };

        self.filtered_indices = filter::apply_filters(&self.records, &criteria);
        self.criteria = Some(criteria);
        self.status_message = format!(
            "{} of {} feedback events match.",
            self.filtered_indices.len(),
            self.records.len()
        );
    }

    /// Toggle whether a feedback type is kept, then refilter.
    pub fn set_type_selected(&mut self, feedback_type: &str, selected: bool) {
        if selected {
            self.excluded_types.remove(feedback_type);
        } else {
            self.excluded_types.insert(feedback_type.to_string());
        }
        self.apply_filters();
    }

    /// Put every sidebar input back to the derived defaults.
    pub fn reset_filters(&mut self) {
        if let Some(ref defaults) = self.defaults {
            self.start_date_input = defaults.start_date().to_string();
            self.end_date_input = defaults.end_date().to_string();
        }
        let full_day = TimeRange::full_day();
        self.filter_time = false;
        self.start_time_input = full_day.start.format("%H:%M:%S").to_string();
        self.end_time_input = full_day.end.format("%H:%M:%S").to_string();
        self.excluded_types.clear();
        self.apply_filters();
    }

    /// Records currently shown, in log order.
    pub fn filtered_records(&self) -> impl Iterator<Item = &FeedbackRecord> {
        self.filtered_indices
            .iter()
            .filter_map(|&i| self.records.get(i))
    }

    /// Whether an export can be written. A loaded log with no matching rows
    /// still exports a header-only file.
    pub fn can_export(&self) -> bool {
        self.criteria.is_some()
    }

    /// Deterministic export file name for the current range.
    pub fn suggested_file_name(&self, format: ExportFormat) -> Option<String> {
        self.criteria
            .as_ref()
            .map(|c| export::export_file_name(c.start_date(), c.end_date(), format))
    }

    /// Write the current filtered view to `path`.
    pub fn export_to(
        &mut self,
        path: &Path,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let records: RecordSet = self.filtered_records().cloned().collect();
        let artifact = export::write_artifact_to(&records, format, path)?;
        self.status_message = format!(
            "Exported {} rows to {}.",
            artifact.rows_written,
            artifact.path.display()
        );
        Ok(artifact)
    }

    /// Initial directory for the save dialog.
    pub fn export_dir_hint(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(Path::to_path_buf))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExtractConfig::default(), ExportFormat::default())
    }
}

/// Labels used by the window for the two export columns.
pub fn column_titles() -> [&'static str; 2] {
    constants::EXPORT_COLUMNS
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &[u8] = b"2024-01-01 AM 8:00\tCustomer felt happy\n\
                         2024-01-02 PM 1:30\tService Experienced delay\n\
                         2024-01-03 PM 5:00\tCustomer felt frustrated\n\
                         Customer felt nothing\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.load_bytes(LOG).unwrap();
        state
    }

    #[test]
    fn test_load_sets_default_inputs() {
        let state = loaded();
        assert_eq!(state.start_date_input, "2024-01-01");
        assert_eq!(state.end_date_input, "2024-01-03");
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
        assert_eq!(state.available_types.len(), 3);
        assert_eq!(state.warnings.len(), 1);
    }

    #[test]
    fn test_date_change_rebuilds_type_list() {
        let mut state = loaded();
        state.start_date_input = "2024-01-02".to_string();
        state.apply_filters();
        assert_eq!(state.filtered_indices, vec![1, 2]);
        assert_eq!(
            state.available_types,
            vec!["Service Experienced delay", "Customer felt frustrated"]
        );
    }

    #[test]
    fn test_unchecking_type_filters() {
        let mut state = loaded();
        state.set_type_selected("Service Experienced delay", false);
        assert_eq!(state.filtered_indices, vec![0, 2]);
        state.set_type_selected("Service Experienced delay", true);
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_time_filter() {
        let mut state = loaded();
        state.filter_time = true;
        state.start_time_input = "09:00".to_string();
        state.end_time_input = "16:00".to_string();
        state.apply_filters();
        // 2024-01-01 09:00 .. 2024-01-03 16:00
        assert_eq!(state.filtered_indices, vec![1]);
    }

    #[test]
    fn test_invalid_input_keeps_previous_view() {
        let mut state = loaded();
        state.end_date_input = "not a date".to_string();
        state.apply_filters();
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
        assert!(state.status_message.starts_with("Filter not applied"));
    }

    #[test]
    fn test_reversed_range_clears_view() {
        let mut state = loaded();
        state.start_date_input = "2024-01-03".to_string();
        state.end_date_input = "2024-01-01".to_string();
        state.apply_filters();
        assert!(state.filtered_indices.is_empty());
        assert!(state.available_types.is_empty());
        assert!(state.status_message.starts_with("0 of 3"));
        assert_eq!(
            state.suggested_file_name(ExportFormat::Csv).unwrap(),
            "service_feedback_summary_2024-01-03_to_2024-01-01.csv"
        );
    }

    #[test]
    fn test_empty_view_still_exports_header() {
        assert!(!AppState::default().can_export());

        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded();
        for feedback_type in state.available_types.clone() {
            state.set_type_selected(&feedback_type, false);
        }
        assert!(state.filtered_indices.is_empty());
        assert!(state.can_export());

        let path = dir.path().join("empty.csv");
        let artifact = state.export_to(&path, ExportFormat::Csv).unwrap();
        assert_eq!(artifact.rows_written, 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().trim(),
            "Timestamp,Feedback Type"
        );
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = loaded();
        state.start_date_input = "2024-01-03".to_string();
        state.set_type_selected("Customer felt frustrated", false);
        state.reset_filters();
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_log_is_an_error() {
        let mut state = AppState::default();
        let result = state.load_bytes(b"just noise\n");
        assert!(matches!(
            result,
            Err(FeedbackReportError::Filter(FilterError::EmptyRecordSet))
        ));
        assert!(state.records.is_empty());
    }

    #[test]
    fn test_export_current_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded();
        state.set_type_selected("Customer felt happy", false);
        let name = state.suggested_file_name(ExportFormat::Xlsx).unwrap();
        assert_eq!(name, "service_feedback_summary_2024-01-01_to_2024-01-03.xlsx");

        let path = dir.path().join(name);
        let artifact = state.export_to(&path, ExportFormat::Xlsx).unwrap();
        assert_eq!(artifact.rows_written, 2);
        let reread = export::read_xlsx(&path).unwrap();
        assert_eq!(reread[0].feedback_type, "Service Experienced delay");
    }
}

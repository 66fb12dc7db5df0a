// FeedbackReport - app/pipeline.rs
//
// One extract -> filter -> export run over uploaded bytes.
// Stateless: every input arrives as an argument and every output is
// returned, so both the headless binary and the window drive the same code.

use crate::core::export::{self, ExportArtifact};
use crate::core::filter::{self, FilterCriteria, TimeRange};
use crate::core::model::{ExportFormat, Extraction, RecordSet};
use crate::core::parser::{self, ExtractConfig};
use crate::util::error::Result;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::PathBuf;

/// Operator choices layered over the derived default criteria.
///
/// Every field is optional; an absent field keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOverrides {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Time-of-day narrowing; `None` keeps whole days.
    pub time_range: Option<TimeRange>,
    /// Feedback types to keep; `None` keeps every observed type.
    pub feedback_types: Option<Vec<String>>,
}

impl FilterOverrides {
    /// Combine the overrides with the defaults derived from the records.
    pub fn resolve(&self, defaults: &FilterCriteria) -> FilterCriteria {
        let allowed: HashSet<String> = match self.feedback_types {
            Some(ref types) => types.iter().cloned().collect(),
            None => defaults.allowed_feedback_types.clone(),
        };
        FilterCriteria::for_dates(
            self.start_date.unwrap_or_else(|| defaults.start_date()),
            self.end_date.unwrap_or_else(|| defaults.end_date()),
            self.time_range,
            allowed,
        )
    }
}

/// Where and how to write the export artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub output_dir: PathBuf,
}

/// Parameters of one run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub extract: ExtractConfig,
    pub overrides: FilterOverrides,
    /// `None` stops after filtering (preview only).
    pub export: Option<ExportRequest>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub extraction: Extraction,
    /// Criteria derived from the records before any override.
    pub defaults: FilterCriteria,
    /// Criteria actually applied.
    pub criteria: FilterCriteria,
    pub filtered: RecordSet,
    pub artifact: Option<ExportArtifact>,
}

/// Run extraction, filtering and (optionally) export over raw log bytes.
///
/// The first failing stage aborts the run; its error names the stage.
pub fn run(bytes: &[u8], request: &RunRequest) -> Result<RunOutcome> {
    let extraction = parser::extract_bytes(bytes, &request.extract)?;

    let defaults = filter::derive_default_criteria(&extraction.records)?;
    let criteria = request.overrides.resolve(&defaults);
    let filtered = filter::filter_records(&extraction.records, &criteria);

    tracing::info!(
        extracted = extraction.records.len(),
        kept = filtered.len(),
        start = %criteria.start,
        end = %criteria.end,
        "Records filtered"
    );

    let artifact = match request.export {
        Some(ref export) => Some(export::write_artifact(
            &filtered,
            criteria.start_date(),
            criteria.end_date(),
            export.format,
            &export.output_dir,
        )?),
        None => None,
    };

    Ok(RunOutcome {
        extraction,
        defaults,
        criteria,
        filtered,
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::MalformedLinePolicy;
    use crate::util::error::{FeedbackReportError, FilterError};
    use chrono::NaiveTime;

    const LOG: &[u8] = b"2024-01-01 AM 8:00\tCustomer felt happy\n\
                         2024-01-01 AM 8:01\tAgent typing\n\
                         2024-01-02 PM 1:30\tService Experienced delay\n\
                         2024-01-03 PM 5:00\tCustomer felt frustrated\n";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_defaults_keep_everything() {
        let outcome = run(LOG, &RunRequest::default()).unwrap();
        assert_eq!(outcome.extraction.records.len(), 3);
        assert_eq!(outcome.filtered, outcome.extraction.records);
        assert_eq!(outcome.criteria, outcome.defaults);
        assert!(outcome.artifact.is_none());
    }

    #[test]
    fn test_overrides_narrow() {
        let request = RunRequest {
            overrides: FilterOverrides {
                start_date: Some(day(2)),
                time_range: Some(TimeRange::new(
                    NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
                )),
                feedback_types: Some(vec!["Customer felt frustrated".to_string()]),
                ..Default::default()
            },
            ..Default::default()
        };
        let outcome = run(LOG, &request).unwrap();
        assert_eq!(outcome.filtered.len(), 1);
        assert_eq!(outcome.filtered[0].feedback_type, "Customer felt frustrated");
        assert_eq!(outcome.criteria.start_date(), day(2));
        assert_eq!(outcome.criteria.end_date(), day(3));
    }

    #[test]
    fn test_empty_input_fails_in_filter_stage() {
        let result = run(b"nothing relevant here\n", &RunRequest::default());
        match result {
            Err(FeedbackReportError::Filter(FilterError::EmptyRecordSet)) => {}
            other => panic!("expected EmptyRecordSet, got {other:?}"),
        }
    }

    #[test]
    fn test_inverted_range_exports_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let request = RunRequest {
            overrides: FilterOverrides {
                start_date: Some(day(3)),
                end_date: Some(day(1)),
                ..Default::default()
            },
            export: Some(ExportRequest {
                format: ExportFormat::Csv,
                output_dir: dir.path().to_path_buf(),
            }),
            ..Default::default()
        };
        let outcome = run(LOG, &request).unwrap();
        assert!(outcome.filtered.is_empty());

        let artifact = outcome.artifact.unwrap();
        assert_eq!(artifact.rows_written, 0);
        assert_eq!(
            artifact.file_name,
            "service_feedback_summary_2024-01-03_to_2024-01-01.csv"
        );
        let written = std::fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(written.trim(), "Timestamp,Feedback Type");
    }

    #[test]
    fn test_same_day_reversed_times_keep_nothing() {
        let request = RunRequest {
            overrides: FilterOverrides {
                start_date: Some(day(3)),
                end_date: Some(day(3)),
                time_range: Some(TimeRange::new(
                    NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                )),
                ..Default::default()
            },
            ..Default::default()
        };
        let outcome = run(LOG, &request).unwrap();
        assert!(outcome.filtered.is_empty());
    }

    #[test]
    fn test_strict_policy_fails_in_extraction_stage() {
        let request = RunRequest {
            extract: ExtractConfig::with_policy(MalformedLinePolicy::Fail),
            ..Default::default()
        };
        let result = run(b"Customer felt lost\n", &request);
        assert!(matches!(result, Err(FeedbackReportError::Extraction(_))));
    }

    #[test]
    fn test_export_uses_selected_range() {
        let dir = tempfile::tempdir().unwrap();
        let request = RunRequest {
            overrides: FilterOverrides {
                end_date: Some(day(2)),
                ..Default::default()
            },
            export: Some(ExportRequest {
                format: ExportFormat::Xlsx,
                output_dir: dir.path().to_path_buf(),
            }),
            ..Default::default()
        };
        let outcome = run(LOG, &request).unwrap();
        let artifact = outcome.artifact.unwrap();
        assert_eq!(
            artifact.file_name,
            "service_feedback_summary_2024-01-01_to_2024-01-02.xlsx"
        );
        assert_eq!(artifact.rows_written, 2);
    }
}

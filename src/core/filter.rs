// FeedbackReport - core/filter.rs
//
// Date/time range and feedback-type filtering of extracted records.
// Both conditions are AND-combined; selection is stable.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{FeedbackRecord, RecordSet};
use crate::util::constants;
use crate::util::error::FilterError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;

/// Optional time-of-day narrowing applied to both ends of the date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// The whole day, `00:00:00` to `23:59:59`.
    pub fn full_day() -> Self {
        Self {
            start: day_start(),
            end: day_end(),
        }
    }
}

fn day_start() -> NaiveTime {
    let (h, m, s) = constants::DAY_START;
    NaiveTime::from_hms_opt(h, m, s).unwrap_or_default()
}

fn day_end() -> NaiveTime {
    let (h, m, s) = constants::DAY_END;
    NaiveTime::from_hms_opt(h, m, s).unwrap_or_default()
}

/// Criteria used to select records for display and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Start of the range (inclusive).
    pub start: NaiveDateTime,

    /// End of the range (inclusive).
    pub end: NaiveDateTime,

    /// Feedback types to keep. Membership is exact string equality.
    pub allowed_feedback_types: HashSet<String>,
}

impl FilterCriteria {
    /// Combine calendar dates with a time-of-day range.
    ///
    /// Without `time_range` the range covers whole days. A start after the
    /// end is kept as given and simply matches nothing.
    pub fn for_dates(
        start_date: NaiveDate,
        end_date: NaiveDate,
        time_range: Option<TimeRange>,
        allowed_feedback_types: HashSet<String>,
    ) -> Self {
        let times = time_range.unwrap_or_else(TimeRange::full_day);
        let start = start_date.and_time(times.start);
        let end = end_date.and_time(times.end);
        if start > end {
            tracing::warn!(%start, %end, "Filter range start is after its end; no records will match");
        }
        Self {
            start,
            end,
            allowed_feedback_types,
        }
    }

    /// Calendar date of the range start.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Calendar date of the range end.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Check whether a single record passes both conditions.
    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        self.start <= record.timestamp
            && record.timestamp <= self.end
            && self.allowed_feedback_types.contains(&record.feedback_type)
    }
}

/// Distinct feedback types in order of first appearance.
pub fn feedback_types(records: &[FeedbackRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.feedback_type.as_str()))
        .map(|r| r.feedback_type.clone())
        .collect()
}

/// Derive the default criteria for a record set.
///
/// The range spans from midnight of the earliest record's date to
/// 23:59:59 of the latest record's date, and every observed feedback type is
/// allowed. An empty set has no range and is rejected.
pub fn derive_default_criteria(records: &[FeedbackRecord]) -> Result<FilterCriteria, FilterError> {
    let earliest = records.iter().map(|r| r.timestamp).min();
    let latest = records.iter().map(|r| r.timestamp).max();
    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return Err(FilterError::EmptyRecordSet);
    };

    let allowed_feedback_types = feedback_types(records).into_iter().collect();
    Ok(FilterCriteria::for_dates(
        earliest.date(),
        latest.date(),
        None,
        allowed_feedback_types,
    ))
}

/// Apply criteria to a slice of records, returning indices of matches.
///
/// Indices are ascending, so the original relative order is preserved.
pub fn apply_filters(records: &[FeedbackRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}

/// Apply criteria and return the surviving records in original order.
pub fn filter_records(records: &[FeedbackRecord], criteria: &FilterCriteria) -> RecordSet {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Parse a `YYYY-MM-DD` date override.
pub fn parse_date_input(input: &str) -> Result<NaiveDate, FilterError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, constants::DATE_INPUT_FORMAT).map_err(|source| {
        FilterError::InvalidDate {
            input: trimmed.to_string(),
            source,
        }
    })
}

/// Parse an `HH:MM` or `HH:MM:SS` time-of-day override.
pub fn parse_time_input(input: &str) -> Result<NaiveTime, FilterError> {
    let trimmed = input.trim();
    constants::TIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| FilterError::InvalidTime {
            input: trimmed.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn record(ts: NaiveDateTime, label: &str) -> FeedbackRecord {
        FeedbackRecord::new(ts, label)
    }

    fn types(labels: &[&str]) -> HashSet<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_default_range_spans_whole_days() {
        let records = vec![
            record(at(2024, 1, 2, 12, 0, 0), "Customer felt happy"),
            record(at(2024, 1, 1, 8, 0, 0), "Service Experienced delay"),
            record(at(2024, 1, 3, 17, 0, 0), "Customer felt happy"),
        ];
        let criteria = derive_default_criteria(&records).unwrap();
        assert_eq!(criteria.start, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(criteria.end, at(2024, 1, 3, 23, 59, 59));
        assert_eq!(
            criteria.allowed_feedback_types,
            types(&["Customer felt happy", "Service Experienced delay"])
        );
    }

    #[test]
    fn test_default_criteria_empty_set_rejected() {
        let result = derive_default_criteria(&[]);
        assert!(matches!(result, Err(FilterError::EmptyRecordSet)));
    }

    #[test]
    fn test_boundaries_inclusive() {
        let criteria = FilterCriteria {
            start: at(2024, 1, 1, 9, 0, 0),
            end: at(2024, 1, 1, 17, 0, 0),
            allowed_feedback_types: types(&["Customer felt happy"]),
        };
        let records = vec![
            record(criteria.start, "Customer felt happy"),
            record(criteria.end, "Customer felt happy"),
        ];
        assert_eq!(apply_filters(&records, &criteria), vec![0, 1]);
    }

    #[test]
    fn test_one_second_outside_excluded() {
        let criteria = FilterCriteria {
            start: at(2024, 1, 1, 9, 0, 0),
            end: at(2024, 1, 1, 17, 0, 0),
            allowed_feedback_types: types(&["Customer felt happy"]),
        };
        let records = vec![
            record(criteria.start - Duration::seconds(1), "Customer felt happy"),
            record(criteria.end + Duration::seconds(1), "Customer felt happy"),
        ];
        assert!(apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_category_filter() {
        let criteria = FilterCriteria {
            start: at(2024, 1, 1, 0, 0, 0),
            end: at(2024, 1, 1, 23, 59, 59),
            allowed_feedback_types: types(&["Customer felt happy"]),
        };
        let records = vec![
            record(at(2024, 1, 1, 10, 0, 0), "Service Experienced delay"),
            record(at(2024, 1, 1, 11, 0, 0), "Customer felt happy"),
        ];
        let filtered = filter_records(&records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].feedback_type, "Customer felt happy");
    }

    #[test]
    fn test_order_preserved() {
        // Deliberately out of timestamp order.
        let records = vec![
            record(at(2024, 1, 3, 10, 0, 0), "Customer felt happy"),
            record(at(2024, 1, 1, 10, 0, 0), "Service Experienced delay"),
            record(at(2024, 1, 2, 10, 0, 0), "Customer felt happy"),
            record(at(2024, 1, 1, 9, 0, 0), "Customer felt happy"),
        ];
        let criteria = FilterCriteria {
            allowed_feedback_types: types(&["Customer felt happy"]),
            ..derive_default_criteria(&records).unwrap()
        };
        let filtered = filter_records(&records, &criteria);
        let hours: Vec<_> = filtered.iter().map(|r| r.timestamp).collect();
        assert_eq!(
            hours,
            vec![
                at(2024, 1, 3, 10, 0, 0),
                at(2024, 1, 2, 10, 0, 0),
                at(2024, 1, 1, 9, 0, 0),
            ]
        );
        assert_eq!(apply_filters(&records, &criteria), vec![0, 2, 3]);
    }

    #[test]
    fn test_time_range_narrowing() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let criteria = FilterCriteria::for_dates(
            day,
            day,
            Some(TimeRange::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            )),
            types(&["Customer felt happy"]),
        );
        let records = vec![
            record(at(2024, 1, 1, 8, 59, 0), "Customer felt happy"),
            record(at(2024, 1, 1, 9, 30, 0), "Customer felt happy"),
            record(at(2024, 1, 1, 12, 1, 0), "Customer felt happy"),
        ];
        assert_eq!(apply_filters(&records, &criteria), vec![1]);
    }

    #[test]
    fn test_time_range_applies_to_range_ends_only() {
        // Start time and end time bound the first and last day, not every day.
        let criteria = FilterCriteria::for_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            Some(TimeRange::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            )),
            types(&["Customer felt happy"]),
        );
        let late_first_day = record(at(2024, 1, 1, 22, 0, 0), "Customer felt happy");
        assert!(criteria.matches(&late_first_day));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let records = vec![
            record(at(2024, 1, 1, 9, 0, 0), "Customer felt happy"),
            record(at(2024, 1, 3, 18, 0, 0), "Customer felt happy"),
            record(at(2024, 1, 5, 12, 0, 0), "Customer felt happy"),
        ];
        let criteria = FilterCriteria::for_dates(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            None,
            types(&["Customer felt happy"]),
        );
        assert!(criteria.start > criteria.end);
        assert!(filter_records(&records, &criteria).is_empty());

        // Same day, start time after end time.
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let criteria = FilterCriteria::for_dates(
            day,
            day,
            Some(TimeRange::new(
                NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            )),
            types(&["Customer felt happy"]),
        );
        assert!(apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_feedback_types_first_appearance_order() {
        let records = vec![
            record(at(2024, 1, 1, 1, 0, 0), "b"),
            record(at(2024, 1, 1, 2, 0, 0), "a"),
            record(at(2024, 1, 1, 3, 0, 0), "b"),
            record(at(2024, 1, 1, 4, 0, 0), "c"),
        ];
        assert_eq!(feedback_types(&records), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(
            parse_date_input(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date_input("29/02/2024").is_err());
        assert_eq!(
            parse_time_input("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_input("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(matches!(
            parse_time_input("noon"),
            Err(FilterError::InvalidTime { .. })
        ));
    }
}

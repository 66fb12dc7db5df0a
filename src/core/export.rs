// FeedbackReport - core/export.rs
//
// Spreadsheet, CSV and JSON export of filtered feedback records, plus
// re-reading of a written spreadsheet.
// Serialisers write to buffers or Write trait objects; `write_artifact`
// is the only function here that touches the filesystem.

use crate::core::model::{ExportFormat, FeedbackRecord, RecordSet};
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A written export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Full path of the written file.
    pub path: PathBuf,

    /// Deterministic file name derived from the date range.
    pub file_name: String,

    /// Number of data rows written (header excluded).
    pub rows_written: usize,

    pub format: ExportFormat,
}

/// Deterministic export file name for a date range.
///
/// `service_feedback_summary_{start}_to_{end}.{ext}`, with any `:` removed
/// so the name is valid on every platform.
pub fn export_file_name(start_date: NaiveDate, end_date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}_{start_date}_to_{end_date}.{}",
        constants::EXPORT_FILE_PREFIX,
        format.extension()
    )
    .replace(':', "")
}

fn render_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(constants::EXPORT_TIMESTAMP_FORMAT).to_string()
}

/// Export row shape shared by the CSV and JSON writers.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Feedback Type")]
    feedback_type: &'a str,
}

impl<'a> From<&'a FeedbackRecord> for ExportRow<'a> {
    fn from(record: &'a FeedbackRecord) -> Self {
        Self {
            timestamp: render_timestamp(&record.timestamp),
            feedback_type: &record.feedback_type,
        }
    }
}

// =============================================================================
// Serialisers
// =============================================================================

/// Serialise records to an in-memory `.xlsx` workbook.
///
/// One worksheet, header row `Timestamp, Feedback Type`, one row per record.
pub fn xlsx_bytes(records: &[FeedbackRecord], export_path: &Path) -> Result<Vec<u8>, ExportError> {
    let map_err = |source| ExportError::XlsxWrite {
        path: export_path.to_path_buf(),
        source,
    };

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let header_format = rust_xlsxwriter::Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(constants::EXPORT_SHEET_NAME)
            .map_err(map_err)?;
        sheet
            .set_column_width(0, constants::XLSX_TIMESTAMP_COLUMN_WIDTH)
            .map_err(map_err)?;
        sheet
            .set_column_width(1, constants::XLSX_FEEDBACK_COLUMN_WIDTH)
            .map_err(map_err)?;

        for (col, title) in constants::EXPORT_COLUMNS.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *title, &header_format)
                .map_err(map_err)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet
                .write_string(row, 0, render_timestamp(&record.timestamp))
                .map_err(map_err)?;
            sheet
                .write_string(row, 1, record.feedback_type.as_str())
                .map_err(map_err)?;
        }
    }

    workbook.save_to_buffer().map_err(map_err)
}

/// Export records as CSV with the same two columns as the spreadsheet.
pub fn export_csv<W: Write>(
    records: &[FeedbackRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in records {
        csv_writer
            .serialize(ExportRow::from(record))
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
    }

    // An empty export still carries the header row.
    if records.is_empty() {
        csv_writer
            .write_record(constants::EXPORT_COLUMNS)
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export records as a JSON array of `{"Timestamp", "Feedback Type"}` objects.
pub fn export_json<W: Write>(
    records: &[FeedbackRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let rows: Vec<ExportRow<'_>> = records.iter().map(ExportRow::from).collect();
    serde_json::to_writer_pretty(writer, &rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

/// Serialise records in the given format.
pub fn render(
    records: &[FeedbackRecord],
    format: ExportFormat,
    export_path: &Path,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Xlsx => xlsx_bytes(records, export_path),
        ExportFormat::Csv => {
            let mut buf = Vec::new();
            export_csv(records, &mut buf, export_path)?;
            Ok(buf)
        }
        ExportFormat::Json => {
            let mut buf = Vec::new();
            export_json(records, &mut buf, export_path)?;
            Ok(buf)
        }
    }
}

// =============================================================================
// Artifact writing
// =============================================================================

/// Run `write` against `path`, retrying once after a failed first attempt.
fn write_with_retry<F>(path: &Path, mut write: F) -> Result<(), ExportError>
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let mut attempt = 0;
    loop {
        match write(path) {
            Ok(()) => return Ok(()),
            Err(e) if attempt < constants::EXPORT_WRITE_RETRIES => {
                attempt += 1;
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    attempt,
                    "Export write failed; retrying"
                );
            }
            Err(e) => {
                return Err(ExportError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}

/// Write the export artifact for `records` into `output_dir`.
///
/// The file name is derived from the date range; an existing file with the
/// same name is replaced.
pub fn write_artifact(
    records: &[FeedbackRecord],
    start_date: NaiveDate,
    end_date: NaiveDate,
    format: ExportFormat,
    output_dir: &Path,
) -> Result<ExportArtifact, ExportError> {
    let file_name = export_file_name(start_date, end_date, format);
    let path = output_dir.join(&file_name);
    write_artifact_to(records, format, &path).map(|artifact| ExportArtifact {
        file_name,
        ..artifact
    })
}

/// Write the export artifact for `records` to an explicit path
/// (e.g. one chosen in a save dialog).
pub fn write_artifact_to(
    records: &[FeedbackRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<ExportArtifact, ExportError> {
    let bytes = render(records, format, path)?;
    write_with_retry(path, |p| std::fs::write(p, &bytes))?;

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        format = %format,
        "Export written"
    );

    Ok(ExportArtifact {
        path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        rows_written: records.len(),
        format,
    })
}

// =============================================================================
// Re-reading
// =============================================================================

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read a spreadsheet artifact back into records.
///
/// Expects the header row followed by `Timestamp, Feedback Type` rows with
/// timestamps in the export rendering. Line numbers of the returned records
/// are the 1-based worksheet row numbers.
pub fn read_xlsx(path: &Path) -> Result<RecordSet, ExportError> {
    use calamine::Reader;

    let mut workbook: calamine::Xlsx<_> =
        calamine::open_workbook(path).map_err(|source| ExportError::XlsxRead {
            path: path.to_path_buf(),
            source,
        })?;
    let range = workbook
        .worksheet_range(constants::EXPORT_SHEET_NAME)
        .map_err(|source| ExportError::XlsxRead {
            path: path.to_path_buf(),
            source,
        })?;

    let malformed = |row: usize, reason: String| ExportError::MalformedArtifact {
        path: path.to_path_buf(),
        row,
        reason,
    };

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();
    if header != constants::EXPORT_COLUMNS {
        return Err(malformed(1, format!("unexpected header {header:?}")));
    }

    let mut records = Vec::new();
    for (idx, cells) in rows.enumerate() {
        let row = idx + 2;
        let (Some(ts_cell), Some(label_cell)) = (cells.first(), cells.get(1)) else {
            return Err(malformed(row, "expected two columns".to_string()));
        };
        let raw_ts = cell_text(ts_cell);
        let timestamp =
            NaiveDateTime::parse_from_str(&raw_ts, constants::EXPORT_TIMESTAMP_FORMAT)
                .map_err(|e| malformed(row, format!("bad timestamp '{raw_ts}': {e}")))?;
        records.push(FeedbackRecord {
            timestamp,
            feedback_type: cell_text(label_cell),
            line_number: row as u64,
        });
    }

    Ok(records)
}

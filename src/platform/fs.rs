// FeedbackReport - platform/fs.rs
//
// Filesystem helpers for the input log and the export directory.

use crate::util::error::{ExportError, FeedbackReportError};
use std::path::{Path, PathBuf};

/// Read the raw bytes of an input log file.
///
/// Decoding is left to the extractor so encoding errors are reported as
/// extraction failures.
pub fn read_log_bytes(path: &Path) -> Result<Vec<u8>, FeedbackReportError> {
    let bytes = std::fs::read(path).map_err(|source| FeedbackReportError::Io {
        path: path.to_path_buf(),
        operation: "read log file",
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read input log");
    Ok(bytes)
}

/// Resolve the directory an export is written into and make sure it exists.
///
/// `None` means the current working directory. Failure belongs to the
/// export stage.
pub fn prepare_output_dir(dir: Option<&Path>) -> Result<PathBuf, ExportError> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

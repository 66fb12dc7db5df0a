// FeedbackReport - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "FeedbackReport";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "FeedbackReport";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction
// =============================================================================

/// Substrings that mark a line as a customer-service feedback event.
/// A line qualifies when it contains any of them.
pub const DEFAULT_FEEDBACK_MARKERS: &[&str] = &["Customer felt", "Service Experienced"];

/// Field separator inside a feedback event line.
pub const FIELD_SEPARATOR: char = '\t';

/// chrono format of the event timestamp, e.g. `2024-01-01 AM 9:05`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %p %I:%M";

/// Maximum number of marker substrings accepted from config.toml.
pub const MAX_MARKERS: usize = 32;

// =============================================================================
// Filtering
// =============================================================================

/// Date format accepted for start/end date overrides (CLI and sidebar).
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day formats accepted for start/end time overrides, tried in order.
pub const TIME_INPUT_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Default time of day combined with the start date (00:00:00).
pub const DAY_START: (u32, u32, u32) = (0, 0, 0);

/// Default time of day combined with the end date (23:59:59).
pub const DAY_END: (u32, u32, u32) = (23, 59, 59);

// =============================================================================
// Export
// =============================================================================

/// Column headers of every export, in order.
pub const EXPORT_COLUMNS: [&str; 2] = ["Timestamp", "Feedback Type"];

/// Worksheet name used in the spreadsheet export.
pub const EXPORT_SHEET_NAME: &str = "Sheet1";

/// Prefix of the deterministic export file name.
pub const EXPORT_FILE_PREFIX: &str = "service_feedback_summary";

/// Rendering of the timestamp column in exports.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column width (characters) of the timestamp column in the spreadsheet.
pub const XLSX_TIMESTAMP_COLUMN_WIDTH: f64 = 20.0;

/// Column width (characters) of the feedback type column in the spreadsheet.
pub const XLSX_FEEDBACK_COLUMN_WIDTH: f64 = 40.0;

/// Number of additional attempts made after a failed artifact write.
pub const EXPORT_WRITE_RETRIES: usize = 1;

// =============================================================================
// Configuration and logging
// =============================================================================

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when neither RUST_LOG, --debug nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// UI
// =============================================================================

/// Extensions offered by the open-file dialog.
pub const LOG_FILE_EXTENSIONS: &[&str] = &["txt", "log"];

/// Initial window size in points.
pub const WINDOW_SIZE: [f32; 2] = [1000.0, 700.0];

/// Minimum window size in points.
pub const MIN_WINDOW_SIZE: [f32; 2] = [640.0, 420.0];

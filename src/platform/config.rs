// FeedbackReport - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::{ExportFormat, MalformedLinePolicy};
use crate::core::parser::ExtractConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for FeedbackReport configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Default config file inside the platform config directory
    /// (e.g. ~/.config/feedbackreport/config.toml).
    pub config_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let config_dir = match ProjectDirs::from("", "", constants::APP_ID) {
            Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
            None => {
                tracing::warn!("Could not determine platform directories, using current directory");
                PathBuf::from(".")
            }
        };
        let config_file = config_dir.join(constants::CONFIG_FILE_NAME);

        tracing::debug!(config = %config_file.display(), "Platform paths resolved");

        Self { config_file }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so newer config files work with older binaries.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[extraction]` section.
    pub extraction: ExtractionSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[extraction]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    /// Marker substrings that qualify a line as a feedback event.
    pub markers: Option<Vec<String>>,
    /// "skip" or "fail".
    pub malformed_lines: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// "xlsx", "csv" or "json".
    pub format: Option<String>,
    /// Directory the headless run writes into.
    pub output_dir: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Extraction markers and malformed-line policy.
    pub extract: ExtractConfig,
    /// Default export format.
    pub export_format: ExportFormat,
    /// Default export directory (None = current directory).
    pub output_dir: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Read and deserialise a config file.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate a raw config, accumulating a warning for every rejected value.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut problems = Vec::new();

    // -- Extraction: markers --
    if let Some(markers) = raw.extraction.markers {
        let markers: Vec<String> = markers
            .into_iter()
            .filter(|m| !m.trim().is_empty())
            .collect();
        if markers.is_empty() || markers.len() > constants::MAX_MARKERS {
            problems.push(ConfigError::ValueOutOfRange {
                field: "extraction.markers".to_string(),
                value: format!("{} non-empty marker(s)", markers.len()),
                expected: format!("1-{} non-empty strings", constants::MAX_MARKERS),
            });
        } else {
            config.extract.markers = markers;
        }
    }

    // -- Extraction: malformed_lines --
    if let Some(ref policy) = raw.extraction.malformed_lines {
        match policy.to_lowercase().as_str() {
            "skip" => config.extract.malformed_policy = MalformedLinePolicy::Skip,
            "fail" => config.extract.malformed_policy = MalformedLinePolicy::Fail,
            other => problems.push(ConfigError::ValueOutOfRange {
                field: "extraction.malformed_lines".to_string(),
                value: other.to_string(),
                expected: "\"skip\" or \"fail\"".to_string(),
            }),
        }
    }

    // -- Export: format --
    if let Some(ref format) = raw.export.format {
        match ExportFormat::from_name(format) {
            Some(f) => config.export_format = f,
            None => problems.push(ConfigError::ValueOutOfRange {
                field: "export.format".to_string(),
                value: format.clone(),
                expected: "\"xlsx\", \"csv\" or \"json\"".to_string(),
            }),
        }
    }

    // -- Export: output_dir --
    if let Some(dir) = raw.export.output_dir {
        if !dir.trim().is_empty() {
            config.output_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            problems.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level.clone(),
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    (config, problems)
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. A missing file yields defaults with no warnings; an unreadable
/// or unparseable file yields defaults with one warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_raw_config(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, problems) = validate(raw);
    let warnings: Vec<String> = problems
        .iter()
        .map(|p| format!("{p}. Using default."))
        .collect();

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

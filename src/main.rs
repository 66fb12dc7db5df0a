// FeedbackReport - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Either a headless extract -> filter -> export run, or the eframe window

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use feedback_report::app;
pub use feedback_report::core;
pub use feedback_report::platform;
pub use feedback_report::ui;
pub use feedback_report::util;

use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::app::pipeline::{ExportRequest, FilterOverrides, RunOutcome, RunRequest};
use crate::core::filter::{self, TimeRange};
use crate::core::model::{ExportFormat, MalformedLinePolicy};
use crate::platform::config::AppConfig;
use crate::util::error::{FeedbackReportError, FilterError};

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    filter::parse_date_input(s).map_err(|e| e.to_string())
}

fn parse_time_arg(s: &str) -> Result<NaiveTime, String> {
    filter::parse_time_input(s).map_err(|e| e.to_string())
}

fn parse_format_arg(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_name(s).ok_or_else(|| format!("unknown format '{s}' (xlsx, csv, json)"))
}

/// FeedbackReport - customer service feedback reports from interaction logs.
///
/// Extracts "Customer felt ..." and "Service Experienced ..." events from a
/// tab-separated log, filters them by date, time and type, and exports a
/// spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "FeedbackReport", version, about)]
struct Cli {
    /// Log file to load (opens an empty window if omitted).
    path: Option<PathBuf>,

    /// Run once without a window: extract, filter, export, exit.
    #[arg(long, requires = "path")]
    headless: bool,

    /// First day to include (YYYY-MM-DD). Defaults to the earliest event's day.
    #[arg(long, value_parser = parse_date_arg)]
    start_date: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Defaults to the latest event's day.
    #[arg(long, value_parser = parse_date_arg)]
    end_date: Option<NaiveDate>,

    /// Time of day on the start date (HH:MM[:SS]). Needs --end-time.
    #[arg(long, value_parser = parse_time_arg)]
    start_time: Option<NaiveTime>,

    /// Time of day on the end date (HH:MM[:SS]). Needs --start-time.
    #[arg(long, value_parser = parse_time_arg)]
    end_time: Option<NaiveTime>,

    /// Feedback type to keep; repeat for several. Defaults to all types.
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    /// Export format: xlsx, csv or json.
    #[arg(short = 'f', long, value_parser = parse_format_arg)]
    format: Option<ExportFormat>,

    /// Directory the export is written into (headless mode).
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Abort on a marker line without a tab-separated label instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long)]
    debug: bool,
}

impl Cli {
    fn overrides(&self) -> Result<FilterOverrides, FilterError> {
        let time_range = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(TimeRange::new(start, end)),
            (None, None) => None,
            _ => return Err(FilterError::IncompleteTimeRange),
        };
        Ok(FilterOverrides {
            start_date: self.start_date,
            end_date: self.end_date,
            time_range,
            feedback_types: (!self.types.is_empty()).then(|| self.types.clone()),
        })
    }
}

/// Run the pipeline once against `path` and write the export.
fn run_headless(cli: &Cli, path: &Path, config: &AppConfig) -> Result<RunOutcome, FeedbackReportError> {
    let bytes = platform::fs::read_log_bytes(path)?;
    let output_dir = platform::fs::prepare_output_dir(
        cli.output_dir.as_deref().or(config.output_dir.as_deref()),
    )?;

    let request = RunRequest {
        extract: config.extract.clone(),
        overrides: cli.overrides()?,
        export: Some(ExportRequest {
            format: cli.format.unwrap_or(config.export_format),
            output_dir,
        }),
    };

    app::pipeline::run(&bytes, &request)
}

fn report_error(err: &FeedbackReportError) {
    tracing::error!(error = %err, "Run failed");
    eprintln!("Error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn main() {
    let cli = Cli::parse();

    // Config comes first so its log level can seed the subscriber.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file);
    let (mut config, config_warnings) = platform::config::load_config(&config_path);
    if cli.strict {
        config.extract.malformed_policy = MalformedLinePolicy::Fail;
    }

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        headless = cli.headless,
        malformed_lines = config.extract.malformed_policy.label(),
        "FeedbackReport starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if cli.headless {
        let Some(path) = cli.path.as_deref() else {
            eprintln!("Error: --headless needs a log file path");
            std::process::exit(2);
        };
        match run_headless(&cli, path, &config) {
            Ok(outcome) => {
                for skipped in &outcome.extraction.skipped_malformed {
                    eprintln!("Warning: skipped malformed {skipped}");
                }
                println!(
                    "{} of {} feedback events between {} and {}",
                    outcome.filtered.len(),
                    outcome.extraction.records.len(),
                    outcome.criteria.start,
                    outcome.criteria.end
                );
                if let Some(artifact) = outcome.artifact {
                    println!(
                        "Wrote {} rows to {}",
                        artifact.rows_written,
                        artifact.path.display()
                    );
                }
            }
            Err(e) => {
                report_error(&e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut state = app::state::AppState::new(
        config.extract.clone(),
        cli.format.unwrap_or(config.export_format),
    );
    state.warnings.extend(config_warnings);
    if let Some(ref path) = cli.path {
        if let Err(e) = state.load_path(path) {
            tracing::error!(path = %path.display(), error = %e, "Failed to load log");
            state.status_message = e.to_string();
        }
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size(util::constants::WINDOW_SIZE)
            .with_min_inner_size(util::constants::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::FeedbackReportApp::new(state)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch FeedbackReport window: {e}");
        std::process::exit(1);
    }
}

//! CLI definitions and entry point

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use covscope::config::Config;
use covscope::core::selector::{self, LogObserver};
use covscope::gotool::{self, CoverageRunner, ReportFormat};
use covscope::output::{CoverageReport, OutputMode};

/// covscope - per-package Go test coverage with pattern-scoped thresholds
#[derive(Parser, Debug)]
#[command(
    name = "covscope",
    version,
    about = "Per-package Go test coverage with pattern-scoped thresholds",
    long_about = "Run `go test` with coverage for every package matching the\n\
                  configured cover patterns, compare each package against its\n\
                  threshold, and print a pass/fail table.\n\n\
                  Patterns are package paths where `*` matches any run of\n\
                  characters; each cover pattern may carry its own threshold."
)]
pub struct Cli {
    /// Directory containing the Go module to test
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Path to the YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Default coverage threshold for patterns without an override
    #[arg(long)]
    pub default_threshold: Option<f64>,

    /// Directory for coverage reports
    #[arg(long)]
    pub coverage_dir: Option<PathBuf>,

    /// On-disk format for kept coverage reports
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormat>,

    /// Comma-separated package patterns to exclude
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Emit results as CSV instead of a table
    #[arg(long)]
    pub csv: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file (defaults to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Keep coverage reports after printing
    #[arg(long, action = clap::ArgAction::Set, num_args = 1)]
    pub keep_reports: Option<bool>,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    apply_flags(&mut config, &cli);

    init_logging(&config)?;

    let universe = gotool::list_packages(&cli.dir)?;
    let selected = selector::select(&universe, &config.selection_rules(), &mut LogObserver)?;

    let runner = CoverageRunner::new(&config.coverage_reports_dir, config.coverage_reports_format)
        .with_context(|| {
            format!("creating reports directory {}", config.coverage_reports_dir)
        })?;
    let coverages = gotool::run_all(&runner, &selected);

    let report = CoverageReport::new(&coverages, &selected, config.default_coverage_threshold);
    let mode = if cli.csv { OutputMode::Csv } else { OutputMode::Table };
    report.render(mode);

    cleanup_reports(&config);

    Ok(())
}

/// Override configuration values with command line flags where set
fn apply_flags(config: &mut Config, cli: &Cli) {
    if let Some(threshold) = cli.default_threshold {
        config.default_coverage_threshold = threshold;
    }
    if let Some(dir) = &cli.coverage_dir {
        config.coverage_reports_dir = dir.display().to_string();
    }
    if let Some(format) = cli.report_format {
        config.coverage_reports_format = format;
    }
    config.exclude_packages.extend(cli.exclude.iter().cloned());
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.display().to_string());
    }
    if let Some(keep) = cli.keep_reports {
        config.keep_reports = keep;
    }
}

/// Initialize the logger from the configured level and optional file target
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let level = config.logging.level.as_str();
    match level {
        "debug" | "info" | "warn" | "error" => {},
        other => anyhow::bail!("invalid log level: {other}"),
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    if let Some(path) = &config.logging.file {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("opening log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Remove reports the configuration does not ask to keep.
///
/// Cleanup problems are logged, never fatal; the report has already been
/// printed by the time this runs.
fn cleanup_reports(config: &Config) {
    let dir = Path::new(&config.coverage_reports_dir);

    if !config.keep_reports {
        if let Err(err) = fs::remove_dir_all(dir) {
            log::error!("removing reports directory {}: {err}", dir.display());
        }
        return;
    }

    // Keep only the selected format's files.
    let stale = match config.coverage_reports_format {
        ReportFormat::Lcov => ReportFormat::Out,
        ReportFormat::Out => ReportFormat::Lcov,
    };
    if let Err(err) = gotool::prune_reports(dir, stale.extension()) {
        log::error!("pruning .{stale} reports in {}: {err}", dir.display());
    }
}

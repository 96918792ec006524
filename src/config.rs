//! Configuration loading and merging
//!
//! Configuration is resolved in three layers of increasing precedence:
//! built-in defaults, an optional YAML file, then command line flags.
//! Absent file fields fall back to the defaults via serde; flag overrides
//! are applied by the CLI layer after loading.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::selector::{CoverPattern, SelectionRules};
use crate::gotool::ReportFormat;

/// Coverage threshold used when neither the config nor a pattern sets one
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// Directory coverage reports are written to by default
pub const DEFAULT_REPORTS_DIR: &str = "./coverage_reports";

/// Default logging level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Threshold applied to cover patterns without an override
    #[serde(default = "default_threshold")]
    pub default_coverage_threshold: f64,

    /// Directory where per-package coverage reports are written
    #[serde(default = "default_reports_dir")]
    pub coverage_reports_dir: String,

    /// On-disk format for kept coverage reports
    #[serde(default)]
    pub coverage_reports_format: ReportFormat,

    /// Inclusion rules, in order of threshold precedence
    #[serde(default = "default_cover_packages")]
    pub cover_packages: Vec<CoverPattern>,

    /// Packages removed after cover patterns have been applied
    #[serde(default)]
    pub exclude_packages: Vec<String>,

    /// Logging preferences
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Keep coverage reports after printing
    #[serde(default = "default_true")]
    pub keep_reports: bool,
}

/// Logging preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file; stderr when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_reports_dir() -> String {
    DEFAULT_REPORTS_DIR.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_cover_packages() -> Vec<CoverPattern> {
    // Cover every package unless the config narrows the sweep.
    vec![CoverPattern {
        pattern: "*".to_string(),
        threshold: None,
    }]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_coverage_threshold: default_threshold(),
            coverage_reports_dir: default_reports_dir(),
            coverage_reports_format: ReportFormat::default(),
            cover_packages: default_cover_packages(),
            exclude_packages: Vec::new(),
            logging: LoggingConfig::default(),
            keep_reports: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Project the config into the selector's input view
    #[must_use]
    pub fn selection_rules(&self) -> SelectionRules {
        SelectionRules {
            default_threshold: self.default_coverage_threshold,
            cover_patterns: self.cover_packages.clone(),
            exclude_patterns: self.exclude_packages.clone(),
        }
    }
}

//! Per-package coverage runs
//!
//! Runs `go test -coverprofile` for each selected package, scrapes the
//! coverage percentage from the test output, and optionally converts the
//! profile to LCOV with `gcov2lcov`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::selector::SelectedPackage;

/// On-disk format for kept coverage reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Raw Go cover profile (`.out`)
    Out,
    /// LCOV trace converted with `gcov2lcov` (`.lcov`)
    #[default]
    Lcov,
}

impl ReportFormat {
    /// File extension for reports of this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::Lcov => "lcov",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Failure while measuring one package's coverage
#[derive(Debug, Error)]
pub enum CoverageError {
    /// The test run itself failed
    #[error("`go test` failed: {0}")]
    TestFailed(String),

    /// Test output carried no recognizable coverage line
    #[error("coverage percentage not found in test output")]
    PercentageNotFound,

    /// LCOV conversion failed
    #[error("converting profile to lcov: {0}")]
    ConversionFailed(String),

    /// Spawning an external command failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Raw outcome of one package's test run
#[derive(Debug, Clone)]
pub struct TestRun {
    /// Measured coverage percentage
    pub percentage: f64,

    /// Coverage report written for the package
    pub report_file: PathBuf,
}

/// Coverage measured for one package
#[derive(Debug, Clone)]
pub struct Coverage {
    /// Fully-qualified package path
    pub package: String,

    /// Measured coverage percentage; 0.0 when the run failed
    pub percentage: f64,

    /// Report file, absent when the run failed before producing one
    pub report_file: Option<PathBuf>,
}

/// Runs tests for a single package and reports its coverage
///
/// [`run_all`] depends only on this trait so the sweep can be exercised
/// without a Go toolchain.
pub trait PackageTester {
    /// Test one package and measure its coverage
    fn test_package(&self, package: &SelectedPackage) -> Result<TestRun, CoverageError>;
}

/// [`PackageTester`] backed by `go test -coverprofile`
#[derive(Debug, Clone)]
pub struct CoverageRunner {
    reports_dir: PathBuf,
    format: ReportFormat,
}

impl CoverageRunner {
    /// Create a runner, ensuring the reports directory exists
    pub fn new(reports_dir: impl Into<PathBuf>, format: ReportFormat) -> io::Result<Self> {
        let reports_dir = reports_dir.into();
        fs::create_dir_all(&reports_dir)?;
        Ok(Self {
            reports_dir,
            format,
        })
    }

    fn profile_path(&self, package: &str) -> PathBuf {
        self.reports_dir
            .join(format!("coverage_{}.out", package.replace('/', "_")))
    }
}

impl PackageTester for CoverageRunner {
    fn test_package(&self, package: &SelectedPackage) -> Result<TestRun, CoverageError> {
        let profile = self.profile_path(&package.name);
        let output = Command::new("go")
            .arg("test")
            .arg(format!("-coverprofile={}", profile.display()))
            .arg(&package.name)
            .output()?;

        if !output.status.success() {
            return Err(CoverageError::TestFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let percentage = extract_coverage_percentage(&combined)?;

        let report_file = match self.format {
            ReportFormat::Out => profile,
            ReportFormat::Lcov => match convert_to_lcov(&profile) {
                Ok(lcov) => lcov,
                // Conversion failure keeps the raw profile usable.
                Err(err) => {
                    log::error!("package {}: {err}", package.name);
                    profile
                },
            },
        };

        Ok(TestRun {
            percentage,
            report_file,
        })
    }
}

/// Measure coverage for every selected package.
///
/// A package whose run fails is logged and reported as a 0% row with no
/// report file; the sweep never aborts.
pub fn run_all(tester: &dyn PackageTester, packages: &[SelectedPackage]) -> Vec<Coverage> {
    packages
        .iter()
        .map(|package| {
            log::info!("testing package: {}", package.name);
            match tester.test_package(package) {
                Ok(run) => Coverage {
                    package: package.name.clone(),
                    percentage: run.percentage,
                    report_file: Some(run.report_file),
                },
                Err(err) => {
                    if matches!(err, CoverageError::PercentageNotFound) {
                        log::warn!("package {}: {err}", package.name);
                    } else {
                        log::error!("package {}: {err}", package.name);
                    }
                    Coverage {
                        package: package.name.clone(),
                        percentage: 0.0,
                        report_file: None,
                    }
                },
            }
        })
        .collect()
}

/// Remove report files with the given extension from the reports directory
pub fn prune_reports(dir: &Path, extension: &str) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == extension) {
            fs::remove_file(&path)?;
            log::info!("removed report file: {}", path.display());
        }
    }
    Ok(())
}

/// Extract the coverage percentage from `go test` output
fn extract_coverage_percentage(output: &str) -> Result<f64, CoverageError> {
    let regex =
        Regex::new(r"coverage: ([0-9.]+)% of statements").expect("scrape pattern is valid");
    let captures = regex
        .captures(output)
        .ok_or(CoverageError::PercentageNotFound)?;
    captures[1]
        .parse()
        .map_err(|_| CoverageError::PercentageNotFound)
}

/// Convert a Go cover profile to LCOV with `gcov2lcov`
fn convert_to_lcov(profile: &Path) -> Result<PathBuf, CoverageError> {
    let lcov = profile.with_extension("lcov");
    let status = Command::new("gcov2lcov")
        .arg("-infile")
        .arg(profile)
        .arg("-outfile")
        .arg(&lcov)
        .status()?;

    if status.success() {
        Ok(lcov)
    } else {
        Err(CoverageError::ConversionFailed(status.to_string()))
    }
}

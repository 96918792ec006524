//! Go toolchain integration
//!
//! Wrappers around the external `go` and `gcov2lcov` commands. Everything
//! here is I/O; the selection core never calls into this module.

use std::path::Path;
use std::process::Command;

use anyhow::Context;

mod runner;

pub use runner::{
    Coverage, CoverageError, CoverageRunner, PackageTester, ReportFormat, TestRun, prune_reports,
    run_all,
};

/// List all Go packages under `dir`.
///
/// This is the package universe later narrowed down by selection. A failing
/// `go list` is fatal; nothing can be selected without a universe.
pub fn list_packages(dir: &Path) -> anyhow::Result<Vec<String>> {
    let output = Command::new("go")
        .args(["list", "./..."])
        .current_dir(dir)
        .output()
        .with_context(|| format!("running `go list` in {}", dir.display()))?;

    if !output.status.success() {
        anyhow::bail!(
            "`go list` failed in {}: {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.split_whitespace().map(String::from).collect())
}

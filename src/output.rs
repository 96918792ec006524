//! Rendering of coverage results
//!
//! Results render either as a colored pass/fail table or as CSV rows.

use std::io::{self, Write};

use comfy_table::{Cell, Color, Table};

use crate::core::selector::SelectedPackage;
use crate::gotool::Coverage;

/// Output mode for coverage results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Colored pass/fail table (default)
    #[default]
    Table,
    /// CSV rows (machine-readable)
    Csv,
}

/// One row of the coverage report
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    /// Fully-qualified package path
    pub package: String,

    /// Measured coverage percentage
    pub percentage: f64,

    /// Threshold the package must meet
    pub threshold: f64,
}

impl CoverageRow {
    /// Whether the package meets its threshold
    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= self.threshold
    }
}

/// Coverage results ready for rendering
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Report rows, in selection order
    pub rows: Vec<CoverageRow>,
}

impl CoverageReport {
    /// Build a report, resolving each row's threshold from the selected
    /// package list and falling back to the default threshold.
    #[must_use]
    pub fn new(
        coverages: &[Coverage],
        packages: &[SelectedPackage],
        default_threshold: f64,
    ) -> Self {
        let rows = coverages
            .iter()
            .map(|coverage| {
                let threshold = packages
                    .iter()
                    .find(|package| package.name == coverage.package)
                    .map_or(default_threshold, |package| package.threshold);
                CoverageRow {
                    package: coverage.package.clone(),
                    percentage: coverage.percentage,
                    threshold,
                }
            })
            .collect();
        Self { rows }
    }

    /// Render the report to stdout
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Table => self.render_table(),
            OutputMode::Csv => {
                let _ = self.write_csv(&mut io::stdout());
            },
        }
    }

    fn render_table(&self) {
        let mut table = Table::new();
        table.set_header(vec!["Package", "Coverage", "Threshold"]);
        for row in &self.rows {
            let color = if row.passed() { Color::Green } else { Color::Red };
            table.add_row(vec![
                Cell::new(&row.package).fg(color),
                Cell::new(format!("{:.2}%", row.percentage)).fg(color),
                Cell::new(format!("{:.2}%", row.threshold)).fg(color),
            ]);
        }
        println!("{table}");
    }

    /// Write the report as CSV
    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Package Name,Coverage Percentage,Threshold")?;
        for row in &self.rows {
            writeln!(
                out,
                "{},{:.2}%,{:.2}%",
                csv_field(&row.package),
                row.percentage,
                row.threshold
            )?;
        }
        Ok(())
    }
}

/// Quote a CSV field when it contains a separator, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

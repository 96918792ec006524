//! Tests for coverage report construction and rendering

use std::path::PathBuf;

use covscope::core::selector::SelectedPackage;
use covscope::gotool::Coverage;
use covscope::output::{CoverageReport, CoverageRow};

fn coverage(package: &str, percentage: f64) -> Coverage {
    Coverage {
        package: package.to_string(),
        percentage,
        report_file: Some(PathBuf::from("coverage.out")),
    }
}

fn selected(name: &str, threshold: f64) -> SelectedPackage {
    SelectedPackage {
        name: name.to_string(),
        threshold,
    }
}

#[test]
fn test_rows_resolve_threshold_by_package() {
    let report = CoverageReport::new(
        &[coverage("a/b", 91.0), coverage("a/c", 40.0)],
        &[selected("a/b", 90.0), selected("a/c", 50.0)],
        80.0,
    );

    assert_eq!(
        report.rows,
        vec![
            CoverageRow {
                package: "a/b".to_string(),
                percentage: 91.0,
                threshold: 90.0,
            },
            CoverageRow {
                package: "a/c".to_string(),
                percentage: 40.0,
                threshold: 50.0,
            },
        ]
    );
    assert!(report.rows[0].passed());
    assert!(!report.rows[1].passed());
}

#[test]
fn test_unknown_package_uses_default_threshold() {
    let report = CoverageReport::new(&[coverage("a/b", 10.0)], &[], 80.0);
    assert_eq!(report.rows[0].threshold, 80.0);
}

#[test]
fn test_meeting_the_threshold_exactly_passes() {
    let row = CoverageRow {
        package: "a/b".to_string(),
        percentage: 80.0,
        threshold: 80.0,
    };
    assert!(row.passed());
}

#[test]
fn test_csv_output() {
    let report = CoverageReport::new(&[coverage("a/b", 85.0)], &[selected("a/b", 80.0)], 80.0);

    let mut out = Vec::new();
    report.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "Package Name,Coverage Percentage,Threshold\na/b,85.00%,80.00%\n"
    );
}

#[test]
fn test_csv_quotes_fields_with_separators() {
    let report = CoverageReport::new(&[coverage("a,b", 85.0)], &[], 80.0);

    let mut out = Vec::new();
    report.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\"a,b\""));
}

#[test]
fn test_empty_report_writes_header_only() {
    let report = CoverageReport::new(&[], &[], 80.0);

    let mut out = Vec::new();
    report.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "Package Name,Coverage Percentage,Threshold\n");
}

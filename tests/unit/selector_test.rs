//! Tests for package selection over realistic universes

use covscope::core::selector::{
    CoverPattern, SelectedPackage, SelectionEvent, SelectionObserver, SelectionRules, select,
};

#[derive(Default)]
struct Recorder {
    events: Vec<SelectionEvent>,
}

impl SelectionObserver for Recorder {
    fn notify(&mut self, event: SelectionEvent) {
        self.events.push(event);
    }
}

fn universe(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn cover(pattern: &str, threshold: Option<f64>) -> CoverPattern {
    CoverPattern {
        pattern: pattern.to_string(),
        threshold,
    }
}

#[test]
fn test_realistic_module_sweep() {
    let universe = universe(&[
        "github.com/example/project",
        "github.com/example/project/api",
        "github.com/example/project/api/v2",
        "github.com/example/project/internal/auth",
        "github.com/example/project/internal/gen",
        "github.com/example/project/cmd/server",
    ]);

    let rules = SelectionRules {
        default_threshold: 80.0,
        cover_patterns: vec![
            cover("github.com/example/project/internal/*", Some(95.0)),
            cover("github.com/example/project/*", None),
        ],
        exclude_patterns: vec!["github.com/example/project/internal/gen".to_string()],
    };

    let mut observer = Recorder::default();
    let selected = select(&universe, &rules, &mut observer).unwrap();

    let names: Vec<&str> = selected.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "github.com/example/project/internal/auth",
            "github.com/example/project/api",
            "github.com/example/project/api/v2",
            "github.com/example/project/cmd/server",
        ]
    );

    // internal/auth was first matched by the internal pattern.
    assert_eq!(selected[0].threshold, 95.0);
    assert!(selected[1..].iter().all(|p| p.threshold == 80.0));

    assert_eq!(
        observer.events,
        vec![SelectionEvent::Excluded {
            package: "github.com/example/project/internal/gen".to_string(),
        }]
    );
}

#[test]
fn test_selection_is_repeatable() {
    let universe = universe(&["a/b", "a/c", "b/d"]);
    let rules = SelectionRules {
        default_threshold: 80.0,
        cover_patterns: vec![cover("a/*", Some(90.0)), cover("b/*", None)],
        exclude_patterns: vec!["a/c".to_string()],
    };

    let first = select(&universe, &rules, &mut Recorder::default()).unwrap();
    let second = select(&universe, &rules, &mut Recorder::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unmatched_pattern_yields_empty_selection() {
    let mut observer = Recorder::default();
    let selected = select(
        &universe(&["a/b"]),
        &SelectionRules {
            default_threshold: 80.0,
            cover_patterns: vec![cover("z/*", None)],
            exclude_patterns: Vec::new(),
        },
        &mut observer,
    )
    .unwrap();

    assert!(selected.is_empty());
    assert_eq!(
        observer.events,
        vec![SelectionEvent::NoMatch {
            pattern: "z/*".to_string(),
        }]
    );
}

#[test]
fn test_invalid_pattern_returns_no_packages() {
    let err = select(
        &universe(&["a/b"]),
        &SelectionRules {
            default_threshold: 80.0,
            cover_patterns: vec![cover("a[", None)],
            exclude_patterns: Vec::new(),
        },
        &mut Recorder::default(),
    )
    .unwrap_err();

    assert_eq!(err.pattern, "a[");
}

#[test]
fn test_selected_packages_carry_resolved_thresholds() {
    let selected = select(
        &universe(&["a/b", "a/c"]),
        &SelectionRules {
            default_threshold: 80.0,
            cover_patterns: vec![cover("a/b", Some(100.0)), cover("a/*", None)],
            exclude_patterns: Vec::new(),
        },
        &mut Recorder::default(),
    )
    .unwrap();

    assert_eq!(
        selected,
        vec![
            SelectedPackage {
                name: "a/b".to_string(),
                threshold: 100.0,
            },
            SelectedPackage {
                name: "a/c".to_string(),
                threshold: 80.0,
            },
        ]
    );
}

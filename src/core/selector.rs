//! Package selection and threshold resolution
//!
//! Pure logic turning a package universe and a set of selection rules into
//! the final annotated package list. The only way out of this module besides
//! the return value is the injected [`SelectionObserver`]; the selector
//! itself performs no I/O and holds no state between calls.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::matcher::{self, PatternError};

/// An inclusion rule with an optional threshold override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverPattern {
    /// The pattern packages must match
    #[serde(rename = "name")]
    pub pattern: String,

    /// Threshold override; the default threshold applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// A package chosen for testing, annotated with the threshold it must meet
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPackage {
    /// Fully-qualified package path
    pub name: String,

    /// Minimum coverage percentage this package must reach
    pub threshold: f64,
}

/// Filtering rules applied to the package universe
#[derive(Debug, Clone)]
pub struct SelectionRules {
    /// Threshold for cover patterns without an override
    pub default_threshold: f64,

    /// Inclusion rules, in order of threshold precedence
    pub cover_patterns: Vec<CoverPattern>,

    /// Removal rules applied to already-selected packages
    pub exclude_patterns: Vec<String>,
}

/// Non-fatal diagnostic raised while selecting packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A cover pattern matched no package in the universe
    NoMatch {
        /// The pattern that matched nothing
        pattern: String,
    },

    /// A selected package was removed by an exclude pattern
    Excluded {
        /// The removed package
        package: String,
    },
}

/// Sink for selection diagnostics
///
/// Injected into [`select`] so the core stays free of global logging and
/// tests can record events instead.
pub trait SelectionObserver {
    /// Receive one diagnostic event
    fn notify(&mut self, event: SelectionEvent);
}

/// Observer that forwards selection events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SelectionObserver for LogObserver {
    fn notify(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::NoMatch { pattern } => {
                log::warn!("no packages found matching cover pattern: {pattern}");
            },
            SelectionEvent::Excluded { package } => {
                log::info!("excluding package: {package}");
            },
        }
    }
}

/// Select the packages to test and resolve their thresholds.
///
/// Cover patterns are applied in configured order against the universe in
/// input order. A package is recorded once, with the threshold of the first
/// pattern that matched it; a cover pattern that matches nothing raises
/// [`SelectionEvent::NoMatch`]. Exclude patterns then remove candidates,
/// raising [`SelectionEvent::Excluded`] per removal. Survivors are returned
/// in first-discovery order.
///
/// # Errors
///
/// Any pattern that fails to compile aborts the whole selection with
/// [`PatternError`]; no partial list is returned.
pub fn select(
    universe: &[String],
    rules: &SelectionRules,
    observer: &mut dyn SelectionObserver,
) -> Result<Vec<SelectedPackage>, PatternError> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for cover in &rules.cover_patterns {
        let mut found = false;
        for package in universe {
            if matcher::matches(package, std::slice::from_ref(&cover.pattern))? {
                found = true;
                if seen.insert(package.clone()) {
                    candidates.push(SelectedPackage {
                        name: package.clone(),
                        threshold: cover.threshold.unwrap_or(rules.default_threshold),
                    });
                }
            }
        }
        if !found {
            observer.notify(SelectionEvent::NoMatch {
                pattern: cover.pattern.clone(),
            });
        }
    }

    let mut selected = Vec::with_capacity(candidates.len());
    for package in candidates {
        if matcher::matches(&package.name, &rules.exclude_patterns)? {
            observer.notify(SelectionEvent::Excluded {
                package: package.name,
            });
        } else {
            selected.push(package);
        }
    }

    Ok(selected)
}

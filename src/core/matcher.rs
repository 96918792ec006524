//! Package pattern matching
//!
//! This module contains pure matching logic with no I/O dependencies.
//!
//! A pattern is a literal package path in which `*` matches any run of
//! characters, including `/`:
//!
//! - `github.com/example/*` - any package under that prefix
//! - `github.com/*/project` - any package with that head and tail
//! - `github.com/example/project/pkg` - exactly that package
//!
//! Matching is anchored at both ends; a pattern never matches a substring.

use regex::Regex;
use thiserror::Error;

/// A configured pattern that cannot be compiled into a matcher
#[derive(Debug, Error)]
#[error("pattern '{pattern}': {source}")]
pub struct PatternError {
    /// The offending pattern, as configured
    pub pattern: String,
    /// The underlying compile error
    #[source]
    pub source: regex::Error,
}

/// Check whether `package` matches any of `patterns`.
///
/// Patterns are scanned in input order and evaluation stops at the first
/// match or the first invalid pattern, whichever comes first; patterns after
/// a match are never compiled. An empty pattern list matches nothing.
///
/// Everything except `*` is handed to the regex engine verbatim, so regex
/// metacharacters keep their meaning: `a.b` also matches `axb`, and an
/// unbalanced `[` fails with [`PatternError`].
pub fn matches<S: AsRef<str>>(package: &str, patterns: &[S]) -> Result<bool, PatternError> {
    for pattern in patterns {
        if compile(pattern.as_ref())?.is_match(package) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Translate a pattern into an anchored regex: `*` expands to `.*`.
fn compile(pattern: &str) -> Result<Regex, PatternError> {
    let anchored = format!("^{}$", pattern.replace('*', ".*"));
    Regex::new(&anchored).map_err(|source| PatternError {
        pattern: pattern.to_string(),
        source,
    })
}

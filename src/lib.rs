//! covscope - per-package Go test coverage with pattern-scoped thresholds
//!
//! This library selects the packages to test from configurable cover and
//! exclude patterns, resolves the coverage threshold each package must meet,
//! runs the Go toolchain once per selected package, and renders the results
//! as a pass/fail table or CSV.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod gotool;
pub mod output;

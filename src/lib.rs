#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! next-bundle-report library
//!
//! Measures the gzipped size of every page of a Next.js build, compares the
//! sizes with those of a reference build and renders Markdown reports for
//! pull request comments and tracking issues. Everything the CLI does is
//! available programmatically.
//!
//! # Basic Example
//!
//! Comparing two measurements and rendering the report table:
//!
//! ```
//! use next_bundle_report::bundle::PageBundleSize;
//! use next_bundle_report::diff::BundleComparison;
//! use next_bundle_report::report::comparison_table;
//!
//! let reference = vec![PageBundleSize::new("/a", 500)];
//! let current = vec![PageBundleSize::new("/a", 2000)];
//!
//! let comparison = BundleComparison::new(&reference, &current);
//! let table = comparison_table(&comparison, "Route (Pages)").unwrap();
//!
//! assert!(table.ends_with("| `/a` | 1.95 KB | +1.46 KB |"));
//! ```
//!
//! # Advanced Example: Measuring a Build
//!
//! ```
//! use next_bundle_report::bundle::{BundleSizeExtractor, RouteCategory};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let build = TempDir::new().unwrap();
//! fs::write(
//!     build.path().join("build-manifest.json"),
//!     r#"{"pages":{"/":["main.js"]}}"#,
//! )
//! .unwrap();
//! fs::write(build.path().join("main.js"), "console.log('hi')").unwrap();
//!
//! let mut extractor = BundleSizeExtractor::new(build.path());
//! let pages = extractor.extract(RouteCategory::Pages).unwrap();
//!
//! assert_eq!(pages[0].page, "/");
//! assert!(pages[0].size > 0);
//! ```

/// Next.js bundle measurement
pub mod bundle;
/// CI artifacts and report publishing
pub mod cicd;
/// Command-line definition
pub mod cli;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file support
pub mod config;
/// Size comparison between builds
pub mod diff;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Git metadata utilities
pub mod git;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Next.js build manifests
pub mod manifest;
/// Run orchestration
pub mod pipeline;
/// Markdown report rendering
pub mod report;

//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Fake Next.js build output ([`fixtures::NextBuild`])
//! - Snapshot file helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures::NextBuild;
//!
//! let build = NextBuild::new("web")?
//!     .page("/", &["static/chunks/pages/index.js"], "export default 1")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod fixtures;

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}

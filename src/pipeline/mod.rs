//! Run orchestration
//!
//! A run is strictly sequential:
//! 1. fetch the default branch's reference snapshots
//! 2. measure the three route categories of the local build
//! 3. upload the new snapshots
//! 4. publish a pull request comment, or the tracking issue on the default branch

pub mod context;
pub mod run;

pub use context::{detect_app_name, resolve_ref, resolve_sha, RunContext};
pub use run::{BundleReportRun, CategorySizes, RunOptions, RunSummary};

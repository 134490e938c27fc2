//! Compare command implementation
//!
//! Handles `next-bundle-report compare`, which diffs two snapshot files and
//! prints the table a pull request comment would contain.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cicd::BundleSnapshot;
use crate::diff::BundleComparison;
use crate::report::{comparison_table, FALLBACK_TEXT};

/// Arguments of `next-bundle-report compare`
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Reference snapshot (e.g. from the default branch)
    pub reference: PathBuf,

    /// Current snapshot
    pub current: PathBuf,

    /// Table header
    #[arg(short, long, default_value = "Route (Pages)")]
    pub name: String,
}

/// Rendered comparison of two snapshot files, `None` when nothing changed
///
/// # Examples
///
/// ```no_run
/// use next_bundle_report::cmd::compare::render_comparison;
/// use std::path::Path;
///
/// let table = render_comparison(
///     Path::new("main/bundle-sizes.json"),
///     Path::new(".bundle-report/bundle-sizes.json"),
///     "Route (Pages)",
/// )?;
/// println!("{}", table.unwrap_or_default());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn render_comparison(reference: &Path, current: &Path, name: &str) -> Result<Option<String>> {
    let reference = read_snapshot(reference)?;
    let current = read_snapshot(current)?;

    let comparison = BundleComparison::new(&reference.data, &current.data);
    Ok(comparison_table(&comparison, name))
}

/// Print the comparison table of two snapshot files
pub fn cmd_compare(args: &CompareArgs) -> Result<()> {
    match render_comparison(&args.reference, &args.current, &args.name)? {
        Some(table) => println!("{}", table),
        None => println!("{}", FALLBACK_TEXT),
    }
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<BundleSnapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Snapshot file not found: {}", path.display()))?;
    BundleSnapshot::from_json(&contents)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

//! Measure command implementation
//!
//! Handles `next-bundle-report measure`, which prints the gzipped sizes of
//! the local build without comparing or uploading anything.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::bundle::{BundleSizeExtractor, PageBundleSize, RouteCategory};
use crate::config::ConfigLoader;
use crate::report::single_column_table;

/// Arguments of `next-bundle-report measure`
#[derive(Args, Debug, Clone)]
pub struct MeasureArgs {
    /// Directory of the Next.js app
    #[arg(short, long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Build output directory, relative to the working directory
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Sizes of one category, as printed by `--json`
#[derive(Debug, Serialize)]
pub struct MeasuredCategory {
    /// Report table name
    pub category: &'static str,
    /// Snapshot file the sizes are uploaded as
    pub file: &'static str,
    /// Page sizes
    pub sizes: Vec<PageBundleSize>,
}

/// Measure every category of the build
pub fn measure_build(args: &MeasureArgs) -> Result<Vec<MeasuredCategory>> {
    let mut config = ConfigLoader::load(&args.working_dir)?;
    if let Some(build_dir) = &args.build_dir {
        config.build_dir = build_dir.clone();
    }

    let mut extractor = BundleSizeExtractor::new(&config.build_dir(&args.working_dir));
    RouteCategory::ALL
        .into_iter()
        .map(|category| -> Result<MeasuredCategory> {
            Ok(MeasuredCategory {
                category: category.table_name(),
                file: category.snapshot_file(),
                sizes: extractor
                    .extract(category)
                    .with_context(|| format!("Failed to measure {}", category))?,
            })
        })
        .collect()
}

/// Print the sizes of every category as tables or JSON
pub fn cmd_measure(args: &MeasureArgs) -> Result<()> {
    let measured = measure_build(args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&measured).context("Failed to serialize sizes")?;
        println!("{}", json);
        return Ok(());
    }

    for category in &measured {
        match single_column_table(&category.sizes, category.category) {
            Some(table) => println!("{}\n", table),
            None => println!("{}: no entries\n", category.category),
        }
    }
    Ok(())
}

//! Command-line definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::cmd::{CompareArgs, MeasureArgs, RunArgs};

/// Next.js bundle size reports for pull requests
///
/// Measures the gzipped size of every page of a Next.js build, compares it
/// with the default branch and publishes the differences.
#[derive(Parser, Debug)]
#[command(name = "next-bundle-report", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    pub no_emoji: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure, compare with the default branch, upload and publish
    Run(RunArgs),

    /// Print the bundle sizes of the local build
    Measure(MeasureArgs),

    /// Compare two snapshot files
    Compare(CompareArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

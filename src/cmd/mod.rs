//! Command handlers for the next-bundle-report CLI
//!
//! Each submodule handles one subcommand and owns its clap arguments.

pub mod compare;
pub mod completions;
pub mod measure;
pub mod run;

// Re-export command functions for convenient access
pub use compare::{cmd_compare, CompareArgs};
pub use completions::cmd_completions;
pub use measure::{cmd_measure, MeasureArgs};
pub use run::{cmd_run, RunArgs};

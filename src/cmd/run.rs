//! Run command implementation
//!
//! Handles `next-bundle-report run`: the whole CI flow against the local
//! artifact store and the local report publisher.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::cicd::{CommentStrategy, LocalArtifactStore, LocalPublisher};
use crate::config::ConfigLoader;
use crate::fmt::{icon, CHART, CHECKMARK};
use crate::git::GitRepository;
use crate::infra::RealFileSystem;
use crate::pipeline::{
    detect_app_name, resolve_ref, resolve_sha, BundleReportRun, RunContext, RunOptions,
    RunSummary,
};

/// Arguments of `next-bundle-report run`
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory of the Next.js app
    #[arg(short, long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Root of the artifact store [default: <working-dir>/.bundle-report/artifacts]
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Where published reports are kept [default: <working-dir>/.bundle-report/reports]
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Pull request to comment on
    #[arg(long, value_name = "NUMBER")]
    pub pull_request: Option<u64>,

    /// Git ref of the run, e.g. refs/heads/main [default: the checked-out branch]
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Commit recorded in the uploaded snapshots [default: git HEAD]
    #[arg(long)]
    pub sha: Option<String>,

    /// Branch the reference sizes come from
    #[arg(long)]
    pub default_branch: Option<String>,

    /// When to post pull request comments
    #[arg(long, value_enum)]
    pub comment_strategy: Option<CommentStrategy>,

    /// Maintain a tracking issue from default-branch runs
    #[arg(long)]
    pub create_issue: bool,

    /// App name for titles and the artifact name
    #[arg(long)]
    pub app_name: Option<String>,
}

/// Measure, compare, upload and publish
///
/// # Examples
///
/// ```no_run
/// use next_bundle_report::cmd::run::{cmd_run, RunArgs};
///
/// let args = RunArgs {
///     working_dir: "apps/web".into(),
///     pull_request: Some(42),
///     ..RunArgs::default()
/// };
/// cmd_run(&args)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_run(args: &RunArgs) -> Result<RunSummary> {
    let working_dir = &args.working_dir;
    let config = ConfigLoader::load(working_dir)?;
    let git = GitRepository::new(working_dir);

    let app_name = detect_app_name(
        working_dir,
        args.app_name.as_deref().or(config.app_name.as_deref()),
        &RealFileSystem,
    );
    let options = RunOptions {
        app_name,
        default_branch: args
            .default_branch
            .clone()
            .unwrap_or_else(|| config.default_branch.clone()),
        comment_strategy: args.comment_strategy.unwrap_or(config.comment_strategy),
        create_issue: args.create_issue || config.create_issue,
        build_dir: config.build_dir(working_dir),
    };
    let context = RunContext {
        pull_request: args.pull_request,
        git_ref: resolve_ref(args.git_ref.as_deref(), &git),
        sha: resolve_sha(args.sha.as_deref(), &git),
    };

    let artifact_dir = args
        .artifact_dir
        .clone()
        .unwrap_or_else(|| config.artifact_dir(working_dir));
    let report_dir = args
        .report_dir
        .clone()
        .unwrap_or_else(|| config.report_dir(working_dir));
    let store = LocalArtifactStore::new(&artifact_dir);
    let publisher = LocalPublisher::new(&report_dir);

    println!(
        "{} {} [{}]",
        icon(CHART),
        style("Bundle sizes").bold(),
        style(&options.app_name).cyan()
    );
    let summary = BundleReportRun::new(options, &store, &publisher)
        .execute(&context)
        .context("Bundle size report failed")?;

    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    for table in summary.tables.iter().flatten() {
        println!("\n{}", table);
    }
    if summary.tables.is_empty() {
        println!("\n{}", crate::report::FALLBACK_TEXT);
    }

    match summary.publish {
        Some(outcome) => println!("\n{} Report {}", icon(CHECKMARK), outcome),
        None => println!("\n{}", style("No report published").dim()),
    }
}

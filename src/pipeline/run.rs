//! The fetch, measure, upload and publish sequence of one CI run

use super::context::RunContext;
use crate::bundle::{BundleSizeExtractor, PageBundleSize, RouteCategory};
use crate::cicd::snapshot::NO_SHA;
use crate::cicd::{
    artifact_name, publish_comment, publish_issue, ArtifactFile, ArtifactStore, BundleSnapshot,
    CommentStrategy, PublishOutcome, ReportPublisher,
};
use crate::diff::BundleComparison;
use crate::error::BundleReportError;
use crate::fmt::{icon, CHECKMARK, INBOX, OUTBOX, PACKAGE, SKIPPED, SPEECH};
use crate::infra::{FileSystem, RealFileSystem};
use crate::manifest::BUILD_MANIFEST;
use crate::report::{comparison_table, single_column_table, ReportTables};
use anyhow::{Context, Result};
use console::style;
use log::{debug, warn};
use std::path::PathBuf;

/// Settings of a run that come from configuration rather than CI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// App name used in titles and the artifact name
    pub app_name: String,
    /// Branch the references are fetched from
    pub default_branch: String,
    /// When pull request comments are posted
    pub comment_strategy: CommentStrategy,
    /// Maintain a tracking issue from default-branch runs
    pub create_issue: bool,
    /// Build output directory
    pub build_dir: PathBuf,
}

/// Reference and current sizes of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySizes {
    /// Which category
    pub category: RouteCategory,
    /// What was fetched for the default branch
    pub reference: BundleSnapshot,
    /// What this build measured, `None` when the category's manifest could not be loaded
    pub current: Option<Vec<PageBundleSize>>,
}

/// What a run measured and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Artifact the snapshots were uploaded as
    pub artifact: String,
    /// Branch the snapshots were uploaded under
    pub upload_branch: String,
    /// Per-category sizes in report order
    pub categories: Vec<CategorySizes>,
    /// Tables of the published (or publishable) report
    pub tables: ReportTables,
    /// Outcome of publishing, `None` when the run publishes nothing
    pub publish: Option<PublishOutcome>,
}

/// One CI run against an artifact store and a report publisher
pub struct BundleReportRun<'a, S, P, FS = RealFileSystem>
where
    S: ArtifactStore,
    P: ReportPublisher,
    FS: FileSystem + Clone,
{
    options: RunOptions,
    store: &'a S,
    publisher: &'a P,
    fs: FS,
}

impl<'a, S: ArtifactStore, P: ReportPublisher> BundleReportRun<'a, S, P, RealFileSystem> {
    /// Create a run reading the build from disk
    pub fn new(options: RunOptions, store: &'a S, publisher: &'a P) -> Self {
        Self::with_fs(options, store, publisher, RealFileSystem)
    }
}

impl<'a, S, P, FS> BundleReportRun<'a, S, P, FS>
where
    S: ArtifactStore,
    P: ReportPublisher,
    FS: FileSystem + Clone,
{
    /// Create a run with a custom filesystem for the build output
    pub fn with_fs(options: RunOptions, store: &'a S, publisher: &'a P, fs: FS) -> Self {
        Self {
            options,
            store,
            publisher,
            fs,
        }
    }

    /// Run every step in order; the first failure aborts the run
    pub fn execute(&self, context: &RunContext) -> Result<RunSummary> {
        let artifact = artifact_name(&self.options.app_name);

        let references = self.fetch_references(&artifact)?;
        let current = self.measure()?;
        let upload_branch = context.upload_branch();
        self.upload(&upload_branch, &artifact, &context.sha, &current)?;

        let categories: Vec<CategorySizes> = RouteCategory::ALL
            .into_iter()
            .zip(references)
            .zip(current)
            .map(|((category, reference), current)| CategorySizes {
                category,
                reference,
                current,
            })
            .collect();

        let (tables, publish) = self.publish(context, &categories)?;

        Ok(RunSummary {
            artifact,
            upload_branch,
            categories,
            tables,
            publish,
        })
    }

    fn fetch_references(&self, artifact: &str) -> Result<Vec<BundleSnapshot>> {
        println!(
            "{} Downloading bundle sizes from {}",
            icon(INBOX),
            style(&self.options.default_branch).cyan()
        );

        RouteCategory::ALL
            .into_iter()
            .map(|category| -> Result<BundleSnapshot> {
                let snapshot = self
                    .store
                    .fetch(
                        &self.options.default_branch,
                        artifact,
                        category.snapshot_file(),
                    )
                    .with_context(|| format!("Failed to fetch reference sizes for {}", category))?
                    .unwrap_or_else(|| {
                        debug!("No reference for {}, comparing against nothing", category);
                        BundleSnapshot::empty()
                    });
                debug!(
                    "{} reference: {} entries at {}",
                    category,
                    snapshot.data.len(),
                    snapshot.sha
                );
                Ok(snapshot)
            })
            .collect()
    }

    fn measure(&self) -> Result<Vec<Option<Vec<PageBundleSize>>>> {
        println!("{} Calculating local bundle sizes", icon(PACKAGE));

        // Fresh extractor, so nothing is cached from an earlier run
        let mut extractor = BundleSizeExtractor::with_fs(&self.options.build_dir, self.fs.clone());
        RouteCategory::ALL
            .into_iter()
            .map(|category| -> Result<Option<Vec<PageBundleSize>>> {
                match extractor.extract(category) {
                    Ok(sizes) => {
                        println!("   {} {}: {} entries", icon(CHECKMARK), category, sizes.len());
                        Ok(Some(sizes))
                    }
                    Err(e) if is_category_manifest_error(&e) => {
                        warn!("Skipping {}: {}", category, e);
                        println!("   {} {}: {}", icon(SKIPPED), category, style("skipped").yellow());
                        Ok(None)
                    }
                    Err(e) => Err(e).with_context(|| format!("Failed to measure {}", category)),
                }
            })
            .collect()
    }

    fn upload(
        &self,
        branch: &str,
        artifact: &str,
        sha: &str,
        current: &[Option<Vec<PageBundleSize>>],
    ) -> Result<()> {
        println!(
            "{} Uploading local bundle sizes as {}",
            icon(OUTBOX),
            style(artifact).cyan()
        );

        let files: Vec<ArtifactFile> = RouteCategory::ALL
            .into_iter()
            .zip(current)
            // An unmeasured category keeps whatever the store already holds
            .filter_map(|(category, sizes)| {
                let sizes = sizes.as_ref()?;
                Some(ArtifactFile::for_category(
                    category,
                    BundleSnapshot::new(sha, sizes.clone()),
                ))
            })
            .collect();
        self.store
            .upload(branch, artifact, &files)
            .context("Failed to upload bundle sizes")
    }

    fn publish(
        &self,
        context: &RunContext,
        categories: &[CategorySizes],
    ) -> Result<(ReportTables, Option<PublishOutcome>)> {
        let app_name = &self.options.app_name;

        if let Some(pull_request) = context.pull_request {
            let tables = comparison_tables(categories);
            let reference_sha = reference_sha(categories);
            println!(
                "{} Commenting on pull request #{}",
                icon(SPEECH),
                pull_request
            );
            let outcome = publish_comment(
                self.publisher,
                pull_request,
                app_name,
                reference_sha,
                &tables,
                self.options.comment_strategy,
            )?;
            return Ok((tables, Some(outcome)));
        }

        if context.is_default_branch(&self.options.default_branch) && self.options.create_issue {
            let tables = current_tables(categories);
            println!("{} Creating/updating bundle size issue", icon(SPEECH));
            let outcome = publish_issue(self.publisher, app_name, &tables)?;
            return Ok((tables, Some(outcome)));
        }

        debug!("No pull request and no issue to maintain, nothing to publish");
        Ok((comparison_tables(categories), None))
    }
}

/// Comparison table of every category
pub fn comparison_tables(categories: &[CategorySizes]) -> ReportTables {
    categories
        .iter()
        .map(|sizes| {
            let table = sizes.current.as_deref().and_then(|current| {
                let comparison = BundleComparison::new(&sizes.reference.data, current);
                comparison_table(&comparison, sizes.category.table_name())
            });
            (sizes.category, table)
        })
        .collect()
}

/// Current-size table of every category
pub fn current_tables(categories: &[CategorySizes]) -> ReportTables {
    categories
        .iter()
        .map(|sizes| {
            (
                sizes.category,
                sizes
                    .current
                    .as_deref()
                    .and_then(|current| single_column_table(current, sizes.category.table_name())),
            )
        })
        .collect()
}

/// A category-specific manifest failed to load.
///
/// `build-manifest.json` feeds every category, so its failure stays fatal.
fn is_category_manifest_error(error: &BundleReportError) -> bool {
    error
        .manifest_path()
        .is_some_and(|path| !path.ends_with(BUILD_MANIFEST))
}

/// The pages router reference names the compared commit
fn reference_sha(categories: &[CategorySizes]) -> &str {
    categories
        .iter()
        .find(|sizes| sizes.category == RouteCategory::Pages)
        .map_or(NO_SHA, |sizes| sizes.reference.sha.as_str())
}

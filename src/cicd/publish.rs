//! Publishing the report as a pull request comment or a tracking issue
//!
//! Both flows are an upsert keyed by a [`MatchKey`]: update the existing
//! report when one matches, otherwise create one. The mechanics of finding,
//! creating and updating live behind [`ReportPublisher`].

use crate::error::BundleReportError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::report::{comment_body, comment_title, issue_body, issue_title, ReportTables};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// When a pull request comment is posted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CommentStrategy {
    /// Always post, falling back to "no significant changes"
    #[default]
    Always,
    /// Only post a new comment when some table has rows
    SkipInsignificant,
}

/// Where a report is published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportTarget {
    /// Comment on a pull request
    Comment {
        /// Pull request number
        pull_request: u64,
    },
    /// Repository-level tracking issue
    Issue,
}

impl fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment { pull_request } => write!(f, "comment on #{}", pull_request),
            Self::Issue => f.write_str("issue"),
        }
    }
}

/// Lookup predicate for an earlier report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKey {
    /// A comment on `pull_request` whose body contains `text`
    BodyContains {
        /// Pull request number
        pull_request: u64,
        /// Literal text to look for
        text: String,
    },
    /// An issue with exactly this title
    TitleEquals(String),
}

impl MatchKey {
    /// The target a matching report must belong to
    pub fn target(&self) -> ReportTarget {
        match self {
            Self::BodyContains { pull_request, .. } => ReportTarget::Comment {
                pull_request: *pull_request,
            },
            Self::TitleEquals(_) => ReportTarget::Issue,
        }
    }

    /// Whether a report with this title and body is the one we're looking for
    pub fn matches(&self, title: &str, body: &str) -> bool {
        match self {
            Self::BodyContains { text, .. } => body.contains(text.as_str()),
            Self::TitleEquals(expected) => title == expected,
        }
    }
}

/// Remote store of published reports
pub trait ReportPublisher {
    /// Id of the first report matching `key`
    fn find(&self, key: &MatchKey) -> Result<Option<u64>>;

    /// Publish a new report and return its id
    fn create(&self, target: &ReportTarget, title: &str, body: &str) -> Result<u64>;

    /// Replace the body of an existing report
    fn update(&self, id: u64, body: &str) -> Result<()>;
}

/// What publishing did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum PublishOutcome {
    /// A new report was created
    Created(u64),
    /// An existing report was replaced
    Updated(u64),
    /// Nothing was published
    Skipped,
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(id) => write!(f, "created #{}", id),
            Self::Updated(id) => write!(f, "updated #{}", id),
            Self::Skipped => f.write_str("skipped"),
        }
    }
}

/// Upsert the comparison comment on a pull request.
///
/// The comment is found again by its title. With
/// [`CommentStrategy::SkipInsignificant`] a new comment is only created when
/// some table has rows; an existing one is always refreshed.
pub fn publish_comment<P: ReportPublisher>(
    publisher: &P,
    pull_request: u64,
    app_name: &str,
    reference_sha: &str,
    tables: &ReportTables,
    strategy: CommentStrategy,
) -> Result<PublishOutcome> {
    let target = ReportTarget::Comment { pull_request };
    let title = comment_title(app_name);
    let key = MatchKey::BodyContains {
        pull_request,
        text: title.clone(),
    };
    let body = comment_body(&title, reference_sha, tables);

    upsert(publisher, &target, &key, &title, &body, |existing| {
        existing.is_none() && tables.is_empty() && strategy == CommentStrategy::SkipInsignificant
    })
}

/// Upsert the tracking issue listing the current sizes
pub fn publish_issue<P: ReportPublisher>(
    publisher: &P,
    app_name: &str,
    tables: &ReportTables,
) -> Result<PublishOutcome> {
    let title = issue_title(app_name);
    let key = MatchKey::TitleEquals(title.clone());
    let body = issue_body(tables);

    upsert(publisher, &ReportTarget::Issue, &key, &title, &body, |_| false)
}

fn upsert<P, F>(
    publisher: &P,
    target: &ReportTarget,
    key: &MatchKey,
    title: &str,
    body: &str,
    skip: F,
) -> Result<PublishOutcome>
where
    P: ReportPublisher,
    F: FnOnce(Option<u64>) -> bool,
{
    let publish_error = |err: anyhow::Error| BundleReportError::Publish {
        target: target.to_string(),
        message: format!("{:#}", err),
    };

    let existing = publisher.find(key).map_err(publish_error)?;
    if skip(existing) {
        info!("Skipping {} [{}]: no significant changes", target, title);
        return Ok(PublishOutcome::Skipped);
    }

    match existing {
        Some(id) => {
            info!("Updating {} ({})", target, id);
            publisher.update(id, body).map_err(publish_error)?;
            Ok(PublishOutcome::Updated(id))
        }
        None => {
            info!("Creating {}", target);
            let id = publisher.create(target, title, body).map_err(publish_error)?;
            Ok(PublishOutcome::Created(id))
        }
    }
}

/// A report kept by [`LocalPublisher`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedReport {
    /// Sequential id, starting at 1
    pub id: u64,
    /// Where it was published
    pub target: ReportTarget,
    /// Title (the comment heading for comments)
    pub title: String,
    /// Markdown body
    pub body: String,
}

/// Publisher keeping every report in `<dir>/reports.json`
#[derive(Debug, Clone)]
pub struct LocalPublisher<FS: FileSystem = RealFileSystem> {
    dir: PathBuf,
    fs: FS,
}

impl LocalPublisher<RealFileSystem> {
    /// Create a publisher writing below `dir`
    pub fn new(dir: &Path) -> Self {
        Self::with_fs(dir, RealFileSystem)
    }
}

impl<FS: FileSystem> LocalPublisher<FS> {
    const REPORTS_FILE: &'static str = "reports.json";

    /// Create a publisher with a custom filesystem implementation
    pub fn with_fs(dir: &Path, fs: FS) -> Self {
        Self {
            dir: dir.to_path_buf(),
            fs,
        }
    }

    /// Path of the reports file
    pub fn reports_path(&self) -> PathBuf {
        self.dir.join(Self::REPORTS_FILE)
    }

    /// Every report published so far, oldest first
    pub fn reports(&self) -> Result<Vec<PublishedReport>> {
        let path = self.reports_path();
        let contents = match self.fs.read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to read published reports"),
        };
        serde_json::from_str(&contents).context("Failed to parse published reports")
    }

    fn save(&self, reports: &[PublishedReport]) -> Result<()> {
        self.fs
            .create_dir_all(&self.dir)
            .context("Failed to create report directory")?;
        let contents =
            serde_json::to_string_pretty(reports).context("Failed to serialize reports")?;
        self.fs
            .write(&self.reports_path(), contents)
            .context("Failed to write published reports")
    }
}

impl<FS: FileSystem> ReportPublisher for LocalPublisher<FS> {
    fn find(&self, key: &MatchKey) -> Result<Option<u64>> {
        let target = key.target();
        Ok(self
            .reports()?
            .into_iter()
            .find(|report| report.target == target && key.matches(&report.title, &report.body))
            .map(|report| report.id))
    }

    fn create(&self, target: &ReportTarget, title: &str, body: &str) -> Result<u64> {
        let mut reports = self.reports()?;
        let id = reports.iter().map(|report| report.id).max().unwrap_or(0) + 1;
        reports.push(PublishedReport {
            id,
            target: *target,
            title: title.to_string(),
            body: body.to_string(),
        });
        self.save(&reports)?;
        Ok(id)
    }

    fn update(&self, id: u64, body: &str) -> Result<()> {
        let mut reports = self.reports()?;
        let report = reports
            .iter_mut()
            .find(|report| report.id == id)
            .with_context(|| format!("No published report with id {}", id))?;
        report.body = body.to_string();
        self.save(&reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::RouteCategory;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn tables_with_pages() -> ReportTables {
        let mut tables = ReportTables::default();
        tables.set(RouteCategory::Pages, Some("| Route (Pages) |".to_string()));
        tables
    }

    #[test]
    fn test_match_key_predicates() {
        let comment = MatchKey::BodyContains {
            pull_request: 7,
            text: "### Bundle sizes [web]".to_string(),
        };
        assert!(comment.matches("", "### Bundle sizes [web]\n\n<details>"));
        assert!(!comment.matches("### Bundle sizes [web]", "other body"));
        assert_eq!(comment.target(), ReportTarget::Comment { pull_request: 7 });

        let issue = MatchKey::TitleEquals("Bundle sizes [web]".to_string());
        assert!(issue.matches("Bundle sizes [web]", ""));
        assert!(!issue.matches("Bundle sizes [web] (old)", ""));
    }

    #[test]
    fn test_publish_comment_creates_then_updates() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path());
        let tables = tables_with_pages();

        let first =
            publish_comment(&publisher, 3, "web", "abc", &tables, CommentStrategy::Always).unwrap();
        let second =
            publish_comment(&publisher, 3, "web", "def", &tables, CommentStrategy::Always).unwrap();

        assert_eq!(first, PublishOutcome::Created(1));
        assert_eq!(second, PublishOutcome::Updated(1));

        let reports = publisher.reports().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].body.contains("Compared against def"));
    }

    #[test]
    fn test_comments_are_scoped_to_pull_request_and_app() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path());
        let tables = tables_with_pages();

        publish_comment(&publisher, 1, "web", "a", &tables, CommentStrategy::Always).unwrap();
        let other_pr =
            publish_comment(&publisher, 2, "web", "a", &tables, CommentStrategy::Always).unwrap();
        let other_app =
            publish_comment(&publisher, 1, "docs", "a", &tables, CommentStrategy::Always).unwrap();

        assert_eq!(other_pr, PublishOutcome::Created(2));
        assert_eq!(other_app, PublishOutcome::Created(3));
    }

    #[test]
    fn test_skip_insignificant_skips_only_new_comments() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path());
        let empty = ReportTables::default();

        let skipped = publish_comment(
            &publisher,
            5,
            "web",
            "a",
            &empty,
            CommentStrategy::SkipInsignificant,
        )
        .unwrap();
        assert_eq!(skipped, PublishOutcome::Skipped);
        assert!(publisher.reports().unwrap().is_empty());

        publish_comment(
            &publisher,
            5,
            "web",
            "a",
            &tables_with_pages(),
            CommentStrategy::Always,
        )
        .unwrap();
        let refreshed = publish_comment(
            &publisher,
            5,
            "web",
            "b",
            &empty,
            CommentStrategy::SkipInsignificant,
        )
        .unwrap();

        assert_eq!(refreshed, PublishOutcome::Updated(1));
        assert!(publisher.reports().unwrap()[0]
            .body
            .ends_with("No significant changes found"));
    }

    #[test]
    fn test_always_posts_fallback_comment() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path());

        let outcome = publish_comment(
            &publisher,
            9,
            "web",
            "none",
            &ReportTables::default(),
            CommentStrategy::Always,
        )
        .unwrap();

        assert_eq!(outcome, PublishOutcome::Created(1));
    }

    #[test]
    fn test_publish_issue_upserts_by_title() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path());

        let created = publish_issue(&publisher, "web", &tables_with_pages()).unwrap();
        let updated = publish_issue(&publisher, "web", &ReportTables::default()).unwrap();

        assert_eq!(created, PublishOutcome::Created(1));
        assert_eq!(updated, PublishOutcome::Updated(1));
        let report = &publisher.reports().unwrap()[0];
        assert_eq!(report.title, "Bundle sizes [web]");
        assert_eq!(report.target, ReportTarget::Issue);
        assert_eq!(report.body, "");
    }

    struct FailingPublisher {
        calls: RefCell<Vec<&'static str>>,
    }

    impl ReportPublisher for FailingPublisher {
        fn find(&self, _key: &MatchKey) -> Result<Option<u64>> {
            self.calls.borrow_mut().push("find");
            Ok(None)
        }

        fn create(&self, _target: &ReportTarget, _title: &str, _body: &str) -> Result<u64> {
            self.calls.borrow_mut().push("create");
            anyhow::bail!("HTTP 403")
        }

        fn update(&self, _id: u64, _body: &str) -> Result<()> {
            unreachable!("nothing to update")
        }
    }

    #[test]
    fn test_publisher_failure_is_a_publish_error() {
        let publisher = FailingPublisher {
            calls: RefCell::new(Vec::new()),
        };

        let err = publish_issue(&publisher, "web", &tables_with_pages()).unwrap_err();

        assert_eq!(*publisher.calls.borrow(), ["find", "create"]);
        match err.downcast_ref::<BundleReportError>() {
            Some(BundleReportError::Publish { target, message }) => {
                assert_eq!(target, "issue");
                assert_eq!(message, "HTTP 403");
            }
            other => panic!("expected Publish error, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_strategy_parses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: CommentStrategy,
        }
        let parsed: Wrapper = serde_json::from_str(r#"{"strategy":"skip-insignificant"}"#).unwrap();
        assert_eq!(parsed.strategy, CommentStrategy::SkipInsignificant);
    }
}

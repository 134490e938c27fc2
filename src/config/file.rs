//! Configuration file data structures

use crate::cicd::CommentStrategy;
use crate::manifest::DEFAULT_BUILD_DIR;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file name, looked up in the app's working directory
pub const CONFIG_FILE_NAME: &str = ".bundle-report.toml";

/// Directory for local artifacts and reports when none is configured
pub const DEFAULT_STATE_DIR: &str = ".bundle-report";

/// next-bundle-report configuration file structure
///
/// ```toml
/// app-name = "web"
/// default-branch = "main"
/// comment-strategy = "skip-insignificant"
/// create-issue = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Name used in report titles and the artifact name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Branch whose snapshots are the reference
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// When pull request comments are posted
    #[serde(default)]
    pub comment_strategy: CommentStrategy,

    /// Maintain a tracking issue from default-branch runs
    #[serde(default)]
    pub create_issue: bool,

    /// Root of the local artifact store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<PathBuf>,

    /// Directory of the local report publisher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,

    /// Build output directory, relative to the working directory
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUILD_DIR)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: None,
            default_branch: default_branch(),
            comment_strategy: CommentStrategy::default(),
            create_issue: false,
            artifact_dir: None,
            report_dir: None,
            build_dir: default_build_dir(),
        }
    }
}

impl ConfigFile {
    /// Artifact store root, resolved against `working_dir`
    pub fn artifact_dir(&self, working_dir: &Path) -> PathBuf {
        match &self.artifact_dir {
            Some(dir) => working_dir.join(dir),
            None => working_dir.join(DEFAULT_STATE_DIR).join("artifacts"),
        }
    }

    /// Report directory, resolved against `working_dir`
    pub fn report_dir(&self, working_dir: &Path) -> PathBuf {
        match &self.report_dir {
            Some(dir) => working_dir.join(dir),
            None => working_dir.join(DEFAULT_STATE_DIR).join("reports"),
        }
    }

    /// Build output directory, resolved against `working_dir`
    pub fn build_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.build_dir)
    }
}

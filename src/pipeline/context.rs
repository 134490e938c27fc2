//! Where and for what a run happens

use crate::git::GitRepository;
use crate::infra::{CommandExecutor, FileSystem};
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Commit recorded when neither a flag nor git can supply one
pub const UNKNOWN_SHA: &str = "unknown";

/// App name when nothing better is known
pub const FALLBACK_APP_NAME: &str = "app";

const HEADS_PREFIX: &str = "refs/heads/";

/// CI facts about the current run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Pull request the run belongs to
    pub pull_request: Option<u64>,
    /// Full git ref, e.g. `refs/heads/main`
    pub git_ref: Option<String>,
    /// Commit the build was made from
    pub sha: String,
}

impl RunContext {
    /// True when the run is on `refs/heads/<default_branch>`
    pub fn is_default_branch(&self, default_branch: &str) -> bool {
        self.git_ref
            .as_deref()
            .and_then(|git_ref| git_ref.strip_prefix(HEADS_PREFIX))
            .is_some_and(|branch| branch == default_branch)
    }

    /// Branch the run's snapshots are uploaded under.
    ///
    /// `refs/heads/x` uploads as `x` and any other ref drops its `refs/`
    /// prefix. Without a ref a pull request run uploads as `pull/<n>`,
    /// anything else as `HEAD`.
    pub fn upload_branch(&self) -> String {
        match self.git_ref.as_deref() {
            Some(git_ref) => git_ref
                .strip_prefix(HEADS_PREFIX)
                .or_else(|| git_ref.strip_prefix("refs/"))
                .unwrap_or(git_ref)
                .to_string(),
            None => match self.pull_request {
                Some(number) => format!("pull/{}", number),
                None => "HEAD".to_string(),
            },
        }
    }
}

/// The sha to record: `explicit` if given, else git's HEAD, else [`UNKNOWN_SHA`]
pub fn resolve_sha<CE: CommandExecutor>(explicit: Option<&str>, git: &GitRepository<CE>) -> String {
    if let Some(sha) = explicit {
        return sha.to_string();
    }
    match git.head_sha() {
        Ok(Some(sha)) => sha,
        Ok(None) => {
            debug!("Not a git checkout, recording sha as {}", UNKNOWN_SHA);
            UNKNOWN_SHA.to_string()
        }
        Err(e) => {
            warn!("Could not read HEAD: {}", e);
            UNKNOWN_SHA.to_string()
        }
    }
}

/// The ref to record: `explicit` if given, else the checked-out branch
pub fn resolve_ref<CE: CommandExecutor>(
    explicit: Option<&str>,
    git: &GitRepository<CE>,
) -> Option<String> {
    if let Some(git_ref) = explicit {
        return Some(git_ref.to_string());
    }
    git.current_ref().unwrap_or_else(|e| {
        warn!("Could not read the current branch: {}", e);
        None
    })
}

#[derive(Deserialize)]
struct PackageJson {
    name: Option<String>,
}

/// Name of the app in `working_dir`.
///
/// Tried in order: `configured`, the `name` of `package.json`, the
/// directory name, [`FALLBACK_APP_NAME`].
pub fn detect_app_name<FS: FileSystem>(
    working_dir: &Path,
    configured: Option<&str>,
    fs: &FS,
) -> String {
    if let Some(name) = configured.filter(|name| !name.is_empty()) {
        return name.to_string();
    }

    let package_json = working_dir.join("package.json");
    match fs.read_to_string(&package_json) {
        Ok(contents) => match serde_json::from_str::<PackageJson>(&contents) {
            Ok(PackageJson { name: Some(name) }) if !name.is_empty() => return name,
            Ok(_) => debug!("{} has no name", package_json.display()),
            Err(e) => warn!("Ignoring unparsable {}: {}", package_json.display(), e),
        },
        Err(e) => debug!("No {}: {}", package_json.display(), e),
    }

    working_dir
        .canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(working_dir)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_APP_NAME)
        .to_string()
}

//! Git metadata for snapshot tagging and ref detection
//!
//! Used when the run context does not supply a commit sha or ref explicitly
//! (local runs outside of a CI workflow).

use crate::infra::{CommandExecutor, RealCommandExecutor};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Git operation errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command failed with an error message
    #[error("Git command failed: {0}")]
    CommandFailed(String),

    /// Git output contained invalid UTF-8
    #[error("Invalid UTF-8 in git output")]
    InvalidUtf8,

    /// IO error occurred while executing git command
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Git repository interface with dependency injection for testability
pub struct GitRepository<CE: CommandExecutor = RealCommandExecutor> {
    cmd_executor: CE,
    work_dir: PathBuf,
}

impl GitRepository<RealCommandExecutor> {
    /// Open the repository containing `work_dir` with real command execution
    pub fn new(work_dir: &Path) -> Self {
        Self::with_executor(work_dir, RealCommandExecutor)
    }
}

impl<CE: CommandExecutor> GitRepository<CE> {
    /// Create a GitRepository with a custom command executor (for testing)
    pub fn with_executor(work_dir: &Path, cmd_executor: CE) -> Self {
        Self {
            cmd_executor,
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Full sha of `HEAD`.
    ///
    /// `Ok(None)` when git is missing or `work_dir` is not inside a repository.
    pub fn head_sha(&self) -> Result<Option<String>, GitError> {
        self.rev_parse(&["rev-parse", "HEAD"])
    }

    /// Fully qualified ref of the checked out branch, e.g. `refs/heads/main`.
    ///
    /// `Ok(None)` on a detached HEAD or outside a repository.
    pub fn current_ref(&self) -> Result<Option<String>, GitError> {
        match self.rev_parse(&["symbolic-ref", "-q", "HEAD"]) {
            Err(GitError::CommandFailed(_)) => Ok(None),
            other => other,
        }
    }

    fn rev_parse(&self, args: &[&str]) -> Result<Option<String>, GitError> {
        let output = match self.cmd_executor.execute(
            |cmd| cmd.arg("-C").arg(&self.work_dir).args(args),
            "git",
        ) {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(GitError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not a git repository") {
                return Ok(None);
            }
            return Err(GitError::CommandFailed(stderr.trim().to_string()));
        }

        let value = String::from_utf8(output.stdout)
            .map_err(|_| GitError::InvalidUtf8)?
            .trim()
            .to_string();

        Ok((!value.is_empty()).then_some(value))
    }
}

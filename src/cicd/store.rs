//! Artifact storage for measurement snapshots
//!
//! Each run downloads the reference snapshots of the default branch and
//! uploads its own. [`ArtifactStore`] is the seam to whatever keeps them;
//! [`LocalArtifactStore`] keeps them in a directory tree:
//!
//! ```text
//! <root>/<branch>/<artifact>/<file>
//! ```

use super::snapshot::{ArtifactFile, BundleSnapshot};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};

/// Where snapshots are kept between runs
pub trait ArtifactStore {
    /// Latest snapshot `file` of `artifact` uploaded from `branch`, if any
    fn fetch(&self, branch: &str, artifact: &str, file: &str) -> Result<Option<BundleSnapshot>>;

    /// Upload `files` as `artifact` for `branch`, replacing earlier uploads
    fn upload(&self, branch: &str, artifact: &str, files: &[ArtifactFile]) -> Result<()>;
}

/// Directory-backed artifact store
#[derive(Debug, Clone)]
pub struct LocalArtifactStore<FS: FileSystem = RealFileSystem> {
    root: PathBuf,
    fs: FS,
}

impl LocalArtifactStore<RealFileSystem> {
    /// Create a store rooted at `root`
    pub fn new(root: &Path) -> Self {
        Self::with_fs(root, RealFileSystem)
    }
}

impl<FS: FileSystem> LocalArtifactStore<FS> {
    /// Create a store with a custom filesystem implementation
    pub fn with_fs(root: &Path, fs: FS) -> Self {
        Self {
            root: root.to_path_buf(),
            fs,
        }
    }

    /// Directory holding one artifact of one branch
    pub fn artifact_dir(&self, branch: &str, artifact: &str) -> PathBuf {
        self.root.join(branch).join(artifact)
    }
}

impl<FS: FileSystem> ArtifactStore for LocalArtifactStore<FS> {
    fn fetch(&self, branch: &str, artifact: &str, file: &str) -> Result<Option<BundleSnapshot>> {
        let path = self.artifact_dir(branch, artifact).join(file);
        let contents = match self.fs.read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No artifact file at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let snapshot = BundleSnapshot::from_json(&contents)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(Some(snapshot))
    }

    fn upload(&self, branch: &str, artifact: &str, files: &[ArtifactFile]) -> Result<()> {
        let dir = self.artifact_dir(branch, artifact);
        self.fs
            .create_dir_all(&dir)
            .with_context(|| format!("Failed to create artifact directory {}", dir.display()))?;

        for file in files {
            let path = dir.join(&file.name);
            let contents = serde_json::to_string_pretty(&file.snapshot)
                .context("Failed to serialize snapshot")?;
            self.fs
                .write(&path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        info!(
            "Uploaded {} file(s) to {}",
            files.len(),
            dir.display()
        );
        Ok(())
    }
}

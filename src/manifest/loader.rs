//! Reading and normalizing build manifests from the build output directory

use super::types::{AppPathRoutes, BuildManifest, LoadableManifest};
use super::{
    APP_BUILD_MANIFEST, APP_PATH_ROUTES_MANIFEST, BUILD_MANIFEST, DEPENDENCY_SEGMENT,
    LOADABLE_MANIFEST,
};
use crate::error::BundleReportError;
use crate::infra::{FileSystem, RealFileSystem};
use indexmap::IndexMap;
use log::debug;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Loads the manifests of one build output directory (e.g. `<app>/.next`)
#[derive(Debug, Clone)]
pub struct ManifestLoader<FS: FileSystem = RealFileSystem> {
    build_dir: PathBuf,
    fs: FS,
}

impl ManifestLoader<RealFileSystem> {
    /// Create a loader reading from the real filesystem
    pub fn new(build_dir: &Path) -> Self {
        Self::with_fs(build_dir, RealFileSystem)
    }
}

impl<FS: FileSystem> ManifestLoader<FS> {
    /// Create a loader with a custom filesystem implementation
    pub fn with_fs(build_dir: &Path, fs: FS) -> Self {
        Self {
            build_dir: build_dir.to_path_buf(),
            fs,
        }
    }

    /// Directory the manifests (and the artifacts they reference) live in
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// `build-manifest.json`; required
    pub fn build_manifest(&self) -> Result<BuildManifest, BundleReportError> {
        self.read_required(BUILD_MANIFEST)
    }

    /// `app-build-manifest.json`; empty when absent or unreadable
    pub fn app_build_manifest(&self) -> BuildManifest {
        self.read_optional(APP_BUILD_MANIFEST)
    }

    /// `app-path-routes-manifest.json`; empty when absent or unreadable
    pub fn app_path_routes(&self) -> AppPathRoutes {
        self.read_optional(APP_PATH_ROUTES_MANIFEST)
    }

    /// `react-loadable-manifest.json` normalized into a page manifest.
    ///
    /// Entries from dependency directories are dropped, and so is any file
    /// already listed in `shared_files` (the `_app` chunks).
    pub fn loadable_manifest(
        &self,
        shared_files: &[String],
    ) -> Result<BuildManifest, BundleReportError> {
        let raw: LoadableManifest = self.read_required(LOADABLE_MANIFEST)?;
        Ok(normalize_loadable(raw, shared_files))
    }

    fn read_required<T: DeserializeOwned>(&self, name: &str) -> Result<T, BundleReportError> {
        let path = self.build_dir.join(name);
        let contents = self
            .fs
            .read_to_string(&path)
            .map_err(|source| BundleReportError::MissingManifest {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&contents)
            .map_err(|source| BundleReportError::InvalidManifest { path, source })
    }

    // Older Next.js versions do not emit the app router manifests at all
    fn read_optional<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.read_required(name) {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("Treating {} as empty: {}", name, e);
                T::default()
            }
        }
    }
}

fn normalize_loadable(raw: LoadableManifest, shared_files: &[String]) -> BuildManifest {
    let pages: IndexMap<String, Vec<String>> = raw
        .into_iter()
        .filter(|(key, _)| !key.contains(DEPENDENCY_SEGMENT))
        .map(|(key, chunks)| {
            let files = chunks
                .files()
                .into_iter()
                .filter(|file| !shared_files.contains(file))
                .collect();
            (key, files)
        })
        .collect();

    BuildManifest {
        pages,
        root_main_files: None,
    }
}

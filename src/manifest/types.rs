//! Manifest document shapes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Page (or chunk) key to the build artifacts it loads, relative to the build dir.
///
/// Used both for `build-manifest.json` and `app-build-manifest.json`; only the
/// former carries `rootMainFiles`. Unknown fields (`polyfillFiles`,
/// `lowPriorityFiles`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    /// Page key to artifact file list
    #[serde(default)]
    pub pages: IndexMap<String, Vec<String>>,

    /// Files loaded by every app-router page (Next.js 13+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_main_files: Option<Vec<String>>,
}

impl BuildManifest {
    /// Files of a single page, empty when the page is unknown
    pub fn files_for(&self, page: &str) -> &[String] {
        self.pages.get(page).map(Vec::as_slice).unwrap_or_default()
    }
}

/// `app-path-routes-manifest.json`: file-system route key to public route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppPathRoutes(pub IndexMap<String, String>);

impl AppPathRoutes {
    /// Entries pointing at `page` or `layout` files, in document order
    pub fn page_and_layout_routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(fs_path, _)| fs_path.ends_with("/page") || fs_path.ends_with("/layout"))
            .map(|(fs_path, route)| (fs_path.as_str(), route.as_str()))
    }
}

/// Chunk id as emitted by webpack: numeric in production builds, a string in dev.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    /// Numeric module id
    Number(i64),
    /// Named module id
    Name(String),
}

/// One `{id, file}` record of the Next.js 10 loadable manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadableChunk {
    /// Module id
    #[serde(default)]
    pub id: Option<ChunkId>,
    /// Artifact path
    pub file: String,
}

/// Value of a `react-loadable-manifest.json` entry.
///
/// Next.js 10 writes a list of `{id, file}` records, Next.js 12+ a single
/// `{id, files}` record. Both collapse to a file list through [`LoadableChunks::files`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadableChunks {
    /// Next.js 10 shape
    ByIdList(Vec<LoadableChunk>),
    /// Next.js 12+ shape
    IdWithFiles {
        /// Module id
        #[serde(default)]
        id: Option<ChunkId>,
        /// Artifact paths
        files: Vec<String>,
    },
}

impl LoadableChunks {
    /// Flat file list without duplicates, first occurrence wins
    pub fn files(&self) -> Vec<String> {
        let all: Vec<&String> = match self {
            Self::ByIdList(chunks) => chunks.iter().map(|chunk| &chunk.file).collect(),
            Self::IdWithFiles { files, .. } => files.iter().collect(),
        };

        let mut unique: Vec<String> = Vec::with_capacity(all.len());
        for file in all {
            if !unique.contains(file) {
                unique.push(file.clone());
            }
        }
        unique
    }
}

/// Raw `react-loadable-manifest.json`
pub type LoadableManifest = IndexMap<String, LoadableChunks>;

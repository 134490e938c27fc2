//! Measurement snapshots exchanged through the artifact store

use crate::bundle::{PageBundleSize, RouteCategory};
use serde::{Deserialize, Serialize};

/// Prefix of every artifact name; the app name completes it
pub const ARTIFACT_NAME_PREFIX: &str = "next-bundle-analyzer__";

/// Commit recorded for a reference that does not exist yet
pub const NO_SHA: &str = "none";

/// Name of the artifact holding an app's snapshots
pub fn artifact_name(app_name: &str) -> String {
    format!("{}{}", ARTIFACT_NAME_PREFIX, app_name)
}

/// Sizes of one category measured at one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSnapshot {
    /// Commit the sizes were measured at
    pub sha: String,
    /// Page sizes in extraction order
    pub data: Vec<PageBundleSize>,
}

impl BundleSnapshot {
    /// Create a snapshot
    pub fn new(sha: impl Into<String>, data: Vec<PageBundleSize>) -> Self {
        Self {
            sha: sha.into(),
            data,
        }
    }

    /// Stand-in for a reference that was never uploaded
    pub fn empty() -> Self {
        Self::new(NO_SHA, Vec::new())
    }

    /// Parse a snapshot document.
    ///
    /// A bare `[{page, size}]` array is accepted too and gets the
    /// placeholder sha.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(match serde_json::from_str(json)? {
            SnapshotDocument::Snapshot(snapshot) => snapshot,
            SnapshotDocument::Sizes(data) => Self::new(NO_SHA, data),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Snapshot(BundleSnapshot),
    Sizes(Vec<PageBundleSize>),
}

impl Default for BundleSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// One named file of an uploaded artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// File name inside the artifact
    pub name: String,
    /// Contents, stored as pretty JSON
    pub snapshot: BundleSnapshot,
}

impl ArtifactFile {
    /// The file holding `category`'s snapshot
    pub fn for_category(category: RouteCategory, snapshot: BundleSnapshot) -> Self {
        Self {
            name: category.snapshot_file().to_string(),
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_has_prefix() {
        assert_eq!(artifact_name("web"), "next-bundle-analyzer__web");
    }

    #[test]
    fn test_empty_snapshot_has_placeholder_sha() {
        let snapshot = BundleSnapshot::empty();
        assert_eq!(snapshot.sha, "none");
        assert!(snapshot.data.is_empty());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = BundleSnapshot::new("abc", vec![PageBundleSize::new("/", 10)]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "sha": "abc", "data": [{ "page": "/", "size": 10 }] })
        );
    }

    #[test]
    fn test_from_json_accepts_bare_size_list() {
        let snapshot = BundleSnapshot::from_json(r#"[{"page":"/a","size":500}]"#).unwrap();
        assert_eq!(snapshot.sha, "none");
        assert_eq!(snapshot.data, vec![PageBundleSize::new("/a", 500)]);

        let full = BundleSnapshot::from_json(r#"{"sha":"abc","data":[]}"#).unwrap();
        assert_eq!(full, BundleSnapshot::new("abc", Vec::new()));

        assert!(BundleSnapshot::from_json(r#"{"page":"/a"}"#).is_err());
    }

    #[test]
    fn test_artifact_file_uses_category_file_name() {
        let file = ArtifactFile::for_category(RouteCategory::Dynamic, BundleSnapshot::empty());
        assert_eq!(file.name, "dynamic-bundle-sizes.json");
    }
}

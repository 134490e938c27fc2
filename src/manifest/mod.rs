//! Next.js build manifests
//!
//! The build output directory carries several JSON manifests whose shapes have
//! drifted across framework versions. This module reads them and hands out one
//! canonical [`BuildManifest`] shape (page key to artifact files) so that
//! measurement never has to know which version produced the build.

pub mod loader;
pub mod types;

pub use loader::ManifestLoader;
pub use types::{AppPathRoutes, BuildManifest, ChunkId, LoadableChunk, LoadableChunks};

/// Default build output directory name, relative to the app's working directory
pub const DEFAULT_BUILD_DIR: &str = ".next";

/// Pages router manifest (required)
pub const BUILD_MANIFEST: &str = "build-manifest.json";

/// App router build manifest (optional, Next.js 13+)
pub const APP_BUILD_MANIFEST: &str = "app-build-manifest.json";

/// App router route mapping (optional, Next.js 13+)
pub const APP_PATH_ROUTES_MANIFEST: &str = "app-path-routes-manifest.json";

/// Dynamic import manifest (required for the dynamic category)
pub const LOADABLE_MANIFEST: &str = "react-loadable-manifest.json";

/// Loadable entries containing this segment come from third-party packages
pub const DEPENDENCY_SEGMENT: &str = "/node_modules/";

/// Page key of the custom app, whose files are shared by every page
pub const APP_PAGE: &str = "/_app";

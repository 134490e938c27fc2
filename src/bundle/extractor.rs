//! Per-category page size extraction

use super::measurer::SizeMeasurer;
use super::{PageBundleSize, RouteCategory, SHARED_BUNDLE_NAME};
use crate::error::BundleReportError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::manifest::{AppPathRoutes, BuildManifest, ManifestLoader, APP_PAGE};
use log::debug;
use std::path::Path;

const SCRIPT_EXTENSION: &str = ".js";

/// Produces `(page, gzipped size)` lists for each route category of one build
pub struct BundleSizeExtractor<FS: FileSystem = RealFileSystem> {
    loader: ManifestLoader<FS>,
    measurer: SizeMeasurer<FS>,
}

impl BundleSizeExtractor<RealFileSystem> {
    /// Create an extractor for the build output in `build_dir`
    pub fn new(build_dir: &Path) -> Self {
        Self::with_fs(build_dir, RealFileSystem)
    }
}

impl<FS: FileSystem + Clone> BundleSizeExtractor<FS> {
    /// Create an extractor with a custom filesystem implementation
    pub fn with_fs(build_dir: &Path, fs: FS) -> Self {
        Self::from_parts(
            ManifestLoader::with_fs(build_dir, fs.clone()),
            SizeMeasurer::with_fs(build_dir, fs),
        )
    }
}

impl<FS: FileSystem> BundleSizeExtractor<FS> {
    /// Assemble an extractor from an existing loader and measurer
    pub fn from_parts(loader: ManifestLoader<FS>, measurer: SizeMeasurer<FS>) -> Self {
        Self { loader, measurer }
    }

    /// Sizes for one category
    pub fn extract(
        &mut self,
        category: RouteCategory,
    ) -> Result<Vec<PageBundleSize>, BundleReportError> {
        let sizes = match category {
            RouteCategory::App => self.static_app_pages(),
            RouteCategory::Pages => self.static_pages(),
            RouteCategory::Dynamic => self.dynamic_chunks(),
        }?;
        debug!("{}: {} entries", category, sizes.len());
        Ok(sizes)
    }

    /// Pages router: every page of `build-manifest.json`
    pub fn static_pages(&mut self) -> Result<Vec<PageBundleSize>, BundleReportError> {
        let manifest = self.loader.build_manifest()?;
        page_sizes(&manifest, &mut self.measurer)
    }

    /// App router: every page and layout route, followed by the shared bundle row.
    ///
    /// Empty when the build declares no `rootMainFiles` (no app directory, or a
    /// Next.js version predating the app router).
    pub fn static_app_pages(&mut self) -> Result<Vec<PageBundleSize>, BundleReportError> {
        let build_manifest = self.loader.build_manifest()?;
        let app_build_manifest = self.loader.app_build_manifest();
        let routes = self.loader.app_path_routes();
        app_page_sizes(
            &build_manifest,
            &app_build_manifest,
            &routes,
            &mut self.measurer,
        )
    }

    /// Dynamic imports: every entry of the loadable manifest, minus `_app` files
    pub fn dynamic_chunks(&mut self) -> Result<Vec<PageBundleSize>, BundleReportError> {
        let build_manifest = self.loader.build_manifest()?;
        let manifest = self
            .loader
            .loadable_manifest(build_manifest.files_for(APP_PAGE))?;
        page_sizes(&manifest, &mut self.measurer)
    }

    /// The measurer, with its cache of this run's measurements
    pub fn measurer(&self) -> &SizeMeasurer<FS> {
        &self.measurer
    }
}

/// Map every page of `manifest` to the summed size of its files
pub fn page_sizes<FS: FileSystem>(
    manifest: &BuildManifest,
    measurer: &mut SizeMeasurer<FS>,
) -> Result<Vec<PageBundleSize>, BundleReportError> {
    manifest
        .pages
        .iter()
        .map(|(page, files)| Ok(PageBundleSize::new(page.clone(), measurer.measure_all(files)?)))
        .collect()
}

/// App router sizes from the three manifests involved.
///
/// A route whose file-system key has no app build manifest entry means the
/// manifests disagree; that fails with [`BundleReportError::BrokenRouteMapping`]
/// rather than reporting a misleading zero.
pub fn app_page_sizes<FS: FileSystem>(
    build_manifest: &BuildManifest,
    app_build_manifest: &BuildManifest,
    routes: &AppPathRoutes,
    measurer: &mut SizeMeasurer<FS>,
) -> Result<Vec<PageBundleSize>, BundleReportError> {
    let Some(shared) = build_manifest.root_main_files.as_ref() else {
        debug!("No rootMainFiles in build manifest, skipping app router sizes");
        return Ok(Vec::new());
    };
    let shared_size = measurer.measure_all(shared)?;

    let mut sizes = Vec::new();
    for (fs_path, route) in routes.page_and_layout_routes() {
        let files = app_build_manifest.pages.get(fs_path).ok_or_else(|| {
            BundleReportError::BrokenRouteMapping {
                fs_path: fs_path.to_string(),
                route: route.to_string(),
            }
        })?;

        // Only scripts count, matching what `next build` prints
        let own_scripts = files
            .iter()
            .filter(|file| file.ends_with(SCRIPT_EXTENSION) && !shared.contains(*file));
        sizes.push(PageBundleSize::new(route, measurer.measure_all(own_scripts)?));
    }

    sizes.push(PageBundleSize::new(SHARED_BUNDLE_NAME, shared_size));
    Ok(sizes)
}

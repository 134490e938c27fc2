//! Bundle size measurement
//!
//! [`SizeMeasurer`] gzips build artifacts (memoized per run) and
//! [`BundleSizeExtractor`] turns manifests into per-page totals for each
//! [`RouteCategory`].

pub mod extractor;
pub mod measurer;

pub use extractor::BundleSizeExtractor;
pub use measurer::SizeMeasurer;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic row carrying the app router's shared bundle size
pub const SHARED_BUNDLE_NAME: &str = "First Load JS shared by all";

/// Gzipped size of one page in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBundleSize {
    /// Route or chunk key
    pub page: String,
    /// Sum of the gzipped sizes of the page's artifacts, in bytes
    pub size: u64,
}

impl PageBundleSize {
    /// Create a new size entry
    pub fn new(page: impl Into<String>, size: u64) -> Self {
        Self {
            page: page.into(),
            size,
        }
    }
}

/// The three independently measured and reported route categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteCategory {
    /// App router pages and layouts
    App,
    /// Pages router pages
    Pages,
    /// Dynamically imported chunks
    Dynamic,
}

impl RouteCategory {
    /// All categories in report order
    pub const ALL: [RouteCategory; 3] = [Self::App, Self::Pages, Self::Dynamic];

    /// Header of the category's report table
    pub fn table_name(self) -> &'static str {
        match self {
            Self::App => "Route (App)",
            Self::Pages => "Route (Pages)",
            Self::Dynamic => "Dynamic import",
        }
    }

    /// File name of the category's snapshot inside the artifact
    pub fn snapshot_file(self) -> &'static str {
        match self {
            Self::App => "app-bundle-sizes.json",
            Self::Pages => "bundle-sizes.json",
            Self::Dynamic => "dynamic-bundle-sizes.json",
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

//! Page-level size comparison between a reference build and the current build
//!
//! Every current page is either `added` (unknown to the reference) or
//! `changed` (possibly by zero bytes); every reference page missing from the
//! current build is `removed`. When a reference exists, changes smaller than
//! [`SIGNIFICANCE_THRESHOLD`] are dropped as noise.

use crate::bundle::PageBundleSize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Smallest absolute byte delta of a `changed` page worth reporting
pub const SIGNIFICANCE_THRESHOLD: i64 = 1000;

/// How a page differs from the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Page did not exist in the reference
    Added,
    /// Page exists in both builds
    Changed,
    /// Page no longer exists
    Removed,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Removed => "removed",
        })
    }
}

/// One row of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChangeInfo {
    /// Route or chunk key
    pub page: String,
    /// Classification
    #[serde(rename = "type")]
    pub change: ChangeType,
    /// Current size in bytes (0 for removed pages)
    pub size: u64,
    /// Delta against the reference in bytes (0 for removed pages)
    pub diff: i64,
}

impl PageChangeInfo {
    /// Added and removed pages always matter; changes only past the threshold
    pub fn is_significant(&self) -> bool {
        self.change != ChangeType::Changed || self.diff.abs() >= SIGNIFICANCE_THRESHOLD
    }
}

/// Classify every page of `current` and `reference`.
///
/// Added/changed rows come first in `current` order, then removed rows in
/// `reference` order. No filtering is applied.
pub fn page_changes(
    reference: &[PageBundleSize],
    current: &[PageBundleSize],
) -> Vec<PageChangeInfo> {
    // First occurrence wins for duplicated page names
    let mut reference_sizes: HashMap<&str, u64> = HashMap::with_capacity(reference.len());
    for entry in reference {
        reference_sizes.entry(entry.page.as_str()).or_insert(entry.size);
    }
    let current_pages: HashSet<&str> = current.iter().map(|entry| entry.page.as_str()).collect();

    let added_and_changed = current.iter().map(|entry| {
        match reference_sizes.get(entry.page.as_str()) {
            Some(&previous) => PageChangeInfo {
                page: entry.page.clone(),
                change: ChangeType::Changed,
                size: entry.size,
                diff: entry.size as i64 - previous as i64,
            },
            None => PageChangeInfo {
                page: entry.page.clone(),
                change: ChangeType::Added,
                size: entry.size,
                diff: entry.size as i64,
            },
        }
    });

    let removed = reference
        .iter()
        .filter(|entry| !current_pages.contains(entry.page.as_str()))
        .map(|entry| PageChangeInfo {
            page: entry.page.clone(),
            change: ChangeType::Removed,
            size: 0,
            diff: 0,
        });

    added_and_changed.chain(removed).collect()
}

/// Result of comparing one category against its reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleComparison {
    rows: Vec<PageChangeInfo>,
    has_reference: bool,
}

impl BundleComparison {
    /// Compare and, when a reference exists, keep only significant rows
    pub fn new(reference: &[PageBundleSize], current: &[PageBundleSize]) -> Self {
        let has_reference = !reference.is_empty();
        let mut rows = page_changes(reference, current);
        if has_reference {
            rows.retain(PageChangeInfo::is_significant);
        }
        Self {
            rows,
            has_reference,
        }
    }

    /// First-ever measurement: every current page as `added`, nothing filtered
    pub fn without_reference(current: &[PageBundleSize]) -> Self {
        Self::new(&[], current)
    }

    /// Rows to report
    pub fn rows(&self) -> &[PageChangeInfo] {
        &self.rows
    }

    /// Whether a non-empty reference was compared against
    pub fn has_reference(&self) -> bool {
        self.has_reference
    }

    /// True when there is nothing to report
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

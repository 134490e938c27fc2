//! Comment and issue bodies assembled from the per-category tables

use crate::bundle::RouteCategory;

/// Shown in a comment when every category table was omitted
pub const FALLBACK_TEXT: &str = "No significant changes found";

/// Heading of the pull request comment, also its lookup key
pub fn comment_title(app_name: &str) -> String {
    format!("### Bundle sizes [{}]", app_name)
}

/// Title of the tracking issue, also its lookup key
pub fn issue_title(app_name: &str) -> String {
    format!("Bundle sizes [{}]", app_name)
}

/// Collapsible summary line naming the reference commit
pub fn sha_summary(sha: &str) -> String {
    format!("Compared against {}", sha)
}

/// Trim every fragment, drop the blank or missing ones and join the rest
/// with blank lines.
pub fn format_text_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    fragments
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One rendered table (or none) per route category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTables {
    app: Option<String>,
    pages: Option<String>,
    dynamic: Option<String>,
}

impl ReportTables {
    /// Set the table of one category
    pub fn set(&mut self, category: RouteCategory, table: Option<String>) {
        *self.slot(category) = table;
    }

    /// Table of one category, if it was rendered
    pub fn get(&self, category: RouteCategory) -> Option<&str> {
        match category {
            RouteCategory::App => self.app.as_deref(),
            RouteCategory::Pages => self.pages.as_deref(),
            RouteCategory::Dynamic => self.dynamic.as_deref(),
        }
    }

    /// Tables in report order
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        RouteCategory::ALL.into_iter().map(|category| self.get(category))
    }

    /// True when no category has anything to show
    pub fn is_empty(&self) -> bool {
        self.iter()
            .all(|table| table.is_none_or(|text| text.trim().is_empty()))
    }

    fn slot(&mut self, category: RouteCategory) -> &mut Option<String> {
        match category {
            RouteCategory::App => &mut self.app,
            RouteCategory::Pages => &mut self.pages,
            RouteCategory::Dynamic => &mut self.dynamic,
        }
    }
}

impl FromIterator<(RouteCategory, Option<String>)> for ReportTables {
    fn from_iter<T: IntoIterator<Item = (RouteCategory, Option<String>)>>(iter: T) -> Self {
        let mut tables = Self::default();
        for (category, table) in iter {
            tables.set(category, table);
        }
        tables
    }
}

/// Pull request comment: title, then the tables folded under a summary line
pub fn comment_body(title: &str, reference_sha: &str, tables: &ReportTables) -> String {
    let summary = format!("<summary>{}</summary>", sha_summary(reference_sha));
    let fallback = tables.is_empty().then_some(FALLBACK_TEXT);

    let fragments = [Some(title), Some("<details>"), Some(summary.as_str())]
        .into_iter()
        .chain(tables.iter())
        .chain([Some("</details>"), fallback]);
    format_text_fragments(fragments)
}

/// Tracking issue: the tables alone.
///
/// A category with no pages has no section at all rather than a header-only
/// table, since [`single_column_table`](super::single_column_table) yields `None` for it.
pub fn issue_body(tables: &ReportTables) -> String {
    format_text_fragments(tables.iter())
}

//! Markdown tables for one route category

use crate::bundle::PageBundleSize;
use crate::diff::{BundleComparison, ChangeType, PageChangeInfo};
use crate::fmt::format_bytes;

/// Three-column table: page, size and diff (or `added`/`removed`)
pub fn format_table(name: &str, rows: &[PageChangeInfo]) -> String {
    let mut table = format!("| {} | Size (gzipped) | Diff |\n| --- | --- | --- |", name);
    for row in rows {
        let status = match row.change {
            ChangeType::Changed => format_bytes(row.diff, true),
            other => other.to_string(),
        };
        table.push_str(&format!(
            "\n| `{}` | {} | {} |",
            row.page,
            format_size(row.size),
            status
        ));
    }
    table
}

/// Two-column table: page and size
pub fn format_table_no_diff<'a, I>(name: &str, rows: I) -> String
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut table = format!("| {} | Size (gzipped) |\n| --- | --- |", name);
    for (page, size) in rows {
        table.push_str(&format!("\n| `{}` | {} |", page, format_size(size)));
    }
    table
}

/// Table of a comparison, or `None` when there is nothing worth showing.
///
/// Without a reference every page is listed in the two-column form. With one,
/// only rows that passed the significance filter are listed.
pub fn comparison_table(comparison: &BundleComparison, name: &str) -> Option<String> {
    if comparison.is_empty() {
        return None;
    }
    let rows = comparison.rows();
    if comparison.has_reference() {
        Some(format_table(name, rows))
    } else {
        Some(format_table_no_diff(
            name,
            rows.iter().map(|row| (row.page.as_str(), row.size)),
        ))
    }
}

/// Two-column table of the current sizes alone, `None` when there are none
pub fn single_column_table(sizes: &[PageBundleSize], name: &str) -> Option<String> {
    if sizes.is_empty() {
        return None;
    }
    Some(format_table_no_diff(
        name,
        sizes.iter().map(|entry| (entry.page.as_str(), entry.size)),
    ))
}

fn format_size(size: u64) -> String {
    format_bytes(i64::try_from(size).unwrap_or(i64::MAX), false)
}

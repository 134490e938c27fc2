//! Markdown rendering of bundle size reports
//!
//! [`table`] renders one category at a time; [`body`] stitches the category
//! tables into the pull request comment and tracking issue texts.

pub mod body;
pub mod table;

pub use body::{
    comment_body, comment_title, format_text_fragments, issue_body, issue_title, ReportTables,
    FALLBACK_TEXT,
};
pub use table::{comparison_table, format_table, format_table_no_diff, single_column_table};

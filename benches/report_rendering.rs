//! Diff and Report Rendering Benchmarks
//!
//! **Purpose:** Measure the cost of comparing two measurements and rendering
//! the comment body for large apps.
//!
//! **How to Run:**
//! ```bash
//! cargo bench --bench report_rendering
//! ```
//!
//! **What's Being Measured:**
//! 1. `page changes` - Classifying every page against the reference
//! 2. `comparison table` - Significance filter plus Markdown rendering
//! 3. `comment body` - All three categories stitched into one comment
//!
//! **Performance Notes:**
//! - Reference lookup is a hash map, so comparison is linear in pages
//! - Rendering allocates one string per table

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use next_bundle_report::bundle::{PageBundleSize, RouteCategory};
use next_bundle_report::diff::{page_changes, BundleComparison};
use next_bundle_report::report::{comment_body, comment_title, comparison_table, ReportTables};
use std::hint::black_box;

/// `pages` routes; every third one grew past the threshold, every tenth is new
fn measurements(pages: usize) -> (Vec<PageBundleSize>, Vec<PageBundleSize>) {
    let reference = (0..pages)
        .map(|i| PageBundleSize::new(format!("/route/{}", i), 10_000 + i as u64))
        .collect();
    let current = (0..pages)
        .map(|i| {
            let name = if i % 10 == 0 {
                format!("/new/{}", i)
            } else {
                format!("/route/{}", i)
            };
            let growth = if i % 3 == 0 { 4_096 } else { 12 };
            PageBundleSize::new(name, 10_000 + i as u64 + growth)
        })
        .collect();
    (reference, current)
}

fn bench_page_changes(c: &mut Criterion) {
    let mut group = c.benchmark_group("page changes");
    for pages in [10, 100, 1_000] {
        let (reference, current) = measurements(pages);
        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, _| {
            b.iter(|| black_box(page_changes(&reference, &current)));
        });
    }
    group.finish();
}

fn bench_comparison_table(c: &mut Criterion) {
    let (reference, current) = measurements(500);
    c.bench_function("comparison table (500 pages)", |b| {
        b.iter(|| {
            let comparison = BundleComparison::new(&reference, &current);
            black_box(comparison_table(&comparison, "Route (Pages)"))
        });
    });
}

fn bench_comment_body(c: &mut Criterion) {
    let (reference, current) = measurements(200);
    c.bench_function("comment body (3 x 200 pages)", |b| {
        b.iter(|| {
            let tables: ReportTables = RouteCategory::ALL
                .into_iter()
                .map(|category| {
                    let comparison = BundleComparison::new(&reference, &current);
                    (category, comparison_table(&comparison, category.table_name()))
                })
                .collect();
            black_box(comment_body(&comment_title("web"), "abc123", &tables))
        });
    });
}

criterion_group!(
    benches,
    bench_page_changes,
    bench_comparison_table,
    bench_comment_body
);
criterion_main!(benches);

//! Text and JSON report output

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use crate::fib::FibRow;
use crate::range::RangeReport;

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    benchmark: &'a str,
    generated_at: String,
    version: &'a str,
    report: &'a T,
}

/// `uncached / cached`, or 0 when the cached run was too fast to measure
pub fn speedup(uncached_secs: f64, cached_secs: f64) -> f64 {
    if cached_secs == 0.0 {
        0.0
    } else {
        uncached_secs / cached_secs
    }
}

/// Serialize a report with a timestamped envelope
pub fn to_json<T: Serialize>(benchmark: &str, report: &T) -> Result<String> {
    let envelope = Envelope {
        benchmark,
        generated_at: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        report,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Colored text summary of a range run
pub fn render_range(report: &RangeReport) -> String {
    let title = format!(
        "📊 RANGE SUM ({} elements, {} ops, capacity {}):",
        report.size, report.ops, report.capacity
    );
    let lines = [
        title.bold().to_string(),
        format!("   Execution time without caching: {:.4} seconds", report.uncached_secs)
            .green()
            .to_string(),
        format!("   Execution time with LRU cache:  {:.4} seconds", report.cached_secs)
            .blue()
            .to_string(),
        format!("   Speedup with caching:           {:.2}x", report.speedup)
            .yellow()
            .to_string(),
        format!(
            "   Cache: {} hits, {} misses ({:.1}% hit rate), {} inserts, {} evictions, {} invalidated",
            report.hits,
            report.misses,
            report.hit_ratio * 100.0,
            report.inserts,
            report.evictions,
            report.invalidations
        ),
    ];
    lines.join("\n")
}

pub fn print_range(report: &RangeReport) {
    println!("\n{}", render_range(report));
}

pub fn print_fib(rows: &[FibRow]) {
    let header = format!(
        "{:<10}{:<25}{:<25}{}",
        "n", "LRU Memo Time (s)", "Splay Tree Time (s)", "Rotations"
    );
    println!("{}", header.cyan());
    println!("{}", "-".repeat(70));
    for row in rows {
        let line = format!(
            "{:<10}{:<25.8}{:<25.8}{}",
            row.n, row.lru_secs, row.splay_secs, row.splay_rotations
        );
        println!("{}", line.yellow());
    }
}

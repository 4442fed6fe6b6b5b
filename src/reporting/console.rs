//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the aggregated per-target summary and the captured logs of
//! failed runs at the end of a batch.
//!
//! 在批次结束时打印按目标聚合的摘要和失败运行捕获的日志。

use colored::*;

use crate::core::summary::RunReport;

/// Prints the per-target run/failed table plus the full captured log of
/// every failed run.
///
/// # Output Format / 输出格式
/// ```text
/// --- Tutorial Test Summary (2026-08-23 14:02:11) ---
///   - CWLITEARM       |   4 run |   1 failed
///   - CWLITEXMEGA     |   2 run |   0 failed
///   - all             |   6 run |   1 failed
/// ```
pub fn print_summary(report: &RunReport) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    println!(
        "\n{}",
        format!("--- Tutorial Test Summary ({}) ---", timestamp).bold()
    );

    for (target, counts) in report.summary.iter() {
        let failed_str = format!("{:>3} failed", counts.failed);
        let failed_colored = if counts.failed > 0 {
            failed_str.red()
        } else {
            failed_str.green()
        };
        println!(
            "  - {:<16} | {:>3} run | {}",
            target, counts.run, failed_colored
        );
    }

    let failures: Vec<_> = report
        .logs
        .iter()
        .filter(|(header, _)| header.starts_with("FAILED"))
        .collect();
    if failures.is_empty() {
        return;
    }

    println!("\n{}", "--- Failed Runs ---".red().bold());
    println!("{}", "-".repeat(80));
    for (i, (header, log)) in failures.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, failures.len(), header.red());
        println!("{}", log);
        println!("{}", "-".repeat(80));
    }
}

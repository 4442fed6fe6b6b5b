//! # Result Aggregation Module / 结果聚合模块
//!
//! Accumulates per-target and overall pass/fail counts plus the captured
//! log text of every run, keyed by a human-readable test header.
//!
//! 累积按目标和整体的通过/失败计数，以及每次运行捕获的日志文本，
//! 以人类可读的测试标题为键。

use serde::Serialize;
use std::collections::BTreeMap;

/// Run/failed counters for one target (or the synthetic "all" key).
/// 单个目标（或合成的 "all" 键）的运行/失败计数器。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TargetCounts {
    pub run: u32,
    pub failed: u32,
}

/// Aggregated counters across a full test run. `run` increments for every
/// executed pair; `failed` only on a fail outcome. Unmatched pairs are
/// skipped before reaching the aggregator and never touch the counts.
///
/// 整个测试运行的聚合计数器。每个被执行的对都会使 `run` 递增；
/// 只有失败结果才使 `failed` 递增。未匹配的对在到达聚合器之前就被跳过，
/// 永远不会触碰计数。
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    targets: BTreeMap<String, TargetCounts>,
}

/// The synthetic key accumulating counts across every target.
pub const ALL_TARGETS: &str = "all";

impl Summary {
    pub fn new() -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(ALL_TARGETS.to_string(), TargetCounts::default());
        Self { targets }
    }

    /// Records one executed run against both the specific target key and
    /// the "all" key.
    pub fn record(&mut self, target: &str, passed: bool) {
        for key in [target, ALL_TARGETS] {
            let counts = self.targets.entry(key.to_string()).or_default();
            counts.run += 1;
            if !passed {
                counts.failed += 1;
            }
        }
    }

    pub fn get(&self, target: &str) -> Option<TargetCounts> {
        self.targets.get(target).copied()
    }

    pub fn overall(&self) -> TargetCounts {
        self.get(ALL_TARGETS).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TargetCounts)> {
        self.targets.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

/// The full run report: aggregated counters plus the captured log of every
/// run, keyed by `"<PASSED|FAILED>: <document> using <target>"`.
///
/// 完整的运行报告：聚合计数器加上每次运行捕获的日志，
/// 以 `"<PASSED|FAILED>: <文档> using <目标>"` 为键。
#[derive(Debug, Default)]
pub struct RunReport {
    pub summary: Summary,
    pub logs: BTreeMap<String, String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            summary: Summary::new(),
            logs: BTreeMap::new(),
        }
    }

    /// Feeds one completed run into the report.
    pub fn record(&mut self, document: &str, target: &str, passed: bool, log_text: String) {
        self.summary.record(target, passed);
        let verdict = if passed { "PASSED" } else { "FAILED" };
        let header = format!("{}: {} using {}", verdict, document, target);
        self.logs.insert(header, log_text);
    }
}

//! # Configuration Matcher Module / 配置匹配模块
//!
//! Decides whether a requested test configuration can be satisfied by one
//! of the currently connected hardware profiles.
//!
//! 判断一个请求的测试配置能否由当前连接的某个硬件 profile 满足。

use crate::core::config::{Configuration, HardwareProfile};

/// Finds the first connected profile whose `scope` and `target` both equal
/// the requested configuration's. Keyword overrides never participate in
/// matching, and profiles are not deduplicated: first match in list order
/// wins. `None` means the (document, configuration) pair must be skipped
/// entirely, without touching any counters.
///
/// 查找第一个 `scope` 和 `target` 都与请求配置相等的已连接 profile。
/// kwargs 不参与匹配，profile 也不去重：列表顺序中的第一个匹配获胜。
/// `None` 表示必须完全跳过该（文档，配置）对，不触碰任何计数器。
pub fn matching_connected<'a>(
    config: &Configuration,
    connected: &'a [HardwareProfile],
) -> Option<&'a HardwareProfile> {
    connected
        .iter()
        .find(|profile| profile.scope == config.scope && profile.target == config.target)
}

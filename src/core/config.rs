//! # Test Plan Configuration Module / 测试计划配置模块
//!
//! This module defines the declarative test plan loaded once per run:
//! which tutorial documents to test, which hardware configurations each
//! document supports, and which hardware is currently connected.
//!
//! 此模块定义每次运行加载一次的声明式测试计划：
//! 要测试哪些教程文档、每个文档支持哪些硬件配置，以及当前连接了哪些硬件。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// A scalar parameter value carried by the plan's kwargs layers.
/// Values are substituted into a document's parameter cell as Python
/// literals, so the rendering must stay valid Python source.
///
/// 计划 kwargs 层携带的标量参数值。
/// 值会作为 Python 字面量替换进文档的参数单元格，因此渲染结果必须保持合法的 Python 源码。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Renders the value as a Python literal for parameter injection.
    pub fn to_python_literal(&self) -> String {
        match self {
            ParamValue::Bool(true) => "True".to_string(),
            ParamValue::Bool(false) => "False".to_string(),
            ParamValue::Int(i) => i.to_string(),
            // {:?} keeps the decimal point on round floats (3.0, not 3).
            ParamValue::Float(f) => format!("{:?}", f),
            ParamValue::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_python_literal())
    }
}

/// An ordered map of parameter overrides. Order is deterministic so the
/// injected parameter cell is stable across runs.
pub type Kwargs = BTreeMap<String, ParamValue>;

/// One requested test variant for a document: the logical instrument class
/// (`scope`) and the platform identifier (`target`), plus optional extras.
///
/// 文档的一个请求测试变体：逻辑仪器类别（`scope`）和平台标识符（`target`），以及可选的附加项。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Configuration {
    /// Logical instrument class, e.g. "OPENADC". Injected as `SCOPETYPE`.
    /// 逻辑仪器类别，例如 "OPENADC"。注入为 `SCOPETYPE`。
    pub scope: String,
    /// Platform identifier, e.g. "CWLITEARM". Injected as `PLATFORM`.
    /// 平台标识符，例如 "CWLITEARM"。注入为 `PLATFORM`。
    pub target: String,
    /// Optional firmware identifier. Injected as `CRYPTO_TARGET` when present.
    /// 可选的固件标识符。存在时注入为 `CRYPTO_TARGET`。
    #[serde(default)]
    pub firmware: Option<String>,
    /// Extra parameter overrides specific to this variant. These sit in the
    /// base layer of the merge and are overridden by profile and spec kwargs.
    /// 此变体特定的额外参数覆盖。位于合并的基础层，会被 profile 和 spec 的 kwargs 覆盖。
    #[serde(default)]
    pub kwargs: Kwargs,
}

/// A physically connected device available to satisfy a [`Configuration`].
/// Only `scope` and `target` participate in matching.
///
/// 一个物理连接的设备，可用于满足一个 [`Configuration`]。
/// 只有 `scope` 和 `target` 参与匹配。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HardwareProfile {
    pub scope: String,
    pub target: String,
    /// Serial number used to claim this exact device in connection calls.
    /// 用于在连接调用中认领这台设备的序列号。
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Communication baud rate required when programming this device.
    /// 对这台设备编程时所需的通信波特率。
    #[serde(default)]
    pub baud: Option<u32>,
    /// Parameter overrides contributed by this device.
    /// 此设备贡献的参数覆盖。
    #[serde(default)]
    pub kwargs: Kwargs,
}

/// A named tutorial document plus the hardware configurations it supports.
///
/// 一个命名的教程文档及其支持的硬件配置。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TestSpec {
    /// The configurations this document should be run against, in order.
    /// 此文档应运行的配置，按顺序排列。
    pub configurations: Vec<Configuration>,
    /// Document-specific parameter overrides. This is the last merge layer
    /// and wins over configuration and profile kwargs.
    /// 文档特定的参数覆盖。这是合并的最后一层，优先于配置和 profile 的 kwargs。
    #[serde(default)]
    pub kwargs: Kwargs,
    /// Exception names that do not fail the run when every classified error
    /// is in this list.
    /// 当每个归类错误都在此列表中时不会使运行失败的异常名称。
    #[serde(default)]
    pub allowable_exceptions: Option<Vec<String>>,
    /// Document-level baud override; wins over the matched profile's baud.
    /// 文档级波特率覆盖；优先于匹配到的 profile 的波特率。
    #[serde(default)]
    pub baud: Option<u32>,
}

/// The whole declarative test plan: tutorials to run and connected hardware.
///
/// 整个声明式测试计划：要运行的教程和已连接的硬件。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TestPlan {
    /// Optional execution engine command override, e.g.
    /// `"jupyter nbconvert"`. Split with shell semantics before use.
    /// 可选的执行引擎命令覆盖，例如 `"jupyter nbconvert"`。使用前按 shell 语义拆分。
    #[serde(default)]
    pub engine_command: Option<String>,
    /// Mapping from document path (relative to the documents directory) to
    /// its test spec.
    /// 从文档路径（相对于文档目录）到其测试规格的映射。
    pub tutorials: BTreeMap<String, TestSpec>,
    /// The currently connected hardware profiles, in declaration order.
    /// 当前连接的硬件 profile，按声明顺序排列。
    pub connected: Vec<HardwareProfile>,
}

/// Loads and parses the YAML test plan. A plan that cannot be read or
/// parsed is a configuration error and aborts the run.
pub fn load_plan(path: &Path) -> Result<TestPlan> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read test configuration: {}", path.display()))?;
    let plan: TestPlan = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse test configuration: {}", path.display()))?;
    Ok(plan)
}

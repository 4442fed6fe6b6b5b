//! # Document Model Module / 文档模型模块
//!
//! This module defines the tagged records for a test document: an ordered
//! sequence of cells, where code cells carry outputs after execution.
//! Documents are notebook JSON (nbformat 4) on disk; malformed documents
//! are rejected at load time rather than deep inside the pipeline.
//!
//! 此模块定义测试文档的带标签记录：一个有序的单元格序列，
//! 其中代码单元格在执行后携带输出。
//! 文档在磁盘上为 notebook JSON（nbformat 4）；
//! 格式错误的文档在加载时被拒绝，而不是在管道深处失败。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Notebook `source` and stream `text` fields are either a single string or
/// a list of line fragments. Deserialize both shapes into one string and
/// always serialize back as a single string.
mod source_text {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(s) => s,
            Repr::Many(parts) => parts.concat(),
        })
    }
}

/// One output attached to an executed code cell.
/// 附加到已执行代码单元格的一个输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Print-like text written to stdout or stderr during execution.
    /// 执行期间写入 stdout 或 stderr 的类打印文本。
    Stream {
        name: String,
        #[serde(with = "source_text")]
        text: String,
    },
    /// An exception raised by the cell.
    /// 单元格抛出的异常。
    Error {
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
    ExecuteResult {
        #[serde(default)]
        execution_count: Option<u64>,
        #[serde(default = "empty_object")]
        data: Value,
        #[serde(default = "empty_object")]
        metadata: Value,
    },
    DisplayData {
        #[serde(default = "empty_object")]
        data: Value,
        #[serde(default = "empty_object")]
        metadata: Value,
    },
}

/// A unit of document content. Code cells are the only mutation target for
/// inlining, parameter injection and pattern rewriting.
///
/// 文档内容的一个单元。代码单元格是内联、参数注入和模式重写的唯一变更目标。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Code {
        #[serde(with = "source_text")]
        source: String,
        #[serde(default)]
        outputs: Vec<Output>,
        #[serde(default)]
        execution_count: Option<u64>,
        #[serde(default = "empty_object")]
        metadata: Value,
    },
    Markdown {
        #[serde(with = "source_text")]
        source: String,
        #[serde(default = "empty_object")]
        metadata: Value,
    },
    Raw {
        #[serde(with = "source_text")]
        source: String,
        #[serde(default = "empty_object")]
        metadata: Value,
    },
}

impl Cell {
    pub fn is_code(&self) -> bool {
        matches!(self, Cell::Code { .. })
    }

    /// The textual source of the cell, regardless of kind.
    pub fn source(&self) -> &str {
        match self {
            Cell::Code { source, .. } => source,
            Cell::Markdown { source, .. } => source,
            Cell::Raw { source, .. } => source,
        }
    }

    /// The outputs attached to this cell. Non-code cells never have any.
    pub fn outputs(&self) -> &[Output] {
        match self {
            Cell::Code { outputs, .. } => outputs,
            _ => &[],
        }
    }
}

/// An ordered sequence of cells identified by a filesystem path.
/// Every transformation stage preserves cell order unless it explicitly
/// inlines additional source.
///
/// 由文件系统路径标识的有序单元格序列。
/// 除非显式内联额外源码，每个转换阶段都保持单元格顺序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Filesystem identity of the document; not part of the wire format.
    /// 文档的文件系统标识；不属于线上格式。
    #[serde(skip)]
    pub path: PathBuf,
    pub cells: Vec<Cell>,
    #[serde(default = "empty_object")]
    pub metadata: Value,
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
}

impl Document {
    /// Loads and validates a document from disk. Unknown cell kinds, missing
    /// required fields and non-v4 documents are load-time errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let mut document: Document = serde_json::from_str(&content)
            .with_context(|| format!("Malformed document: {}", path.display()))?;
        if document.nbformat != 4 {
            bail!(
                "Unsupported document format version {} in {}",
                document.nbformat,
                path.display()
            );
        }
        document.path = path.to_path_buf();
        Ok(document)
    }

    /// Serializes the document back to its JSON wire format.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize document")
    }

    /// Iterates mutably over the source of every code cell, in order.
    pub fn code_sources_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.cells.iter_mut().filter_map(|cell| match cell {
            Cell::Code { source, .. } => Some(source),
            _ => None,
        })
    }

    /// Translates the document into flat standalone source: the code cells'
    /// text concatenated in document order. Used when inlining a referenced
    /// document into a cell.
    pub fn to_script(&self) -> String {
        self.cells
            .iter()
            .filter(|cell| cell.is_code())
            .map(Cell::source)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The document's file name without its extension.
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

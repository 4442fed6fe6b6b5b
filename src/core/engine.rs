//! # Execution Engine Interface / 执行引擎接口
//!
//! The document-execution engine is an external collaborator: it accepts a
//! document plus a working directory and returns the executed document with
//! per-cell outputs attached. How statements are interpreted is out of
//! scope; the pipeline only depends on this narrow interface.
//!
//! 文档执行引擎是外部协作者：它接受一个文档和一个工作目录，
//! 返回附带各单元格输出的已执行文档。语句如何被解释不在范围内；
//! 管道只依赖这个窄接口。

use anyhow::Result;
use std::path::Path;
use std::time::Duration;

use crate::core::document::Document;

/// Executes a transformed document and returns it with outputs attached.
///
/// Implementations must preserve cell order. `timeout` of `None` means
/// unlimited; `allow_errors` asks the engine to continue past cell errors
/// and record them as outputs rather than aborting.
#[allow(async_fn_in_trait)]
pub trait ExecutionEngine {
    async fn execute(
        &self,
        document: &Document,
        working_dir: &Path,
        timeout: Option<Duration>,
        allow_errors: bool,
    ) -> Result<Document>;
}

//! # Default Execution Engine Binding / 默认执行引擎绑定
//!
//! Binds the [`ExecutionEngine`](crate::core::engine::ExecutionEngine)
//! interface to `jupyter nbconvert`: the transformed document is written to
//! a scratch file inside the working directory, executed out of process,
//! and the executed document is read back.
//!
//! 将 [`ExecutionEngine`](crate::core::engine::ExecutionEngine) 接口绑定到
//! `jupyter nbconvert`：转换后的文档写入工作目录内的临时文件，
//! 在进程外执行，然后读回已执行的文档。

use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::document::Document;
use crate::core::engine::ExecutionEngine;
use crate::infra::command::spawn_and_capture;

const DEFAULT_COMMAND: &[&str] = &["jupyter", "nbconvert"];

/// Runs documents through `jupyter nbconvert --to notebook --execute`.
/// The base command is overridable from the plan or the CLI.
#[derive(Debug, Clone)]
pub struct NbConvertEngine {
    command: Vec<String>,
}

impl NbConvertEngine {
    pub fn new() -> Self {
        Self {
            command: DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Builds an engine from a user-supplied command line, expanding shell
    /// variables and tildes before splitting.
    pub fn from_command(command: &str) -> Result<Self> {
        let expanded = shellexpand::full(command)
            .with_context(|| format!("Failed to expand engine command: {}", command))?
            .to_string();
        let parts = shlex::split(&expanded)
            .ok_or_else(|| anyhow!("Failed to parse engine command: {}", expanded))?;
        if parts.is_empty() {
            bail!("Empty engine command");
        }
        Ok(Self { command: parts })
    }
}

impl Default for NbConvertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine for NbConvertEngine {
    async fn execute(
        &self,
        document: &Document,
        working_dir: &Path,
        timeout: Option<Duration>,
        allow_errors: bool,
    ) -> Result<Document> {
        // The scratch input lives next to the document so relative reads
        // inside cells keep working.
        let input = tempfile::Builder::new()
            .prefix(".tutorial-run-")
            .suffix(".ipynb")
            .tempfile_in(working_dir)
            .context("Failed to create scratch document")?;
        fs::write(input.path(), document.to_json()?)
            .with_context(|| format!("Failed to write scratch document: {}", input.path().display()))?;

        let output_stem = format!(
            ".tutorial-out-{}",
            std::process::id()
        );
        let output_path = working_dir.join(format!("{}.ipynb", output_stem));

        let timeout_secs = match timeout {
            Some(duration) => duration.as_secs().to_string(),
            None => "-1".to_string(),
        };

        let mut cmd = tokio::process::Command::new(&self.command[0]);
        cmd.args(&self.command[1..])
            .arg("--to")
            .arg("notebook")
            .arg("--execute")
            .arg(format!("--ExecutePreprocessor.timeout={}", timeout_secs))
            .arg("--output")
            .arg(&output_stem)
            .arg("--output-dir")
            .arg(working_dir);
        if allow_errors {
            cmd.arg("--allow-errors");
        }
        cmd.arg(input.path())
            .current_dir(working_dir)
            .kill_on_drop(true);

        let (status_res, captured) = spawn_and_capture(cmd).await;
        let status = status_res.context("Failed to get execution engine status")?;
        if !status.success() {
            // Best-effort cleanup of a partial output before failing.
            let _ = fs::remove_file(&output_path);
            bail!(
                "Execution engine failed for {}:\n{}",
                document.path.display(),
                captured
            );
        }

        let executed = Document::load(&output_path).with_context(|| {
            format!(
                "Execution engine produced no readable output for {}",
                document.path.display()
            )
        });
        let _ = fs::remove_file(&output_path);

        let mut executed = executed?;
        executed.path = document.path.clone();
        Ok(executed)
    }
}

//! # reStructuredText Rendering Module / reStructuredText 渲染模块
//!
//! Renders an executed document into reStructuredText: markdown cells pass
//! through as body text, code cells become `.. code::` blocks and their
//! outputs become literal blocks.
//!
//! 将已执行的文档渲染为 reStructuredText：markdown 单元格作为正文直接通过，
//! 代码单元格变为 `.. code::` 块，其输出变为字面块。

use crate::core::document::{Cell, Document, Output};
use crate::core::runner::strip_ansi;
use crate::reporting::html::plain_text;

/// Renders the executed document to reStructuredText.
pub fn render_rst(document: &Document) -> String {
    let title = document.file_stem();
    let mut rst = String::new();
    rst.push_str(&title);
    rst.push('\n');
    rst.push_str(&"=".repeat(title.chars().count().max(1)));
    rst.push_str("\n\n");

    for cell in &document.cells {
        match cell {
            Cell::Markdown { source, .. } => {
                rst.push_str(source);
                rst.push_str("\n\n");
            }
            Cell::Code { source, outputs, .. } => {
                rst.push_str(".. code:: python\n\n");
                push_indented(&mut rst, source);
                for output in outputs {
                    render_output(&mut rst, output);
                }
            }
            Cell::Raw { .. } => {}
        }
    }

    rst
}

fn render_output(rst: &mut String, output: &Output) {
    let text = match output {
        Output::Stream { text, .. } => text.clone(),
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            let mut body = format!("{}: {}\n", ename, evalue);
            for line in traceback {
                body.push_str(&strip_ansi(line));
                body.push('\n');
            }
            body
        }
        Output::ExecuteResult { data, .. } | Output::DisplayData { data, .. } => {
            match plain_text(data) {
                Some(text) => text,
                None => return,
            }
        }
    };
    rst.push_str("::\n\n");
    push_indented(rst, &text);
}

fn push_indented(rst: &mut String, block: &str) {
    for line in block.lines() {
        rst.push_str("    ");
        rst.push_str(line);
        rst.push('\n');
    }
    rst.push('\n');
}

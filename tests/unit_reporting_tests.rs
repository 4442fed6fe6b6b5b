//! # Reporting Module Unit Tests / Reporting 模块单元测试
//!
//! This module contains unit tests for the `reporting` modules, testing the
//! HTML and reStructuredText rendering of executed documents.
//!
//! 此模块包含 `reporting` 模块的单元测试，
//! 测试已执行文档的 HTML 和 reStructuredText 渲染。

use serde_json::json;
use tutorial_runner::document::Document;
use tutorial_runner::reporting::{render_html, render_rst};

mod common;

fn load_fixture(name: &str, nb: &serde_json::Value) -> Document {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    common::write_notebook(&path, nb);
    Document::load(&path).unwrap()
}

#[cfg(test)]
mod html_tests {
    use super::*;

    #[test]
    fn test_page_carries_title_and_cells() {
        let nb = common::notebook(vec![
            common::markdown_cell("# Capturing traces"),
            common::code_cell_with_outputs(
                "capture()",
                vec![common::stream_output("stdout", "50 traces\n")],
            ),
        ]);
        let html = render_html(&load_fixture("PA_intro.ipynb", &nb));

        assert!(html.contains("<title>PA_intro</title>"));
        assert!(html.contains("<h1>PA_intro</h1>"));
        assert!(html.contains("<div class='markdown'># Capturing traces</div>"));
        assert!(html.contains("<pre class='code'>capture()</pre>"));
        assert!(html.contains("<pre class='output'>50 traces\n</pre>"));
    }

    #[test]
    fn test_source_is_escaped() {
        let nb = common::notebook(vec![common::code_cell("if a < b & c > d: pass")]);
        let html = render_html(&load_fixture("esc.ipynb", &nb));

        assert!(html.contains("if a &lt; b &amp; c &gt; d: pass"));
        assert!(!html.contains("if a < b & c > d"));
    }

    #[test]
    fn test_error_output_strips_ansi_from_tracebacks() {
        let nb = common::notebook(vec![common::code_cell_with_outputs(
            "boom()",
            vec![common::error_output(
                "ValueError",
                "bad trace",
                vec!["\u{1b}[0;31mValueError\u{1b}[0m: bad trace"],
            )],
        )]);
        let html = render_html(&load_fixture("err.ipynb", &nb));

        assert!(html.contains("<pre class='error'>ValueError: bad trace\nValueError: bad trace\n</pre>"));
        assert!(!html.contains("\u{1b}["));
    }

    #[test]
    fn test_rich_output_renders_only_plain_text() {
        let nb = common::notebook(vec![common::code_cell_with_outputs(
            "show()",
            vec![json!({
                "output_type": "execute_result",
                "execution_count": 1,
                "data": {
                    "text/plain": ["<Figure ", "at 0x7f>"],
                    "image/png": "iVBORw0..."
                },
                "metadata": {}
            })],
        )]);
        let html = render_html(&load_fixture("rich.ipynb", &nb));

        assert!(html.contains("&lt;Figure at 0x7f&gt;"));
        assert!(!html.contains("iVBORw0"));
    }
}

#[cfg(test)]
mod rst_tests {
    use super::*;

    #[test]
    fn test_title_is_underlined_to_its_length() {
        let nb = common::notebook(vec![]);
        let rst = render_rst(&load_fixture("PA_intro.ipynb", &nb));

        assert!(rst.starts_with("PA_intro\n========\n\n"));
    }

    #[test]
    fn test_code_cells_become_code_blocks() {
        let nb = common::notebook(vec![common::code_cell("x = 1\ny = 2")]);
        let rst = render_rst(&load_fixture("doc.ipynb", &nb));

        assert!(rst.contains(".. code:: python\n\n    x = 1\n    y = 2\n"));
    }

    #[test]
    fn test_markdown_passes_through_as_body_text() {
        let nb = common::notebook(vec![common::markdown_cell("Some prose.")]);
        let rst = render_rst(&load_fixture("doc.ipynb", &nb));

        assert!(rst.contains("Some prose.\n\n"));
        assert!(!rst.contains(".. code::"));
    }

    #[test]
    fn test_outputs_become_literal_blocks() {
        let nb = common::notebook(vec![common::code_cell_with_outputs(
            "capture()",
            vec![
                common::stream_output("stdout", "captured 50\n"),
                common::error_output("TimeoutError", "no trigger", vec!["tb line"]),
            ],
        )]);
        let rst = render_rst(&load_fixture("doc.ipynb", &nb));

        assert!(rst.contains("::\n\n    captured 50\n"));
        assert!(rst.contains("    TimeoutError: no trigger\n    tb line\n"));
    }
}

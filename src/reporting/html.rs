//! # HTML Rendering Module / HTML 渲染模块
//!
//! Renders an executed document into a standalone styled HTML page:
//! markdown cells as preformatted text, code cells with their captured
//! outputs and tracebacks.
//!
//! 将已执行的文档渲染为独立的带样式 HTML 页面：
//! markdown 单元格为预格式化文本，代码单元格带有捕获的输出和回溯。

use crate::core::document::{Cell, Document, Output};
use crate::core::runner::strip_ansi;

/// Embedded CSS for rendered documents / 渲染文档的嵌入式 CSS
const HTML_STYLE: &str = "\
body { font-family: sans-serif; margin: 2em auto; max-width: 60em; }\n\
pre { padding: 0.6em; overflow-x: auto; }\n\
pre.code { background: #f4f4f4; border-left: 4px solid #3572a5; }\n\
pre.output { background: #fbfbfb; border-left: 4px solid #cccccc; }\n\
pre.error { background: #fff2f2; border-left: 4px solid #c0392b; }\n\
div.markdown { white-space: pre-wrap; }\n";

/// Renders the executed document to a complete HTML page.
pub fn render_html(document: &Document) -> String {
    let title = escape_html(&document.file_stem());
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset='utf-8'>");
    html.push_str(&format!("<title>{}</title>", title));
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style></head><body>");
    html.push_str(&format!("<h1>{}</h1>", title));

    for cell in &document.cells {
        match cell {
            Cell::Markdown { source, .. } => {
                html.push_str(&format!(
                    "<div class='markdown'>{}</div>",
                    escape_html(source)
                ));
            }
            Cell::Code { source, outputs, .. } => {
                html.push_str(&format!("<pre class='code'>{}</pre>", escape_html(source)));
                for output in outputs {
                    render_output(&mut html, output);
                }
            }
            Cell::Raw { .. } => {}
        }
    }

    html.push_str("</body></html>");
    html
}

fn render_output(html: &mut String, output: &Output) {
    match output {
        Output::Stream { text, .. } => {
            html.push_str(&format!("<pre class='output'>{}</pre>", escape_html(text)));
        }
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
            html.push_str(&format!("<pre class='error'>{}</pre>", escape_html(&body)));
        }
        Output::ExecuteResult { data, .. } | Output::DisplayData { data, .. } => {
            if let Some(text) = plain_text(data) {
                html.push_str(&format!("<pre class='output'>{}</pre>", escape_html(&text)));
            }
        }
    }
}

/// Rich outputs carry a mime bundle; only the text/plain entry is rendered.
/// The entry is either a string or a list of line fragments.
pub(crate) fn plain_text(data: &serde_json::Value) -> Option<String> {
    match data.get("text/plain")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(parts) => {
            Some(parts.iter().filter_map(|v| v.as_str()).collect())
        }
        _ => None,
    }
}

/// Simple HTML escape function to replace special characters with their
/// HTML entities.
/// 简单的 HTML 转义函数，用 HTML 实体替换特殊字符。
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

//! # Reporting Module / 报告模块
//!
//! This module handles the console summary and the rendering of executed
//! documents into human-readable artifacts in two independent formats.
//!
//! 此模块处理控制台摘要，以及将已执行文档渲染为两种独立格式的
//! 人类可读产物。

pub mod console;
pub mod html;
pub mod rst;

// Re-export common reporting functions
pub use console::print_summary;
pub use html::render_html;
pub use rst::render_rst;

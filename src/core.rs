//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Tutorial Runner:
//! the document model, the declarative test plan, configuration matching,
//! document transformation and the execution pipeline.
//!
//! 此模块包含 Tutorial Runner 的核心功能：
//! 文档模型、声明式测试计划、配置匹配、文档转换和执行管道。

pub mod config;
pub mod document;
pub mod engine;
pub mod matcher;
pub mod params;
pub mod rewrite;
pub mod runner;
pub mod summary;

// Re-exports
pub use config::TestPlan;
pub use document::Document;
pub use runner::{RunOutcome, run_document};
pub use summary::Summary;

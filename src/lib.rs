//! # Tutorial Runner Library / Tutorial Runner 库
//!
//! This library provides the core functionality for the Tutorial Runner tool,
//! a configuration-driven test runner that executes parameterized notebook
//! tutorials against a matrix of connected hardware configurations.
//!
//! 此库为 Tutorial Runner 工具提供核心功能，
//! 这是一个配置驱动的测试运行器，针对已连接硬件配置矩阵执行参数化的 notebook 教程。
//!
//! ## Modules / 模块
//!
//! - `core` - Document model, configuration matching and the test pipeline
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Test result reporting and artifact rendering
//! - `cli` - Command-line interface
//! - `commands` - Command implementations
//!
//! - `core` - 文档模型、配置匹配和测试管道
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 测试结果报告和产物渲染
//! - `cli` - 命令行接口
//! - `commands` - 命令实现

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::document;
pub use crate::core::runner;
pub use crate::core::summary;

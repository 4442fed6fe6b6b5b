//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Tutorial Runner,
//! including subprocess execution, file system operations and the default
//! execution engine binding.
//!
//! 此模块为 Tutorial Runner 提供基础设施服务，
//! 包括子进程执行、文件系统操作和默认执行引擎绑定。

pub mod command;
pub mod engine;
pub mod fs;

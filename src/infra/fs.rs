//! # File System Operations Module / 文件系统操作模块
//!
//! Directory copying for artifact trees, best-effort cleanup of transient
//! working directories, and the scoped working-directory guard used around
//! document execution.
//!
//! 产物树的目录复制、瞬态工作目录的尽力清理，
//! 以及文档执行期间使用的作用域工作目录守卫。

use anyhow::{Context, Result};
use fs_extra::dir::{CopyOptions, copy};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Copies the entire content of a source directory into a destination
/// directory, overwriting existing files.
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)
        .with_context(|| format!("Failed to create directory: {}", to.display()))?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;
    copy(from, to, &options)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Removes a directory tree, treating absence as success. Used for the
/// transient working artifacts left behind by document executions.
pub fn remove_dir_ignore_missing(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove directory: {}", path.display()))
        }
    }
}

/// Scoped working-directory change. The previous directory is restored when
/// the guard drops, on every exit path: success, early return or error.
///
/// 作用域工作目录切换。守卫析构时恢复之前的目录，
/// 覆盖每条退出路径 —— 成功、提前返回或出错。
#[derive(Debug)]
pub struct WorkingDirGuard {
    saved: PathBuf,
}

impl WorkingDirGuard {
    pub fn enter(path: &Path) -> Result<Self> {
        let saved = env::current_dir().context("Failed to read current directory")?;
        env::set_current_dir(path)
            .with_context(|| format!("Failed to enter directory: {}", path.display()))?;
        Ok(Self { saved })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        // Restoration failure here is unrecoverable but must not panic
        // during unwinding.
        let _ = env::set_current_dir(&self.saved);
    }
}

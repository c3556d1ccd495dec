//! 构建/发布错误类型。
//!
//! 分类：
//! - 前置条件错误：入口文件或清单缺失（在产生任何输出之前报告）
//! - 外部工具错误：打包器退出码非零，原样携带其 stderr
//! - 文件系统/压缩错误：复制、写入、打包过程中的 IO 失败
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::PathBuf;

use gamecp_core::{ManifestError, VersionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("UI entry point not found: {}", .0.display())]
    UiEntryNotFound(PathBuf),
    #[error("Handlers entry point not found: {}", .0.display())]
    HandlersEntryNotFound(PathBuf),
    #[error("failed to launch bundler {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bundler failed on {} (exit code {code:?})\n{stderr}", .entry.display())]
    Bundler {
        entry: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    #[error("{label} watcher exited unexpectedly (exit code {code:?})")]
    WatcherExited { label: &'static str, code: Option<i32> },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl BuildError {
    /// 为 IO 错误附加上下文（用于 `map_err`）。
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> BuildError {
        let context = context.into();
        move |source| BuildError::Io { context, source }
    }
}

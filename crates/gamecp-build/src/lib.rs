//! GameCP 扩展构建库。
//!
//! 功能：
//! - 双包构建：浏览器 UI 包（React 外置）与隔离后端处理器包
//! - UI 包完整性摘要（`sha384-<base64>`）
//! - 监听模式：由 esbuild 子进程持续重建，直到收到中断信号
//! - 版本号递增与发布打包（暂存目录 + zip 压缩包）
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

pub mod bundler;
pub mod error;
pub mod esbuild;
pub mod release;
pub mod watch;

pub use bundler::{build_extension, BuildConfig, BuildResult, BundleJob, BundleTool, Platform};
pub use error::BuildError;
pub use esbuild::EsbuildCli;
pub use release::{bump_version, create_release, ReleaseArtifacts};
pub use watch::watch_extension;

//! 扩展目录内的统一路径约定。
//!
//! 目标：
//! - 将清单、构建产物、发布暂存目录与压缩包的命名集中管理
//! - 命令行与构建库共用同一套约定，避免各处硬编码
//!
//! 目录布局（扩展根目录下）：
//! - `gamecp.json`：清单
//! - `dist/`：构建产物（`index.js`、`handlers.js`）
//! - `release/`：发布暂存目录（每次发布重建）
//! - `<id>-v<version>.zip`：发布压缩包
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// 清单文件名。
pub const MANIFEST_FILE: &str = "gamecp.json";

/// 默认构建输出目录名。
pub const DEFAULT_OUT_DIR: &str = "dist";

/// UI 包文件名。
pub const UI_BUNDLE_FILE: &str = "index.js";

/// 后端处理器包文件名。
pub const HANDLERS_BUNDLE_FILE: &str = "handlers.js";

/// 发布暂存目录名。
pub const RELEASE_DIR: &str = "release";

/// 默认 UI 入口。
pub const DEFAULT_UI_ENTRY: &str = "src/index.tsx";

/// 默认后端处理器入口。
pub const DEFAULT_HANDLERS_ENTRY: &str = "src/handlers.ts";

/// 扩展根目录下的清单路径。
pub fn manifest_path(extension_dir: &Path) -> PathBuf {
    extension_dir.join(MANIFEST_FILE)
}

/// 扩展根目录下的发布暂存目录。
pub fn release_dir(extension_dir: &Path) -> PathBuf {
    extension_dir.join(RELEASE_DIR)
}

/// 发布压缩包文件名：`<id>-v<version>.zip`。
pub fn archive_file_name(id: &str, version: &str) -> String {
    format!("{id}-v{version}.zip")
}

/// 发布时需要复制到暂存目录的路径白名单（相对扩展根目录）。
///
/// 参数：
/// - `out_dir`：构建输出目录名（通常为 `dist`）
///
/// 返回值：
/// - 清单、README、包描述文件、构建输出目录、资源目录（按此顺序）
pub fn release_allow_list(out_dir: &str) -> [&str; 5] {
    [MANIFEST_FILE, "README.md", "package.json", out_dir, "assets"]
}

/// 确保目录存在（不存在则递归创建）。
///
/// 异常处理：
/// - 目录创建失败（权限、路径非法等）会返回错误。
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).with_context(|| format!("创建目录失败: {}", path.display()))?;
    Ok(())
}

/// 将命令行/配置中的路径解析为实际路径。
///
/// 参数：
/// - `base`：相对路径的基准目录（通常是当前工作目录或扩展根目录）
/// - `raw`：原始路径字符串
///
/// 返回值：
/// - `raw` 为绝对路径：直接返回
/// - `raw` 为相对路径：返回 `base.join(raw)`
///
/// 异常处理：
/// - `raw` 为空字符串时返回错误，避免误用导致写入基准目录本身。
pub fn resolve_path(base: &Path, raw: &str) -> Result<PathBuf> {
    if raw.is_empty() {
        return Err(anyhow!("空路径"));
    }
    let p = PathBuf::from(raw);
    if p.is_absolute() {
        Ok(p)
    } else {
        Ok(base.join(p))
    }
}

//! 双包构建流程。
//!
//! 产物（位于输出目录下）：
//! - `index.js`：UI 包，IIFE 格式、浏览器平台，`react`/`react-dom`/客户端类型模块外置
//! - `handlers.js`：后端处理器包，IIFE 格式、node 平台，扩展后端类型模块外置
//!
//! 流程：
//! 1) 检查两个入口文件都存在（任何输出产生之前）
//! 2) 依次执行 UI 包、处理器包的打包（串行）
//! 3) 读回两个产物，计算 UI 包的 SRI 摘要
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::{Path, PathBuf};

use gamecp_core::integrity::sri_sha384;
use gamecp_core::paths;
use serde::Serialize;
use tracing::info;

use crate::error::BuildError;

/// 两个产物共用的全局导出名。
pub const GLOBAL_NAME: &str = "ExtensionExports";

/// 两个产物共用的语法目标。
pub const TARGET: &str = "es2020";

/// UI 包始终外置的模块（由宿主页面提供）。
pub const UI_EXTERNALS: [&str; 3] = ["react", "react-dom", "@gamecp/types/client"];

/// 处理器包始终外置的模块（由隔离运行时提供）。
pub const HANDLERS_EXTERNALS: [&str; 3] = ["@gamecp/types", "react", "react-dom"];

/// 构建配置。
///
/// 说明：
/// - 路径均相对扩展根目录
/// - `ui_external` / `handlers_external` 追加在内置外置列表之后
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub ui_entry: String,
    pub handlers_entry: String,
    pub out_dir: String,
    pub ui_external: Vec<String>,
    pub handlers_external: Vec<String>,
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            ui_entry: paths::DEFAULT_UI_ENTRY.to_string(),
            handlers_entry: paths::DEFAULT_HANDLERS_ENTRY.to_string(),
            out_dir: paths::DEFAULT_OUT_DIR.to_string(),
            ui_external: Vec::new(),
            handlers_external: Vec::new(),
            minify: false,
        }
    }
}

impl BuildConfig {
    /// 构建输出目录的绝对路径。
    pub fn out_dir_path(&self, extension_dir: &Path) -> PathBuf {
        extension_dir.join(&self.out_dir)
    }

    /// 生成两个打包任务（UI 在前，处理器在后）。
    pub fn jobs(&self, extension_dir: &Path) -> [BundleJob; 2] {
        let out_dir = self.out_dir_path(extension_dir);
        let with_extra = |base: &[&str], extra: &[String]| -> Vec<String> {
            base.iter()
                .map(|s| s.to_string())
                .chain(extra.iter().cloned())
                .collect()
        };
        [
            BundleJob {
                label: "UI",
                entry: extension_dir.join(&self.ui_entry),
                outfile: out_dir.join(paths::UI_BUNDLE_FILE),
                platform: Platform::Browser,
                externals: with_extra(&UI_EXTERNALS, &self.ui_external),
                minify: self.minify,
            },
            BundleJob {
                label: "Handlers",
                entry: extension_dir.join(&self.handlers_entry),
                outfile: out_dir.join(paths::HANDLERS_BUNDLE_FILE),
                platform: Platform::Node,
                externals: with_extra(&HANDLERS_EXTERNALS, &self.handlers_external),
                minify: self.minify,
            },
        ]
    }
}

/// 打包目标平台。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Browser,
    Node,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Browser => "browser",
            Platform::Node => "node",
        }
    }
}

/// 单次打包任务。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleJob {
    /// 任务名（日志/错误信息中使用）。
    pub label: &'static str,
    pub entry: PathBuf,
    pub outfile: PathBuf,
    pub platform: Platform,
    pub externals: Vec<String>,
    pub minify: bool,
}

/// 打包工具抽象。
///
/// 约定：
/// - 实现方负责把 `job.entry` 打包为 `job.outfile`（IIFE、[`GLOBAL_NAME`]、[`TARGET`]）
/// - 失败时原样返回工具自身的错误，不做重试
pub trait BundleTool {
    fn bundle(&self, job: &BundleJob) -> Result<(), BuildError>;
}

/// 构建结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    pub ui_bundle_path: PathBuf,
    pub handlers_bundle_path: PathBuf,
    /// UI 包字节数。
    pub ui_bundle_size: u64,
    /// 处理器包字节数。
    pub handlers_bundle_size: u64,
    /// UI 包的 SRI 摘要（`sha384-<base64>`）。
    pub integrity_hash: String,
}

/// 构建扩展的两个产物。
///
/// 参数：
/// - `extension_dir`：扩展根目录
/// - `config`：构建配置
/// - `tool`：打包工具（生产环境为 [`crate::EsbuildCli`]）
///
/// 返回值：
/// - [`BuildResult`]：产物路径、字节数与 UI 包摘要
///
/// 异常处理：
/// - 任一入口文件不存在：立即返回错误，不创建输出目录、不调用打包工具
/// - 打包工具失败：原样向上返回
pub fn build_extension(
    extension_dir: &Path,
    config: &BuildConfig,
    tool: &dyn BundleTool,
) -> Result<BuildResult, BuildError> {
    let [ui_job, handlers_job] = config.jobs(extension_dir);

    if !ui_job.entry.is_file() {
        return Err(BuildError::UiEntryNotFound(ui_job.entry));
    }
    if !handlers_job.entry.is_file() {
        return Err(BuildError::HandlersEntryNotFound(handlers_job.entry));
    }

    let out_dir = config.out_dir_path(extension_dir);
    std::fs::create_dir_all(&out_dir)
        .map_err(BuildError::io(format!("创建输出目录失败: {}", out_dir.display())))?;

    for job in [&ui_job, &handlers_job] {
        tool.bundle(job)?;
        info!("✅ {} bundle built: {}", job.label, job.outfile.display());
    }

    let ui_content = read_artifact(&ui_job.outfile)?;
    let handlers_content = read_artifact(&handlers_job.outfile)?;
    let integrity_hash = sri_sha384(&ui_content);

    info!("📦 UI bundle: {} bytes", ui_content.len());
    info!("📦 Handlers bundle: {} bytes", handlers_content.len());
    info!("🔐 Integrity hash: {integrity_hash}");

    Ok(BuildResult {
        ui_bundle_path: ui_job.outfile,
        handlers_bundle_path: handlers_job.outfile,
        ui_bundle_size: ui_content.len() as u64,
        handlers_bundle_size: handlers_content.len() as u64,
        integrity_hash,
    })
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, BuildError> {
    std::fs::read(path).map_err(BuildError::io(format!("读取构建产物失败: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// 记录调用顺序并把入口原样复制为产物。
    #[derive(Default)]
    struct CopyTool {
        calls: RefCell<Vec<BundleJob>>,
    }

    impl BundleTool for CopyTool {
        fn bundle(&self, job: &BundleJob) -> Result<(), BuildError> {
            self.calls.borrow_mut().push(job.clone());
            std::fs::copy(&job.entry, &job.outfile).map_err(BuildError::io("copy"))?;
            Ok(())
        }
    }

    struct FailingTool;

    impl BundleTool for FailingTool {
        fn bundle(&self, job: &BundleJob) -> Result<(), BuildError> {
            Err(BuildError::Bundler {
                entry: job.entry.clone(),
                code: Some(1),
                stderr: "✘ [ERROR] Could not resolve \"lodash\"".to_string(),
            })
        }
    }

    /// 带 `src/` 的临时扩展目录。
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gamecp-bundler-{name}-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("src")).expect("create temp dir");
        dir
    }

    struct CleanupDir(PathBuf);

    impl Drop for CleanupDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn jobs_carry_platform_and_externals() {
        let config = BuildConfig {
            ui_external: vec!["lodash".into()],
            handlers_external: vec!["zod".into()],
            ..BuildConfig::default()
        };
        let [ui, handlers] = config.jobs(Path::new("/ext"));
        assert_eq!(ui.entry, PathBuf::from("/ext/src/index.tsx"));
        assert_eq!(ui.outfile, PathBuf::from("/ext/dist/index.js"));
        assert_eq!(ui.platform, Platform::Browser);
        assert_eq!(ui.externals, vec!["react", "react-dom", "@gamecp/types/client", "lodash"]);
        assert_eq!(handlers.outfile, PathBuf::from("/ext/dist/handlers.js"));
        assert_eq!(handlers.platform, Platform::Node);
        assert_eq!(handlers.externals, vec!["@gamecp/types", "react", "react-dom", "zod"]);
    }

    #[test]
    fn missing_entry_aborts_before_any_output() {
        let dir = scratch("missing-entry");
        let _cleanup = CleanupDir(dir.clone());
        std::fs::write(dir.join("src/index.tsx"), "export {}").unwrap();
        let tool = CopyTool::default();

        let err = build_extension(&dir, &BuildConfig::default(), &tool).unwrap_err();
        assert!(matches!(err, BuildError::HandlersEntryNotFound(_)));
        assert!(tool.calls.borrow().is_empty());
        assert!(!dir.join("dist").exists());
    }

    #[test]
    fn builds_ui_then_handlers_and_hashes_ui_only() {
        let dir = scratch("order");
        let _cleanup = CleanupDir(dir.clone());
        std::fs::write(dir.join("src/index.tsx"), "ui();").unwrap();
        std::fs::write(dir.join("src/handlers.ts"), "handlers();").unwrap();
        let tool = CopyTool::default();

        let result = build_extension(&dir, &BuildConfig::default(), &tool).unwrap();
        let labels: Vec<_> = tool.calls.borrow().iter().map(|j| j.label).collect();
        assert_eq!(labels, vec!["UI", "Handlers"]);
        assert_eq!(result.ui_bundle_size, 5);
        assert_eq!(result.handlers_bundle_size, 11);
        assert_eq!(result.integrity_hash, sri_sha384(b"ui();"));
    }

    #[test]
    fn bundler_failure_passes_through_unchanged() {
        let dir = scratch("failing");
        let _cleanup = CleanupDir(dir.clone());
        std::fs::write(dir.join("src/index.tsx"), "ui();").unwrap();
        std::fs::write(dir.join("src/handlers.ts"), "handlers();").unwrap();

        let err = build_extension(&dir, &BuildConfig::default(), &FailingTool).unwrap_err();
        match err {
            BuildError::Bundler { stderr, code, .. } => {
                assert_eq!(code, Some(1));
                assert!(stderr.contains("Could not resolve"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! `gamecp build`：校验清单后构建两个产物，可选监听模式。

use std::path::Path;

use anyhow::{Context, Result};
use gamecp_build::{build_extension, watch_extension, BuildConfig, BuildResult, EsbuildCli};
use gamecp_core::paths;
use tracing::info;

use super::validate;

/// 构建参数。
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub watch: bool,
    pub out_dir: String,
}

/// 在扩展根目录执行构建。
///
/// 参数：
/// - `extension_dir`：扩展根目录（当前工作目录）
/// - `options`：是否监听、输出目录
///
/// 异常处理：
/// - 清单校验不通过：打印全部错误后返回错误，不进行任何打包
/// - 打包失败：原样携带打包器输出返回
/// - 监听模式：创建 Tokio Runtime 失败或监听进程意外退出时返回错误
pub fn run(extension_dir: &Path, options: &BuildOptions) -> Result<()> {
    validate::check(&paths::manifest_path(extension_dir))?;

    let config = BuildConfig {
        out_dir: options.out_dir.clone(),
        ..BuildConfig::default()
    };
    let tool = EsbuildCli::locate(extension_dir);
    info!("打包器: {}", tool.program().display());

    if options.watch {
        let rt = tokio::runtime::Runtime::new().context("创建 Tokio Runtime 失败")?;
        rt.block_on(watch_extension(extension_dir, &config, &tool))
            .context("Build failed")?;
        info!("已停止监听");
        return Ok(());
    }

    info!("🔨 Building extension...");
    let result = build_extension(extension_dir, &config, &tool).context("Build failed")?;
    print_summary(&result);
    Ok(())
}

fn print_summary(result: &BuildResult) {
    println!("✓ Build completed successfully!");
    println!(
        "  UI bundle: {} ({} bytes)",
        result.ui_bundle_path.display(),
        result.ui_bundle_size
    );
    println!(
        "  Handlers bundle: {} ({} bytes)",
        result.handlers_bundle_path.display(),
        result.handlers_bundle_size
    );
    println!("  Integrity: {}", result.integrity_hash);
}

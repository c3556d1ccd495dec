//! 独立构建命令行（gamecp-build）。
//!
//! 用法：
//! - `gamecp-build` / `gamecp-build build`：构建到 `dist/`
//! - `gamecp-build version <major|minor|patch>`：递增清单版本号
//! - `gamecp-build release`：压缩构建、回写摘要、生成发布压缩包
//!
//! 所有子命令都作用于当前工作目录；参数错误或任一步骤失败时退出码为 1。
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gamecp_build::{build_extension, bump_version, create_release, BuildConfig, EsbuildCli};
use gamecp_core::version::{BumpKind, VersionError};
use tracing::info;

/// 命令行参数。
#[derive(Debug, Parser)]
#[command(
    name = "gamecp-build",
    version,
    about = "Build, version and package a GameCP extension in the current directory"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// 支持的子命令（缺省为 `build`）。
#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the UI and handlers bundles into dist/.
    Build,
    /// Bump the version in gamecp.json.
    Version {
        /// major, minor or patch
        #[arg(value_parser = parse_bump_kind)]
        kind: BumpKind,
    },
    /// Build minified bundles, record the integrity hash and create the release zip.
    Release,
}

fn parse_bump_kind(raw: &str) -> Result<BumpKind, VersionError> {
    raw.parse()
}

/// 程序入口：解析参数并分发子命令。
///
/// 异常处理：
/// - 参数错误：输出用法并以退出码 1 结束
/// - 子命令失败：返回 `Err`，由运行时打印错误并以退出码 1 结束
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let cwd = std::env::current_dir().context("读取当前工作目录失败")?;
    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => build(&cwd),
        Commands::Version { kind } => {
            bump_version(&cwd, kind).context("版本号递增失败")?;
            Ok(())
        }
        Commands::Release => release(&cwd),
    }
}

fn build(dir: &Path) -> Result<()> {
    info!("🔨 Building extension...");
    let tool = EsbuildCli::locate(dir);
    build_extension(dir, &BuildConfig::default(), &tool).context("Build failed")?;
    info!("✅ Build complete!");
    info!("💡 Tip: run `gamecp-build release` to record the integrity hash in gamecp.json");
    Ok(())
}

fn release(dir: &Path) -> Result<()> {
    let tool = EsbuildCli::locate(dir);
    let artifacts = create_release(dir, &BuildConfig::default(), &tool).context("Release failed")?;
    println!("{}", artifacts.archive_path.display());
    Ok(())
}

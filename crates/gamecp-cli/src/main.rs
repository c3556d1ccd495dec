//! GameCP 扩展开发命令行（gamecp）。
//!
//! 子命令：
//! - `init [name]`：交互式创建扩展工程
//! - `build [--watch] [--outdir <d>]`：校验清单后构建
//! - `validate [--manifest <file>]`：校验清单并输出报告
//! - `dev`：校验后进入监听构建
//!
//! 参数错误或任一子命令失败时退出码为 1。
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

mod commands;
mod prompts;
mod scaffold;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gamecp_core::paths;

use commands::build::BuildOptions;
use commands::init::InitOptions;

/// 命令行参数。
#[derive(Debug, Parser)]
#[command(name = "gamecp", version, about = "CLI tool for developing GameCP extensions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialize a new GameCP extension
    Init {
        /// Extension name
        name: Option<String>,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        dir: String,
        /// Template to use
        #[arg(short, long, default_value = "basic")]
        template: String,
        /// Accept all defaults without prompting
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
    /// Build the extension for production
    Build {
        /// Watch mode
        #[arg(short, long, default_value_t = false)]
        watch: bool,
        /// Output directory
        #[arg(short, long, default_value = paths::DEFAULT_OUT_DIR)]
        outdir: String,
    },
    /// Validate extension manifest
    Validate {
        /// Manifest file path
        #[arg(short, long, default_value = paths::MANIFEST_FILE)]
        manifest: String,
    },
    /// Start development mode with watch and validation
    Dev,
}

/// 程序入口：初始化日志、解析参数并分发子命令。
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
    match cli.command {
        Commands::Init {
            name,
            dir,
            template,
            yes,
        } => {
            let parent = paths::resolve_path(&cwd, &dir)?;
            commands::init::run(&parent, &InitOptions { name, template, yes })
        }
        Commands::Build { watch, outdir } => commands::build::run(
            &cwd,
            &BuildOptions {
                watch,
                out_dir: outdir,
            },
        ),
        Commands::Validate { manifest } => {
            let path = paths::resolve_path(&cwd, &manifest)?;
            commands::validate::run(&path)
        }
        Commands::Dev => commands::dev::run(&cwd),
    }
}

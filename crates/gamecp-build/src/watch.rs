//! 监听模式：先完整构建一次，再由两个 esbuild 子进程持续增量重建。
//!
//! 生命周期：
//! - 进程一直运行，直到收到中断信号（Ctrl-C）；此时结束两个子进程并返回
//! - 任一监听子进程自行退出视为打包器失败
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::Path;

use tokio::process::Child;
use tracing::{info, warn};

use crate::bundler::{build_extension, BuildConfig, BuildResult, BundleJob};
use crate::error::BuildError;
use crate::esbuild::EsbuildCli;

/// 以监听模式构建扩展。
///
/// 参数：
/// - `extension_dir`：扩展根目录
/// - `config`：构建配置
/// - `tool`：esbuild 驱动
///
/// 返回值：
/// - 收到中断信号后返回首次构建的结果
///
/// 异常处理：
/// - 首次构建失败直接返回错误，不进入监听
/// - 监听子进程启动失败或意外退出返回错误（其余子进程随 `kill_on_drop` 一并结束）
pub async fn watch_extension(
    extension_dir: &Path,
    config: &BuildConfig,
    tool: &EsbuildCli,
) -> Result<BuildResult, BuildError> {
    let initial = build_extension(extension_dir, config, tool)?;

    let [ui_job, handlers_job] = config.jobs(extension_dir);
    let mut ui = spawn_watcher(tool, &ui_job)?;
    let mut handlers = spawn_watcher(tool, &handlers_job)?;
    info!("👀 Watching for changes... (Ctrl-C to stop)");

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(BuildError::io("监听中断信号失败"))?;
            info!("收到中断信号，停止监听");
        }
        status = ui.wait() => {
            return Err(watcher_exited(ui_job.label, status));
        }
        status = handlers.wait() => {
            return Err(watcher_exited(handlers_job.label, status));
        }
    }

    for (label, child) in [(ui_job.label, &mut ui), (handlers_job.label, &mut handlers)] {
        if let Err(e) = child.kill().await {
            warn!("结束 {label} 监听进程失败: {e}");
        }
    }
    Ok(initial)
}

fn spawn_watcher(tool: &EsbuildCli, job: &BundleJob) -> Result<Child, BuildError> {
    tool.watch_command(job)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BuildError::Spawn {
            program: tool.program().to_path_buf(),
            source,
        })
}

fn watcher_exited(
    label: &'static str,
    status: std::io::Result<std::process::ExitStatus>,
) -> BuildError {
    match status {
        Ok(status) => BuildError::WatcherExited {
            label,
            code: status.code(),
        },
        Err(e) => BuildError::Io {
            context: format!("等待 {label} 监听进程失败"),
            source: e,
        },
    }
}

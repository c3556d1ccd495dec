//! esbuild 命令行驱动。
//!
//! 可执行文件定位顺序：
//! 1) 环境变量 `GAMECP_ESBUILD`
//! 2) 扩展目录下的 `node_modules/.bin/esbuild`
//! 3) `PATH` 中的 `esbuild`
//!
//! 参数约定：入口文件总是第一个参数，其余为 `--flag=value` 形式。
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::bundler::{BundleJob, BundleTool, GLOBAL_NAME, TARGET};
use crate::error::BuildError;

/// 覆盖 esbuild 可执行文件路径的环境变量。
pub const ESBUILD_ENV: &str = "GAMECP_ESBUILD";

/// esbuild 命令行打包器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsbuildCli {
    program: PathBuf,
}

impl EsbuildCli {
    /// 使用指定的可执行文件。
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 按约定顺序定位 esbuild。
    ///
    /// 参数：
    /// - `extension_dir`：扩展根目录（用于查找本地安装的 esbuild）
    pub fn locate(extension_dir: &Path) -> Self {
        if let Some(program) = std::env::var_os(ESBUILD_ENV).filter(|v| !v.is_empty()) {
            return Self::new(program);
        }
        let local_name = if cfg!(windows) { "esbuild.cmd" } else { "esbuild" };
        let local = extension_dir.join("node_modules").join(".bin").join(local_name);
        if local.is_file() {
            return Self::new(local);
        }
        Self::new("esbuild")
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// 生成一次打包的命令行参数。
    ///
    /// 参数：
    /// - `job`：打包任务
    /// - `watch`：是否追加 `--watch=forever`（stdin 关闭时也不退出）
    pub fn args(job: &BundleJob, watch: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            job.entry.clone().into_os_string(),
            "--bundle".into(),
            flag("outfile", job.outfile.as_os_str()),
            "--format=iife".into(),
            format!("--global-name={GLOBAL_NAME}").into(),
            format!("--platform={}", job.platform.as_str()).into(),
            format!("--target={TARGET}").into(),
        ];
        args.extend(job.externals.iter().map(|m| OsString::from(format!("--external:{m}"))));
        if job.minify {
            args.push("--minify".into());
        }
        if watch {
            args.push("--watch=forever".into());
        }
        args
    }

    /// 一次性打包命令。
    pub fn command(&self, job: &BundleJob) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::args(job, false));
        cmd
    }

    /// 监听模式命令（异步子进程）。
    pub fn watch_command(&self, job: &BundleJob) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(Self::args(job, true));
        cmd
    }
}

impl BundleTool for EsbuildCli {
    /// 执行 esbuild 并检查退出码。
    ///
    /// 异常处理：
    /// - 进程启动失败返回 [`BuildError::Spawn`]
    /// - 退出码非零返回 [`BuildError::Bundler`]，携带 esbuild 原始 stderr
    fn bundle(&self, job: &BundleJob) -> Result<(), BuildError> {
        debug!(program = %self.program.display(), entry = %job.entry.display(), "running esbuild");
        let out = self
            .command(job)
            .output()
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if out.status.success() {
            return Ok(());
        }
        Err(BuildError::Bundler {
            entry: job.entry.clone(),
            code: out.status.code(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

fn flag(name: &str, value: &std::ffi::OsStr) -> OsString {
    let mut s = OsString::from(format!("--{name}="));
    s.push(value);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::BuildConfig;

    #[test]
    fn args_put_entry_first_and_mark_externals() {
        let config = BuildConfig {
            minify: true,
            ..BuildConfig::default()
        };
        let [ui, handlers] = config.jobs(Path::new("/ext"));

        let args: Vec<String> = EsbuildCli::args(&ui, false)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args[0], "/ext/src/index.tsx");
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--outfile=/ext/dist/index.js".to_string()));
        assert!(args.contains(&"--format=iife".to_string()));
        assert!(args.contains(&"--global-name=ExtensionExports".to_string()));
        assert!(args.contains(&"--platform=browser".to_string()));
        assert!(args.contains(&"--target=es2020".to_string()));
        assert!(args.contains(&"--external:@gamecp/types/client".to_string()));
        assert!(args.contains(&"--minify".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--watch")));

        let watch: Vec<String> = EsbuildCli::args(&handlers, true)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(watch.contains(&"--platform=node".to_string()));
        assert!(watch.contains(&"--external:@gamecp/types".to_string()));
        assert_eq!(watch.last().map(String::as_str), Some("--watch=forever"));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let tool = EsbuildCli::new("/definitely/not/a/real/esbuild");
        let [ui, _] = BuildConfig::default().jobs(Path::new("/ext"));
        assert!(matches!(tool.bundle(&ui), Err(BuildError::Spawn { .. })));
    }
}

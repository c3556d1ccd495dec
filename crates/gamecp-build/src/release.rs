//! 版本号递增与发布打包。
//!
//! 发布流程（无回滚）：
//! 1) 读取清单中的 id/version
//! 2) 以压缩模式构建两个产物，并把 UI 包摘要回写到清单 `integrity`
//! 3) 重建 `release/` 暂存目录，按白名单复制清单/README/包描述/构建产物/资源
//! 4) 将暂存目录（不含外层目录）压缩为 `<id>-v<version>.zip`（deflate 9 级）
//!
//! 若第 4 步失败，暂存目录保留在磁盘上，内容完整但尚未压缩。
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::fs::File;
use std::path::{Path, PathBuf};

use gamecp_core::manifest_file::{read_manifest_value, required_str, write_manifest};
use gamecp_core::validate::is_truthy;
use gamecp_core::version::{BumpKind, Version, VersionError};
use gamecp_core::{paths, ManifestError};
use serde_json::Value;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::bundler::{build_extension, BuildConfig, BuildResult, BundleTool};
use crate::error::BuildError;

/// 清单缺少版本号时的起始版本。
const INITIAL_VERSION: &str = "0.0.0";

/// 发布产物。
#[derive(Debug, Clone)]
pub struct ReleaseArtifacts {
    /// 暂存目录（`release/`）。
    pub staging_dir: PathBuf,
    /// 压缩包路径（`<id>-v<version>.zip`）。
    pub archive_path: PathBuf,
    /// 压缩模式构建结果。
    pub build: BuildResult,
}

/// 递增清单中的版本号并写回。
///
/// 参数：
/// - `extension_dir`：扩展根目录
/// - `kind`：递增类型
///
/// 返回值：
/// - 新版本号文本
///
/// 异常处理：
/// - 清单不存在 / 解析失败 / 顶层不是对象：返回清单错误
/// - 版本号缺失或为假值（`null`/`false`/`0`/`""`）：按 `0.0.0` 递增
/// - 版本号不以三段数字开头：返回 [`VersionError::Malformed`]
/// - 被递增的一段溢出：返回 [`VersionError::Overflow`]
pub fn bump_version(extension_dir: &Path, kind: BumpKind) -> Result<String, BuildError> {
    let manifest_path = paths::manifest_path(extension_dir);
    let mut manifest = read_manifest_value(&manifest_path)?;
    let obj = manifest.as_object_mut().ok_or(ManifestError::NotAnObject)?;

    let current = match obj.get("version").filter(|v| is_truthy(v)) {
        None => INITIAL_VERSION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(VersionError::Malformed(other.to_string()).into()),
    };
    let next = Version::parse(&current)?.bump(kind)?.to_string();
    obj.insert("version".to_string(), Value::String(next.clone()));

    write_manifest(&manifest_path, &manifest)?;
    info!("✅ Version bumped: {current} → {next}");
    Ok(next)
}

/// 构建并打包发布产物。
///
/// 参数：
/// - `extension_dir`：扩展根目录
/// - `config`：构建配置（`minify` 会被强制开启）
/// - `tool`：打包工具
///
/// 返回值：
/// - [`ReleaseArtifacts`]：暂存目录、压缩包路径与构建结果
///
/// 异常处理：
/// - 清单缺失或缺少 id/version：在构建之前返回错误
/// - 构建/复制/压缩失败：原样向上返回，不回滚已完成的步骤
pub fn create_release(
    extension_dir: &Path,
    config: &BuildConfig,
    tool: &dyn BundleTool,
) -> Result<ReleaseArtifacts, BuildError> {
    let manifest_path = paths::manifest_path(extension_dir);
    let mut manifest = read_manifest_value(&manifest_path)?;
    let id = required_str(&manifest, "id")?.to_string();
    let version = required_str(&manifest, "version")?.to_string();

    info!("📦 Creating release for {id} v{version}...");

    let release_config = BuildConfig {
        minify: true,
        ..config.clone()
    };
    let build = build_extension(extension_dir, &release_config, tool)?;

    manifest
        .as_object_mut()
        .ok_or(ManifestError::NotAnObject)?
        .insert(
            "integrity".to_string(),
            Value::String(build.integrity_hash.clone()),
        );
    write_manifest(&manifest_path, &manifest)?;
    info!("✅ Updated integrity hash in {}", paths::MANIFEST_FILE);

    let staging_dir = paths::release_dir(extension_dir);
    if staging_dir.exists() {
        std::fs::remove_dir_all(&staging_dir)
            .map_err(BuildError::io(format!("删除旧暂存目录失败: {}", staging_dir.display())))?;
    }
    std::fs::create_dir_all(&staging_dir)
        .map_err(BuildError::io(format!("创建暂存目录失败: {}", staging_dir.display())))?;

    for name in paths::release_allow_list(&config.out_dir) {
        let src = extension_dir.join(name);
        if src.exists() {
            copy_recursively(&src, &staging_dir.join(name))?;
            info!("✅ Copied {name}");
        }
    }
    info!("📦 Release prepared in: {}", staging_dir.display());

    let archive_path = extension_dir.join(paths::archive_file_name(&id, &version));
    zip_directory(&staging_dir, &archive_path)?;
    info!("📦 Zip created: {}", archive_path.display());
    info!("🎉 Extension {id} v{version} is ready for distribution!");

    Ok(ReleaseArtifacts {
        staging_dir,
        archive_path,
        build,
    })
}

/// 递归复制文件/目录。
///
/// 异常处理：
/// - 读目录/创建目录/复制文件失败会返回错误
fn copy_recursively(src: &Path, dst: &Path) -> Result<(), BuildError> {
    if src.is_file() {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)
                .map_err(BuildError::io(format!("创建目录失败: {}", parent.display())))?;
        }
        std::fs::copy(src, dst).map_err(BuildError::io(format!(
            "复制文件失败: {} -> {}",
            src.display(),
            dst.display()
        )))?;
        return Ok(());
    }

    std::fs::create_dir_all(dst)
        .map_err(BuildError::io(format!("创建目录失败: {}", dst.display())))?;
    for entry in sorted_entries(src)? {
        let to = dst.join(entry.file_name().unwrap_or_default());
        copy_recursively(&entry, &to)?;
    }
    Ok(())
}

/// 将目录内容（不含目录本身）压缩为 zip，已存在则覆盖。
fn zip_directory(src_dir: &Path, archive_path: &Path) -> Result<(), BuildError> {
    let archive_err = |source: zip::result::ZipError| BuildError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };
    let file = File::create(archive_path)
        .map_err(BuildError::io(format!("创建压缩包失败: {}", archive_path.display())))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut pending = vec![src_dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for path in sorted_entries(&dir)? {
            let name = entry_name(src_dir, &path);
            if path.is_dir() {
                writer
                    .add_directory(format!("{name}/"), options)
                    .map_err(archive_err)?;
                pending.push(path);
            } else {
                writer.start_file(name, options).map_err(archive_err)?;
                let mut input = File::open(&path)
                    .map_err(BuildError::io(format!("读取文件失败: {}", path.display())))?;
                std::io::copy(&mut input, &mut writer)
                    .map_err(BuildError::io(format!("写入压缩包失败: {}", path.display())))?;
            }
        }
    }
    writer.finish().map_err(archive_err)?;
    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let read_err = || BuildError::io(format!("读取目录失败: {}", dir.display()));
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err())? {
        entries.push(entry.map_err(read_err())?.path());
    }
    entries.sort();
    Ok(entries)
}

/// 压缩包内的条目名：相对暂存目录、以 `/` 分隔。
fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

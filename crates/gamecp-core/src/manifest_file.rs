//! 清单文件读写。
//!
//! 读取时保留未知字段与字段顺序（以 `serde_json::Value` 形式），
//! 使版本递增/发布回写不会丢失作者自定义的内容。
//!
//! 写入格式：2 空格缩进的 JSON，结尾带换行。
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// 清单读写错误。
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("gamecp.json not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("manifest is not a JSON object")]
    NotAnObject,
    #[error("manifest field \"{0}\" is missing or not a string")]
    MissingField(&'static str),
}

/// 读取并解析清单为原始 JSON 值。
///
/// 参数：
/// - `path`：清单文件路径
///
/// 异常处理：
/// - 文件不存在返回 [`ManifestError::NotFound`]（调用方据此区分“缺文件”与“坏 JSON”）
/// - 读取失败 / JSON 解析失败分别返回 `Read` / `Parse`
pub fn read_manifest_value(path: &Path) -> Result<Value, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 以统一格式写回清单。
///
/// 参数：
/// - `path`：目标文件路径
/// - `manifest`：任意可序列化的清单表示（原始值或类型化清单）
pub fn write_manifest<T: Serialize + ?Sized>(path: &Path, manifest: &T) -> Result<(), ManifestError> {
    let mut text = serde_json::to_string_pretty(manifest)?;
    text.push('\n');
    std::fs::write(path, text).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// 读取清单中的字符串字段（缺失或类型不符时报错）。
pub fn required_str<'a>(manifest: &'a Value, field: &'static str) -> Result<&'a str, ManifestError> {
    manifest
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(ManifestError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    struct CleanupDir(PathBuf);

    impl Drop for CleanupDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = unique_temp_dir("gamecp-core-missing");
        let _cleanup = CleanupDir(dir.clone());
        let path = dir.join("gamecp.json");
        assert!(matches!(
            read_manifest_value(&path),
            Err(ManifestError::NotFound(_))
        ));
    }

    #[test]
    fn write_keeps_field_order_and_trailing_newline() {
        let dir = unique_temp_dir("gamecp-core-order");
        let _cleanup = CleanupDir(dir.clone());
        let path = dir.join("gamecp.json");
        let value = json!({ "zeta": 1, "id": "x", "alpha": { "b": 1, "a": 2 } });
        write_manifest(&path, &value).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
        assert!(text.contains("\n  \"id\": \"x\""));

        let back = read_manifest_value(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn bad_json_is_parse_error() {
        let dir = unique_temp_dir("gamecp-core-badjson");
        let _cleanup = CleanupDir(dir.clone());
        let path = dir.join("gamecp.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_manifest_value(&path),
            Err(ManifestError::Parse { .. })
        ));
    }

    #[test]
    fn required_str_rejects_missing_and_non_string() {
        let v = json!({ "id": "demo", "version": 3 });
        assert_eq!(required_str(&v, "id").unwrap(), "demo");
        assert!(matches!(
            required_str(&v, "version"),
            Err(ManifestError::MissingField("version"))
        ));
    }
}

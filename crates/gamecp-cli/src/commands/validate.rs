//! `gamecp validate`：校验清单并输出报告。

use std::path::Path;

use anyhow::{bail, Result};
use gamecp_core::manifest_file::read_manifest_value;
use gamecp_core::{validate_manifest, ManifestError};
use serde_json::Value;

/// 校验指定清单并打印完整报告（扩展信息、权限、定时任务数量、警告）。
///
/// 异常处理：
/// - 文件缺失、JSON 无效、校验失败分别输出不同信息，并返回错误（退出码 1）
pub fn run(manifest_path: &Path) -> Result<()> {
    println!("\n🔍 Validating GameCP Extension\n");
    let (manifest, warnings) = check(manifest_path)?;

    println!("✓ Manifest is valid");
    println!(
        "  Extension: {} v{}",
        text(&manifest, "name"),
        text(&manifest, "version")
    );
    println!("  ID: {}", text(&manifest, "id"));
    let permissions = list(&manifest, "permissions");
    if !permissions.is_empty() {
        let names: Vec<String> = permissions.iter().map(display).collect();
        println!("  Permissions: {}", names.join(", "));
    }
    let cron = list(&manifest, "cron");
    if !cron.is_empty() {
        println!("  Cron schedules: {}", cron.len());
    }
    print_warnings(&warnings);
    println!();
    Ok(())
}

/// 读取并校验清单，失败时把原因打印到 stderr。
///
/// 返回值：
/// - 通过校验的原始清单与警告列表
pub fn check(manifest_path: &Path) -> Result<(Value, Vec<String>)> {
    let value = match read_manifest_value(manifest_path) {
        Ok(value) => value,
        Err(ManifestError::NotFound(_)) => {
            eprintln!("✗ Manifest file not found: {}\n", manifest_path.display());
            bail!("manifest file not found: {}", manifest_path.display());
        }
        Err(ManifestError::Parse { source, .. }) => {
            eprintln!("✗ Invalid JSON in manifest file\n");
            eprintln!("  {source}\n");
            bail!("invalid JSON in {}", manifest_path.display());
        }
        Err(e) => return Err(e.into()),
    };

    let result = validate_manifest(&value);
    if !result.valid {
        eprintln!("✗ Manifest validation failed\n");
        for error in &result.errors {
            eprintln!("  • {error}");
        }
        eprintln!();
        bail!("manifest validation failed ({} error(s))", result.errors.len());
    }
    Ok((value, result.warnings))
}

pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n  Warnings:");
    for warning in warnings {
        println!("  ⚠ {warning}");
    }
}

fn text<'a>(manifest: &'a Value, key: &str) -> &'a str {
    manifest.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// 可选列表字段；缺失或不是数组时视为空。
fn list<'a>(manifest: &'a Value, key: &str) -> &'a [Value] {
    manifest
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_helpers_tolerate_falsy_optional_fields() {
        let m = json!({ "id": "x", "permissions": null, "cron": false, "tags": "x" });
        assert_eq!(text(&m, "id"), "x");
        assert_eq!(text(&m, "name"), "");
        assert!(list(&m, "permissions").is_empty());
        assert!(list(&m, "cron").is_empty());
    }

    #[test]
    fn permissions_render_as_plain_text() {
        let m = json!({ "permissions": ["server:read", "user:read"] });
        let names: Vec<String> = list(&m, "permissions").iter().map(display).collect();
        assert_eq!(names, vec!["server:read", "user:read"]);
    }
}

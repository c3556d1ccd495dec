//! 清单校验：对任意 JSON 值执行一次性、不短路的结构校验。
//!
//! 校验规则以数据表形式给出（字段、是否必填、类型、细化约束），
//! 校验过程是对规则表的一次折叠：
//! - 必填字段（id/name/version/description/author.name/main）无条件检查
//! - 可选列表字段（permissions/cron/ui/settings）仅在出现时逐元素检查，错误信息携带下标
//! - 警告（icon/homepage/license）只做提示，不影响 `valid`
//!
//! 约定：
//! - “缺失”沿用清单作者的真值约定：字段不存在、`null`、`false`、`0`、`""` 均视为缺失
//! - 顶层不是 JSON 对象时只返回一条错误，不再做字段检查
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::manifest::{ExtensionManifest, Permission};

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("id pattern"));

static SEMVER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+").expect("semver pattern"));

/// 5 段 cron：分(0-59) 时(0-23) 日(1-31) 月(1-12) 周(0-6)，每段为 `*`、数字或 `*/n`。
static CRON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(\*|([0-9]|[1-5][0-9])|\*/([0-9]|[1-5][0-9])) ",
        r"(\*|([0-9]|1[0-9]|2[0-3])|\*/([0-9]|1[0-9]|2[0-3])) ",
        r"(\*|([1-9]|[12][0-9]|3[01])|\*/([1-9]|[12][0-9]|3[01])) ",
        r"(\*|([1-9]|1[0-2])|\*/([1-9]|1[0-2])) ",
        r"(\*|[0-6]|\*/[0-6])$",
    ))
    .expect("cron pattern")
});

/// 顶层不是对象时的唯一错误。
pub const NOT_AN_OBJECT: &str = "Manifest must be a JSON object";

/// 校验结果。
///
/// 说明：
/// - `errors` 非空时 `valid` 必为 `false`
/// - `warnings` 仅为提示信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// 字段细化约束：类型正确之后的取值检查。
struct Refinement {
    accepts: fn(&str) -> bool,
    message: &'static str,
}

/// 必填字段的形状。
enum Shape {
    Text(Option<Refinement>),
    Object(&'static [FieldRule]),
}

/// 单条必填字段规则。
struct FieldRule {
    key: &'static str,
    shape: Shape,
}

/// 列表元素规则。
enum ItemRule {
    /// 元素必须是合法权限。
    Permission,
    /// 元素必须带 `expression` 且满足 cron 语法。
    Cron,
    /// 元素必须带齐给定键。
    RequiredKeys {
        keys: &'static [&'static str],
        noun: &'static str,
    },
}

/// 可选列表字段规则。
struct ListRule {
    key: &'static str,
    item: ItemRule,
}

const AUTHOR_FIELDS: &[FieldRule] = &[FieldRule {
    key: "name",
    shape: Shape::Text(None),
}];

const REQUIRED_FIELDS: &[FieldRule] = &[
    FieldRule {
        key: "id",
        shape: Shape::Text(Some(Refinement {
            accepts: is_kebab_id,
            message: "Field \"id\" must be lowercase alphanumeric with hyphens only",
        })),
    },
    FieldRule {
        key: "name",
        shape: Shape::Text(None),
    },
    FieldRule {
        key: "version",
        shape: Shape::Text(Some(Refinement {
            accepts: has_semver_prefix,
            message: "Field \"version\" must follow semver format (e.g., 1.0.0)",
        })),
    },
    FieldRule {
        key: "description",
        shape: Shape::Text(None),
    },
    FieldRule {
        key: "author",
        shape: Shape::Object(AUTHOR_FIELDS),
    },
    FieldRule {
        key: "main",
        shape: Shape::Text(None),
    },
];

const LIST_FIELDS: &[ListRule] = &[
    ListRule {
        key: "permissions",
        item: ItemRule::Permission,
    },
    ListRule {
        key: "cron",
        item: ItemRule::Cron,
    },
    ListRule {
        key: "ui",
        item: ItemRule::RequiredKeys {
            keys: &["location", "component"],
            noun: "UI injection",
        },
    },
    ListRule {
        key: "settings",
        item: ItemRule::RequiredKeys {
            keys: &["key", "label", "type"],
            noun: "setting",
        },
    },
];

/// 判断扩展 id 是否为 kebab-case（`^[a-z0-9-]+$`）。
pub fn is_kebab_id(s: &str) -> bool {
    ID_PATTERN.is_match(s)
}

/// 判断版本号是否以 `\d+.\d+.\d+` 开头。
pub fn has_semver_prefix(s: &str) -> bool {
    SEMVER_PREFIX.is_match(s)
}

/// 判断 cron 表达式是否符合 5 段语法。
pub fn is_valid_cron(expression: &str) -> bool {
    CRON_PATTERN.is_match(expression)
}

/// 校验任意 JSON 值是否为合法清单。
///
/// 参数：
/// - `manifest`：已解析的 JSON 值（可以是任意形状）
///
/// 返回值：
/// - [`ValidationResult`]：所有违规项一次性收集；该函数不会 panic
pub fn validate_manifest(manifest: &Value) -> ValidationResult {
    let Some(obj) = manifest.as_object() else {
        return ValidationResult::from_parts(vec![NOT_AN_OBJECT.to_string()], Vec::new());
    };

    let mut errors = Vec::new();
    check_required(obj, REQUIRED_FIELDS, "", &mut errors);

    for rule in LIST_FIELDS {
        let Some(value) = present(obj, rule.key) else {
            continue;
        };
        let Some(items) = value.as_array() else {
            errors.push(format!("Field \"{}\" must be an array", rule.key));
            continue;
        };
        for (index, item) in items.iter().enumerate() {
            check_item(&rule.item, index, item, &mut errors);
        }
    }

    let warnings = collect_warnings(obj);
    debug!(errors = errors.len(), warnings = warnings.len(), "清单校验完成");
    ValidationResult::from_parts(errors, warnings)
}

/// 快捷判断：清单是否通过校验。
pub fn is_valid_manifest(manifest: &Value) -> bool {
    validate_manifest(manifest).valid
}

/// 校验并反序列化为类型化清单。
///
/// 返回值：
/// - 成功：类型化清单与警告列表
/// - 失败：校验结果（包含全部错误）；若结构校验通过但可选字段类型与模型不符，
///   额外追加一条 `Manifest does not match schema` 错误
pub fn parse_manifest(manifest: &Value) -> Result<(ExtensionManifest, Vec<String>), ValidationResult> {
    let mut result = validate_manifest(manifest);
    if !result.valid {
        return Err(result);
    }
    match serde_json::from_value::<ExtensionManifest>(manifest.clone()) {
        Ok(parsed) => Ok((parsed, result.warnings)),
        Err(e) => {
            result.errors.push(format!("Manifest does not match schema: {e}"));
            result.valid = false;
            Err(result)
        }
    }
}

fn check_required(
    obj: &Map<String, Value>,
    rules: &[FieldRule],
    prefix: &str,
    errors: &mut Vec<String>,
) {
    for rule in rules {
        let path = if prefix.is_empty() {
            rule.key.to_string()
        } else {
            format!("{prefix}.{}", rule.key)
        };
        let Some(value) = present(obj, rule.key) else {
            errors.push(format!("Missing required field: {path}"));
            continue;
        };
        match &rule.shape {
            Shape::Text(refinement) => match value.as_str() {
                None => errors.push(format!("Field \"{path}\" must be a string")),
                Some(text) => {
                    if let Some(r) = refinement {
                        if !(r.accepts)(text) {
                            errors.push(r.message.to_string());
                        }
                    }
                }
            },
            Shape::Object(children) => match value.as_object() {
                None => errors.push(format!("Field \"{path}\" must be an object")),
                Some(inner) => check_required(inner, children, &path, errors),
            },
        }
    }
}

fn check_item(rule: &ItemRule, index: usize, item: &Value, errors: &mut Vec<String>) {
    match rule {
        ItemRule::Permission => {
            let known = item
                .as_str()
                .is_some_and(|s| s.parse::<Permission>().is_ok());
            if !known {
                errors.push(format!(
                    "Invalid permission at index {index}: \"{}\"",
                    render(item)
                ));
            }
        }
        ItemRule::Cron => match item.as_object().and_then(|o| present(o, "expression")) {
            None => errors.push(format!(
                "Missing \"expression\" in cron schedule at index {index}"
            )),
            Some(expr) => {
                if !expr.as_str().is_some_and(is_valid_cron) {
                    errors.push(format!(
                        "Invalid cron expression at index {index}: \"{}\"",
                        render(expr)
                    ));
                }
            }
        },
        ItemRule::RequiredKeys { keys, noun } => {
            let obj = item.as_object();
            for key in keys.iter() {
                if obj.and_then(|o| present(o, key)).is_none() {
                    errors.push(format!("Missing \"{key}\" in {noun} at index {index}"));
                }
            }
        }
    }
}

fn collect_warnings(obj: &Map<String, Value>) -> Vec<String> {
    let mut warnings = Vec::new();
    if present(obj, "icon").is_none() {
        warnings.push("Consider adding an \"icon\" field for better visibility".to_string());
    }
    if present(obj, "homepage").is_none() && present(obj, "repository").is_none() {
        warnings.push("Consider adding \"homepage\" or \"repository\" for documentation".to_string());
    }
    if present(obj, "license").is_none() {
        warnings.push("Consider adding a \"license\" field".to_string());
    }
    warnings
}

/// 取字段值；缺失或为“假值”时返回 `None`。
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| is_truthy(v))
}

/// 清单作者约定的“真值”判断：`null`、`false`、`0`、`""` 视为缺失。
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 错误信息中的取值展示：字符串原样输出，其余按 JSON 文本输出。
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

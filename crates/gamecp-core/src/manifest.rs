//! 扩展清单（gamecp.json）类型模型。
//!
//! 该模块描述一个 GameCP 扩展对宿主声明的全部元数据：
//! - 身份信息（id/名称/版本/作者）与入口文件
//! - 运行期权限、定时任务（cron）、UI 注入点与可配置项
//! - 发布时由工具链回写的完整性摘要（`integrity`）
//!
//! 约定：
//! - JSON 字段名采用 camelCase（例如 `gamecpVersion`）
//! - 可选字段为空时不序列化，保持清单简洁
//! - 该模块仅定义数据结构，不执行任何 IO；结构性校验见 [`crate::validate`]
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 清单根对象（对应 `gamecp.json`）。
///
/// 说明：
/// - `id` 为 kebab-case 唯一标识，同时用于发布压缩包命名
/// - `main` 为相对扩展根目录的入口文件路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionManifest {
    /// 扩展唯一标识（仅小写字母、数字与连字符）。
    pub id: String,
    /// 显示名称。
    pub name: String,
    /// 语义化版本号（例如 `1.0.0`）。
    pub version: String,
    /// 简要描述。
    pub description: String,
    /// 作者信息。
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// 图标 URL 或相对路径。
    pub icon: Option<String>,
    /// 入口文件（相对扩展根目录）。
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// 要求的 GameCP 宿主版本范围。
    pub gamecp_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// 运行期权限声明。
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// 定时任务列表。
    pub cron: Vec<CronSchedule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// UI 注入点列表。
    pub ui: Vec<UiInjection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// 扩展可配置项定义。
    pub settings: Vec<SettingDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    /// 依赖的其他扩展（id → 版本范围）。
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// UI 包的完整性摘要（`sha384-<base64>`），由发布流程回写。
    pub integrity: Option<String>,
}

/// 作者信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            url: None,
        }
    }
}

/// 扩展权限（封闭枚举）。
///
/// 说明：
/// - 每个权限对应宿主运行期暴露的一类能力
/// - 序列化形式为 `<scope>:<action>`（例如 `server:read`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "server:read")]
    ServerRead,
    #[serde(rename = "server:write")]
    ServerWrite,
    #[serde(rename = "server:control")]
    ServerControl,
    #[serde(rename = "server:files")]
    ServerFiles,
    #[serde(rename = "server:console")]
    ServerConsole,
    #[serde(rename = "tenant:read")]
    TenantRead,
    #[serde(rename = "tenant:write")]
    TenantWrite,
    #[serde(rename = "user:read")]
    UserRead,
    #[serde(rename = "network:request")]
    NetworkRequest,
}

impl Permission {
    /// 全部合法权限（按声明顺序）。
    pub const ALL: [Permission; 9] = [
        Permission::ServerRead,
        Permission::ServerWrite,
        Permission::ServerControl,
        Permission::ServerFiles,
        Permission::ServerConsole,
        Permission::TenantRead,
        Permission::TenantWrite,
        Permission::UserRead,
        Permission::NetworkRequest,
    ];

    /// 权限的清单文本形式。
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ServerRead => "server:read",
            Permission::ServerWrite => "server:write",
            Permission::ServerControl => "server:control",
            Permission::ServerFiles => "server:files",
            Permission::ServerConsole => "server:console",
            Permission::TenantRead => "tenant:read",
            Permission::TenantWrite => "tenant:write",
            Permission::UserRead => "user:read",
            Permission::NetworkRequest => "network:request",
        }
    }

    /// 面向用户的权限说明（用于脚手架交互选择）。
    pub fn summary(self) -> &'static str {
        match self {
            Permission::ServerRead => "Read server info",
            Permission::ServerWrite => "Write server data",
            Permission::ServerControl => "Control server (start/stop/restart)",
            Permission::ServerFiles => "Access server files",
            Permission::ServerConsole => "Access server console",
            Permission::TenantRead => "Read tenant info",
            Permission::TenantWrite => "Write tenant data",
            Permission::UserRead => "Read user info",
            Permission::NetworkRequest => "Make network requests",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知权限文本。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知权限: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// 定时任务定义（5 段 cron 表达式）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CronSchedule {
    /// cron 表达式（例如 `*/5 * * * *`）。
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// UI 注入点。
///
/// 说明：
/// - `location` 取值由宿主定义（如 `server:overview`、`tenant:dashboard`），此处不做枚举约束
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiInjection {
    pub location: String,
    /// 组件文件路径（相对扩展根目录）。
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// 扩展可配置项定义。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDefinition {
    pub key: String,
    pub label: String,
    /// 配置项类型（`string`/`number`/`boolean`/`select`/`textarea`）。
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SettingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// 取值校验正则。
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// `select` 类型配置项的候选值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingOption {
    pub label: String,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_serde_uses_scoped_names() {
        let v: Vec<Permission> =
            serde_json::from_str(r#"["server:read", "network:request"]"#).unwrap();
        assert_eq!(v, vec![Permission::ServerRead, Permission::NetworkRequest]);
        assert_eq!(
            serde_json::to_string(&Permission::TenantWrite).unwrap(),
            r#""tenant:write""#
        );
    }

    #[test]
    fn permission_from_str_matches_serde_names() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
        assert!("bogus:perm".parse::<Permission>().is_err());
    }

    #[test]
    fn manifest_skips_empty_optionals_and_uses_camel_case() {
        let m = ExtensionManifest {
            id: "demo".into(),
            name: "Demo".into(),
            version: "0.1.0".into(),
            description: "d".into(),
            author: Author::named("me"),
            icon: None,
            main: "dist/index.js".into(),
            gamecp_version: Some(">=1.0.0".into()),
            permissions: vec![],
            cron: vec![],
            ui: vec![],
            settings: vec![],
            dependencies: BTreeMap::new(),
            homepage: None,
            repository: None,
            license: None,
            tags: vec![],
            integrity: None,
        };
        let v = serde_json::to_value(&m).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj["gamecpVersion"], ">=1.0.0");
        assert!(!obj.contains_key("permissions"));
        assert!(!obj.contains_key("icon"));
    }

    #[test]
    fn setting_type_field_is_renamed() {
        let s: SettingDefinition =
            serde_json::from_str(r#"{ "key": "k", "label": "L", "type": "select", "options": [{ "label": "A", "value": 1 }] }"#)
                .unwrap();
        assert_eq!(s.kind, "select");
        assert_eq!(s.options.len(), 1);
    }
}

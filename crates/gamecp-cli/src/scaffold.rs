//! 扩展脚手架：根据交互答案生成一个可直接构建的扩展工程。
//!
//! 生成内容（位于 `<dir>/<name>/`）：
//! - `gamecp.json`、`package.json`、`tsconfig.json`
//! - `src/index.tsx`（UI 入口）、`src/handlers.ts`（处理器入口）
//! - `.gitignore`、`README.md`
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use gamecp_core::manifest::{Author, CronSchedule, ExtensionManifest, Permission};
use gamecp_core::manifest_file::write_manifest;
use gamecp_core::paths;
use serde::Serialize;
use serde_json::json;

pub const DEFAULT_NAME: &str = "my-extension";
pub const DEFAULT_DESCRIPTION: &str = "A GameCP extension";
pub const DEFAULT_AUTHOR: &str = "Your Name";
pub const DEFAULT_CRON: &str = "*/5 * * * *";

/// 可用模板。
pub const TEMPLATES: [&str; 1] = ["basic"];

const INITIAL_VERSION: &str = "0.1.0";

/// `init` 收集到的答案。
#[derive(Debug, Clone, PartialEq)]
pub struct InitAnswers {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub author: String,
    pub permissions: Vec<Permission>,
    /// 启用定时任务时的 cron 表达式。
    pub cron: Option<String>,
}

impl InitAnswers {
    /// 全部采用默认值（`--yes`）。
    pub fn defaults(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: default_display_name(name),
            description: DEFAULT_DESCRIPTION.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            permissions: vec![Permission::ServerRead],
            cron: None,
        }
    }
}

/// 由 kebab-case 名称生成显示名（按连字符分词、首字母大写）。
pub fn default_display_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 检查模板名是否受支持。
pub fn ensure_template(template: &str) -> Result<()> {
    if !TEMPLATES.contains(&template) {
        bail!(
            "Unknown template \"{template}\" (available: {})",
            TEMPLATES.join(", ")
        );
    }
    Ok(())
}

/// 在 `parent/<name>/` 下生成扩展工程。
///
/// 参数：
/// - `parent`：目标父目录（`--dir`）
/// - `answers`：交互答案
///
/// 返回值：
/// - 新工程的根目录
///
/// 异常处理：
/// - 目标目录已包含 `gamecp.json` 时拒绝覆盖
/// - 任一文件写入失败时返回错误（已写出的文件保留）
pub fn scaffold(parent: &Path, answers: &InitAnswers) -> Result<PathBuf> {
    let root = parent.join(&answers.name);
    let manifest_path = paths::manifest_path(&root);
    if manifest_path.exists() {
        bail!("{} already exists, refusing to overwrite", manifest_path.display());
    }
    paths::ensure_dir(&root.join("src"))?;

    write_manifest(&manifest_path, &manifest(answers))
        .with_context(|| format!("写入清单失败: {}", manifest_path.display()))?;
    write_json(&root.join("package.json"), &package_json(answers))?;
    write_json(&root.join("tsconfig.json"), &tsconfig())?;
    write_text(&root.join(paths::DEFAULT_UI_ENTRY), &ui_entry(answers))?;
    write_text(&root.join(paths::DEFAULT_HANDLERS_ENTRY), &handlers_entry(answers))?;
    write_text(&root.join(".gitignore"), "node_modules/\ndist/\nrelease/\n*.zip\n*.log\n")?;
    write_text(&root.join("README.md"), &readme(answers))?;

    Ok(root)
}

fn manifest(answers: &InitAnswers) -> ExtensionManifest {
    ExtensionManifest {
        id: answers.name.clone(),
        name: answers.display_name.clone(),
        version: INITIAL_VERSION.to_string(),
        description: answers.description.clone(),
        author: Author::named(&answers.author),
        icon: None,
        main: format!("{}/{}", paths::DEFAULT_OUT_DIR, paths::UI_BUNDLE_FILE),
        gamecp_version: None,
        permissions: answers.permissions.clone(),
        cron: answers
            .cron
            .iter()
            .map(|expression| CronSchedule {
                expression: expression.clone(),
                description: Some("Scheduled task".to_string()),
                timezone: None,
            })
            .collect(),
        ui: Vec::new(),
        settings: Vec::new(),
        dependencies: BTreeMap::new(),
        homepage: None,
        repository: None,
        license: None,
        tags: Vec::new(),
        integrity: None,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
    main: String,
    private: bool,
    scripts: BTreeMap<&'static str, &'static str>,
    dev_dependencies: BTreeMap<&'static str, &'static str>,
}

fn package_json(answers: &InitAnswers) -> PackageJson<'_> {
    PackageJson {
        name: &answers.name,
        version: INITIAL_VERSION,
        description: &answers.description,
        main: format!("{}/{}", paths::DEFAULT_OUT_DIR, paths::UI_BUNDLE_FILE),
        private: true,
        scripts: BTreeMap::from([
            ("build", "gamecp build"),
            ("dev", "gamecp dev"),
            ("release", "gamecp-build release"),
            ("validate", "gamecp validate"),
        ]),
        dev_dependencies: BTreeMap::from([
            ("@gamecp/types", "^0.1.0"),
            ("esbuild", "^0.19.0"),
            ("typescript", "^5.3.3"),
        ]),
    }
}

fn tsconfig() -> serde_json::Value {
    json!({
        "compilerOptions": {
            "target": "ES2020",
            "module": "ESNext",
            "lib": ["ES2020", "DOM"],
            "jsx": "react-jsx",
            "strict": true,
            "esModuleInterop": true,
            "skipLibCheck": true,
            "forceConsistentCasingInFileNames": true,
            "moduleResolution": "node",
            "noEmit": true
        },
        "include": ["src/**/*"],
        "exclude": ["node_modules", "dist", "release"]
    })
}

fn ui_entry(answers: &InitAnswers) -> String {
    format!(
        r#"import React from 'react';

export function Overview() {{
  return (
    <div>
      <h2>{{{display}}}</h2>
      <p>{{{description}}}</p>
    </div>
  );
}}

export default {{ Overview }};
"#,
        display = js_string(&answers.display_name),
        description = js_string(&answers.description),
    )
}

/// 生成 JS/TS 字符串字面量（双引号，按 JSON 规则转义）。
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn handlers_entry(answers: &InitAnswers) -> String {
    let has_cron = answers.cron.is_some();
    let imports = if has_cron {
        "Extension, ExtensionContext, CronEvent"
    } else {
        "Extension, ExtensionContext"
    };
    let cron_handler = if has_cron {
        r#"
  async onCron(event: CronEvent, context: ExtensionContext) {
    context.logger.info('Cron tick', { expression: event.expression });
  },
"#
    } else {
        ""
    };
    format!(
        r#"import type {{ {imports} }} from '@gamecp/types';

const extension: Extension = {{
  async onLoad(context: ExtensionContext) {{
    context.logger.info({loaded});
  }},
{cron_handler}
  async onUnload(context: ExtensionContext) {{
    context.logger.info({unloaded});
  }},
}};

export default extension;
"#,
        loaded = js_string(&format!("{} loaded!", answers.display_name)),
        unloaded = js_string(&format!("{} unloaded", answers.display_name)),
    )
}

fn readme(answers: &InitAnswers) -> String {
    let permissions = if answers.permissions.is_empty() {
        "_None_".to_string()
    } else {
        answers
            .permissions
            .iter()
            .map(|p| format!("- `{p}`"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        r#"# {display}

{description}

## Development

```bash
npm install
npm run dev
```

## Build

```bash
npm run build
npm run release
```

## Permissions

{permissions}

## Author

{author}
"#,
        display = answers.display_name,
        description = answers.description,
        author = answers.author,
    )
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_text(path, &text)
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("写入文件失败: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamecp_core::validate_manifest;

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
    fn display_name_title_cases_each_word() {
        assert_eq!(default_display_name("server-monitor"), "Server Monitor");
        assert_eq!(default_display_name("x"), "X");
        assert_eq!(default_display_name("a--b"), "A  B");
    }

    #[test]
    fn only_basic_template_is_accepted() {
        assert!(ensure_template("basic").is_ok());
        let err = ensure_template("react").unwrap_err().to_string();
        assert!(err.contains("Unknown template \"react\""));
    }

    #[test]
    fn scaffold_writes_a_valid_project() {
        let parent = unique_temp_dir("gamecp-cli-scaffold");
        let _cleanup = CleanupDir(parent.clone());
        let answers = InitAnswers {
            permissions: vec![Permission::ServerRead, Permission::NetworkRequest],
            cron: Some(DEFAULT_CRON.to_string()),
            ..InitAnswers::defaults("server-monitor")
        };

        let root = scaffold(&parent, &answers).unwrap();
        assert_eq!(root, parent.join("server-monitor"));
        for file in [
            "gamecp.json",
            "package.json",
            "tsconfig.json",
            "src/index.tsx",
            "src/handlers.ts",
            ".gitignore",
            "README.md",
        ] {
            assert!(root.join(file).is_file(), "missing {file}");
        }

        let manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(root.join("gamecp.json")).unwrap()).unwrap();
        let result = validate_manifest(&manifest);
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(manifest["name"], "Server Monitor");
        assert_eq!(manifest["version"], "0.1.0");
        assert_eq!(manifest["permissions"], json!(["server:read", "network:request"]));
        assert_eq!(manifest["cron"][0]["expression"], "*/5 * * * *");

        let handlers = std::fs::read_to_string(root.join("src/handlers.ts")).unwrap();
        assert!(handlers.contains("onCron"));
        let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
        assert!(readme.contains("- `network:request`"));

        let err = scaffold(&parent, &answers).unwrap_err().to_string();
        assert!(err.contains("refusing to overwrite"));
    }

    #[test]
    fn quotes_in_names_are_escaped_in_generated_sources() {
        let answers = InitAnswers {
            display_name: "Bob's \"Tools\" {x}".to_string(),
            description: "it's <b>".to_string(),
            ..InitAnswers::defaults("bobs-tools")
        };

        let handlers = handlers_entry(&answers);
        assert!(handlers.contains(r#"context.logger.info("Bob's \"Tools\" {x} loaded!");"#));
        assert!(handlers.contains(r#"context.logger.info("Bob's \"Tools\" {x} unloaded");"#));
        assert!(!handlers.contains("'Bob's"));

        let ui = ui_entry(&answers);
        assert!(ui.contains(r#"<h2>{"Bob's \"Tools\" {x}"}</h2>"#));
        assert!(ui.contains(r#"<p>{"it's <b>"}</p>"#));
    }

    #[test]
    fn handlers_without_cron_skip_the_cron_hook() {
        let text = handlers_entry(&InitAnswers::defaults("plain"));
        assert!(!text.contains("onCron"));
        assert!(!text.contains("CronEvent"));
    }
}

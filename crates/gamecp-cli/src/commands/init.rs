//! `gamecp init`：交互式创建扩展工程。

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gamecp_core::manifest::Permission;
use gamecp_core::validate::{is_kebab_id, is_valid_cron};
use tracing::info;

use crate::prompts::Prompter;
use crate::scaffold::{self, InitAnswers};

/// `init` 参数。
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub name: Option<String>,
    pub template: String,
    /// 跳过提问，全部采用默认值。
    pub yes: bool,
}

/// 创建扩展工程。
///
/// 参数：
/// - `parent`：目标父目录（已解析为绝对路径）
/// - `options`：名称、模板与是否跳过提问
///
/// 异常处理：
/// - 模板不存在、名称非法（`--yes` 时）、目标已存在或写入失败时返回错误
pub fn run(parent: &Path, options: &InitOptions) -> Result<()> {
    scaffold::ensure_template(&options.template)?;
    println!("\n🎮 GameCP Extension Generator\n");

    let default_name = options.name.as_deref().unwrap_or(scaffold::DEFAULT_NAME);
    let answers = if options.yes {
        check_name(default_name).map_err(anyhow::Error::msg)?;
        InitAnswers::defaults(default_name)
    } else {
        ask(&mut Prompter::stdio(), default_name).context("读取交互输入失败")?
    };

    info!("Creating extension...");
    let root = scaffold::scaffold(parent, &answers).context("Failed to create extension")?;
    println!("✓ Extension created successfully: {}", root.display());

    println!("\n📦 Next steps:\n");
    println!("  cd {}", answers.name);
    println!("  npm install");
    println!("  npm run dev\n");
    Ok(())
}

/// 依次提问并收集答案。
pub fn ask<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    default_name: &str,
) -> std::io::Result<InitAnswers> {
    let name = prompter.input_validated("Extension name:", default_name, check_name)?;
    let display_name = prompter.input("Display name:", &scaffold::default_display_name(&name))?;
    let description = prompter.input("Description:", scaffold::DEFAULT_DESCRIPTION)?;
    let author = prompter.input("Author name:", scaffold::DEFAULT_AUTHOR)?;

    let choices: Vec<(&str, bool)> = Permission::ALL
        .iter()
        .map(|p| (p.summary(), *p == Permission::ServerRead))
        .collect();
    let permissions = prompter
        .select_many("Select permissions:", &choices)?
        .into_iter()
        .map(|i| Permission::ALL[i])
        .collect();

    let cron = if prompter.confirm("Add cron schedule?", false)? {
        Some(prompter.input_validated("Cron expression:", scaffold::DEFAULT_CRON, |expr| {
            if is_valid_cron(expr) {
                Ok(())
            } else {
                Err(format!("\"{expr}\" is not a valid 5-field cron expression"))
            }
        })?)
    } else {
        None
    };

    Ok(InitAnswers {
        name,
        display_name,
        description,
        author,
        permissions,
        cron,
    })
}

fn check_name(name: &str) -> Result<(), String> {
    if is_kebab_id(name) {
        Ok(())
    } else {
        Err("Extension name must be lowercase with hyphens only".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_on_empty_input() {
        let mut prompter = Prompter::new("".as_bytes(), Vec::new());
        let answers = ask(&mut prompter, "server-monitor").unwrap();
        assert_eq!(answers, InitAnswers::defaults("server-monitor"));
    }

    #[test]
    fn answers_flow_through_every_prompt() {
        let input = "Bad_Name\nstatus-board\n\nShows status\nAda\n2,9\ny\nnope\n0 * * * *\n";
        let mut prompter = Prompter::new(input.as_bytes(), Vec::new());
        let answers = ask(&mut prompter, "my-extension").unwrap();
        assert_eq!(answers.name, "status-board");
        assert_eq!(answers.display_name, "Status Board");
        assert_eq!(answers.description, "Shows status");
        assert_eq!(answers.author, "Ada");
        assert_eq!(
            answers.permissions,
            vec![Permission::ServerWrite, Permission::NetworkRequest]
        );
        assert_eq!(answers.cron.as_deref(), Some("0 * * * *"));
    }
}

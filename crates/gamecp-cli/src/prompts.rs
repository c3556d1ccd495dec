//! 交互式提问（行输入 / 是否确认 / 多选）。
//!
//! 说明：
//! - 所有提问都带默认值：直接回车或输入流结束（EOF）时采用默认值
//! - 输入与输出通过泛型注入，便于在测试中用内存缓冲区驱动
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::io::{self, BufRead, Write};

/// 基于行的提问器。
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// 绑定到进程的标准输入/输出。
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 读取一行文本；空行采用 `default`。
    pub fn input(&mut self, message: &str, default: &str) -> io::Result<String> {
        self.input_validated(message, default, |_| Ok(()))
    }

    /// 读取一行文本并校验，校验失败时打印原因并重新提问。
    ///
    /// 异常处理：
    /// - 输入流已结束且默认值也未通过校验：返回 `UnexpectedEof`，避免无限重试
    pub fn input_validated(
        &mut self,
        message: &str,
        default: &str,
        validate: impl Fn(&str) -> Result<(), String>,
    ) -> io::Result<String> {
        loop {
            write!(self.output, "? {message} ({default}): ")?;
            self.output.flush()?;

            let line = self.read_line()?;
            let eof = line.is_none();
            let answer = match line.as_deref().map(str::trim) {
                None | Some("") => default.to_string(),
                Some(text) => text.to_string(),
            };

            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(reason) if eof => {
                    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, reason));
                }
                Err(reason) => writeln!(self.output, "  ✗ {reason}")?,
            }
        }
    }

    /// 是/否确认；无法识别的回答会重新提问。
    pub fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "? {message} ({hint}): ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(default);
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  ✗ Please answer y or n")?,
            }
        }
    }

    /// 多选：列出编号选项，读取以逗号或空格分隔的编号。
    ///
    /// 参数：
    /// - `choices`：(显示文本, 是否默认选中)
    ///
    /// 返回值：
    /// - 选中项的下标（升序、去重）；空行采用默认选中项
    pub fn select_many(&mut self, message: &str, choices: &[(&str, bool)]) -> io::Result<Vec<usize>> {
        writeln!(self.output, "? {message}")?;
        for (i, (label, checked)) in choices.iter().enumerate() {
            let mark = if *checked { "x" } else { " " };
            writeln!(self.output, "  [{mark}] {}. {label}", i + 1)?;
        }
        let defaults: Vec<usize> = choices
            .iter()
            .enumerate()
            .filter_map(|(i, (_, checked))| checked.then_some(i))
            .collect();

        loop {
            write!(self.output, "  Enter numbers separated by commas (Enter keeps [x]): ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(defaults);
            };
            if line.trim().is_empty() {
                return Ok(defaults);
            }
            match parse_selection(&line, choices.len()) {
                Ok(selected) => return Ok(selected),
                Err(reason) => writeln!(self.output, "  ✗ {reason}")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn parse_selection(line: &str, count: usize) -> Result<Vec<usize>, String> {
    let mut selected = Vec::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let n: usize = token
            .parse()
            .map_err(|_| format!("\"{token}\" is not a number"))?;
        if n == 0 || n > count {
            return Err(format!("{n} is out of range (1-{count})"));
        }
        selected.push(n - 1);
    }
    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

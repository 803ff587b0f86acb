//! 行扫描：按空白切分记号，并把以 `\` 结尾的物理行与下一行合并为一条逻辑语句。

/// 续行标记，必须作为物理行的最后一个记号出现。
pub const CONTINUATION: &str = "\\";

/// 遇到空行时的处理方式。曲线与曲面记录对空行的语义不同，两者都需保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankLinePolicy {
    /// 跳过空行继续扫描。
    Skip,
    /// 第一个空行即视为记录结束。
    EndOfRecord,
}

/// 曲线记录：空行被忽略。
pub const CURVE_BLANK_LINES: BlankLinePolicy = BlankLinePolicy::Skip;
/// 曲面记录：空行终止记录。
pub const SURFACE_BLANK_LINES: BlankLinePolicy = BlankLinePolicy::EndOfRecord;

/// 一条逻辑语句。`line` 为语句起始的物理行号（从 1 开始）。
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'a> {
    pub line: usize,
    pub keyword: &'a str,
    pub args: Vec<&'a str>,
}

pub struct Scanner<'a> {
    lines: std::str::Lines<'a>,
    line_number: usize,
    policy: BlankLinePolicy,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, policy: BlankLinePolicy) -> Self {
        Self {
            lines: source.lines(),
            line_number: 0,
            policy,
            finished: false,
        }
    }

    fn next_physical(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line.trim_end_matches('\r'))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Statement<'a>;

    fn next(&mut self) -> Option<Statement<'a>> {
        if self.finished {
            return None;
        }

        loop {
            let Some(raw) = self.next_physical() else {
                self.finished = true;
                return None;
            };
            if raw.trim().is_empty() {
                match self.policy {
                    BlankLinePolicy::Skip => continue,
                    BlankLinePolicy::EndOfRecord => {
                        self.finished = true;
                        return None;
                    }
                }
            }

            let line = self.line_number;
            let mut tokens: Vec<&'a str> = raw.split_whitespace().collect();
            // 注释行整行丢弃，末尾的 `\` 不引起续行
            if tokens.first().is_some_and(|first| first.starts_with('#')) {
                continue;
            }
            while tokens.last() == Some(&CONTINUATION) {
                tokens.pop();
                match self.next_physical() {
                    Some(next) => tokens.extend(next.split_whitespace()),
                    None => break,
                }
            }

            let mut tokens = tokens.into_iter();
            // 仅含续行标记且后续为空时没有可用的关键字
            let Some(keyword) = tokens.next() else {
                continue;
            };
            return Some(Statement {
                line,
                keyword,
                args: tokens.collect(),
            });
        }
    }
}

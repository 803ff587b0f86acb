use glam::DVec3;
use nurbs_config::WriterConfig;

use crate::scanner::CONTINUATION;

/// 写出选项，对应配置文件中的 `[writer]` 段。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// 固定小数位数；`None` 输出可精确回读的最短表示。
    pub precision: Option<usize>,
    /// 索引/节点列表每行最多的数值个数，0 表示不折行。
    pub values_per_line: usize,
}

impl WriterOptions {
    pub fn from_config(config: &WriterConfig) -> Self {
        Self {
            precision: config.precision,
            values_per_line: config.values_per_line,
        }
    }
}

/// 逐行累积 OBJ 文本。
pub(crate) struct ObjWriter<'o> {
    out: String,
    options: &'o WriterOptions,
}

impl<'o> ObjWriter<'o> {
    pub(crate) fn new(options: &'o WriterOptions) -> Self {
        Self {
            out: String::new(),
            options,
        }
    }

    pub(crate) fn number(&self, value: f64) -> String {
        match self.options.precision {
            Some(precision) => format!("{value:.precision$}"),
            None => format!("{value}"),
        }
    }

    pub(crate) fn vertex(&mut self, position: DVec3, weight: f64) {
        let line = format!(
            "v {} {} {} {}",
            self.number(position.x),
            self.number(position.y),
            self.number(position.z),
            self.number(weight)
        );
        self.line(&line);
    }

    pub(crate) fn cstype(&mut self, rational: bool) {
        self.line(if rational {
            "cstype rat bspline"
        } else {
            "cstype bspline"
        });
    }

    /// 写出 `head` 后接数值列表，超过每行上限时以续行标记折行。
    pub(crate) fn list<I>(&mut self, head: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.out.push_str(head);
        let limit = self.options.values_per_line;
        let mut values = values.into_iter().peekable();
        let mut on_line = 0;
        while let Some(value) = values.next() {
            if !self.out.ends_with('\n') {
                self.out.push(' ');
            }
            self.out.push_str(&value);
            on_line += 1;
            if limit > 0 && on_line == limit && values.peek().is_some() {
                self.out.push(' ');
                self.out.push_str(CONTINUATION);
                self.out.push('\n');
                on_line = 0;
            }
        }
        self.out.push('\n');
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub(crate) fn finish(mut self) -> String {
        self.line("end");
        self.out
    }
}

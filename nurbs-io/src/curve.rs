//! 曲线记录的 OBJ 解码与编码。

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ObjError;
use crate::directive::{
    VertexPool, control_point_count, parse_cstype, parse_degree, parse_domain_and_indices,
    parse_knots, parse_vertex, require,
};
use crate::emit::{ObjWriter, WriterOptions};
use crate::scanner::{CURVE_BLANK_LINES, Scanner, Statement};

/// 解码后的曲线数据，控制点统一为三维齐次缓冲。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    pub degree: u32,
    pub knots: Vec<f64>,
    pub control_points: Vec<DVec3>,
    pub weights: Vec<f64>,
    pub rational: bool,
}

/// 单次解码调用内的累积状态。
#[derive(Debug, Default)]
struct CurveBuilder {
    vertices: VertexPool,
    indices: Vec<i64>,
    knots: Vec<f64>,
    degree: Option<u32>,
    rational: Option<bool>,
    seen_curv: bool,
    seen_parm: bool,
}

impl CurveBuilder {
    fn apply(&mut self, statement: &Statement<'_>) -> Result<(), ObjError> {
        match statement.keyword {
            "v" => self.vertices.push(parse_vertex(statement)?),
            "cstype" => {
                if let Some(rational) = parse_cstype(&statement.args) {
                    self.rational = Some(rational);
                }
            }
            "deg" => {
                if let Some(raw) = statement.args.first() {
                    self.degree = Some(parse_degree(raw, statement.line)?);
                }
            }
            "curv" => {
                if let Some(indices) = parse_domain_and_indices(statement, 2)? {
                    self.indices.extend(indices);
                    self.seen_curv = true;
                }
            }
            "parm" => match statement.args.split_first() {
                Some((&"u", knots)) => {
                    self.knots.extend(parse_knots(knots, statement.line)?);
                    self.seen_parm = true;
                }
                _ => trace!(line = statement.line, "曲线忽略非 u 方向的 parm"),
            },
            other => trace!(line = statement.line, keyword = other, "跳过未识别的指令"),
        }
        Ok(())
    }

    fn finish(self) -> Result<CurveRecord, ObjError> {
        let rational = require(self.rational, "cstype")?;
        let degree = require(self.degree, "deg")?;
        require(self.seen_curv.then_some(()), "curv")?;
        require(self.seen_parm.then_some(()), "parm u")?;

        let count = control_point_count(&self.knots, degree, "u")?;
        if self.indices.len() != count {
            return Err(ObjError::mismatch(format!(
                "curv 索引数量 {} 与节点矢量推导的控制点数 {count} 不一致",
                self.indices.len()
            )));
        }

        let mut control_points = Vec::with_capacity(count);
        let mut weights = Vec::with_capacity(count);
        for &index in &self.indices {
            let vertex = self.vertices.resolve(index)?;
            control_points.push(vertex.position);
            weights.push(vertex.weight);
        }

        debug!(
            vertices = self.vertices.len(),
            control_points = count,
            degree,
            rational,
            "曲线解码完成"
        );
        Ok(CurveRecord {
            degree,
            knots: self.knots,
            control_points,
            weights,
            rational,
        })
    }
}

/// 解析曲线 OBJ 文本。空行被跳过，遇到 `end` 停止读取。
pub fn decode_curve(source: &str) -> Result<CurveRecord, ObjError> {
    let mut builder = CurveBuilder::default();
    for statement in Scanner::new(source, CURVE_BLANK_LINES) {
        if statement.keyword == "end" {
            break;
        }
        builder.apply(&statement)?;
    }
    builder.finish()
}

/// 将曲线记录写为 OBJ 文本，顶点顺序与解码时的索引顺序一致。
pub fn encode_curve(record: &CurveRecord, options: &WriterOptions) -> Result<String, ObjError> {
    let n_knots = record.knots.len();
    let degree = record.degree as usize;
    let bounds = record.knots.get(degree).zip(
        n_knots
            .checked_sub(degree + 1)
            .and_then(|last| record.knots.get(last)),
    );
    let Some((&min, &max)) = bounds else {
        return Err(ObjError::mismatch(format!(
            "节点数 {n_knots} 不足以确定阶数 {} 的参数域",
            record.degree
        )));
    };
    if record.weights.len() < record.control_points.len() {
        return Err(ObjError::mismatch(format!(
            "权重数量 {} 少于控制点数量 {}",
            record.weights.len(),
            record.control_points.len()
        )));
    }

    let mut writer = ObjWriter::new(options);
    for (point, &weight) in record.control_points.iter().zip(&record.weights) {
        writer.vertex(*point, weight);
    }
    writer.cstype(record.rational);
    writer.line(&format!("deg {}", record.degree));
    let head = format!("curv {} {}", writer.number(min), writer.number(max));
    writer.list(
        &head,
        (1..=record.control_points.len()).map(|index| index.to_string()),
    );
    let knots: Vec<String> = record.knots.iter().map(|&knot| writer.number(knot)).collect();
    writer.list("parm u", knots);

    debug!(
        control_points = record.control_points.len(),
        knots = n_knots,
        "曲线编码完成"
    );
    Ok(writer.finish())
}

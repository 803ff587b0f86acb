//! 曲线与曲面共用的指令解析：顶点池、`cstype`、数值与索引解析、控制点数量推导。

use glam::DVec3;

use crate::ObjError;
use crate::scanner::Statement;

/// `v x y z [w]` 读入的原始顶点，权重缺省为 1.0。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawVertex {
    pub position: DVec3,
    pub weight: f64,
}

/// 按文件顺序累积的顶点，对外以 1 起始的索引引用。
#[derive(Debug, Default)]
pub(crate) struct VertexPool {
    vertices: Vec<RawVertex>,
}

impl VertexPool {
    pub(crate) fn push(&mut self, vertex: RawVertex) {
        self.vertices.push(vertex);
    }

    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    /// 将 1 起始的引用解析为顶点，越界引用返回结构不匹配错误。
    pub(crate) fn resolve(&self, index: i64) -> Result<RawVertex, ObjError> {
        usize::try_from(index)
            .ok()
            .and_then(|one_based| one_based.checked_sub(1))
            .and_then(|slot| self.vertices.get(slot))
            .copied()
            .ok_or_else(|| {
                ObjError::mismatch(format!(
                    "控制点索引 {index} 超出顶点范围（共 {} 个顶点）",
                    self.vertices.len()
                ))
            })
    }
}

pub(crate) fn parse_vertex(statement: &Statement<'_>) -> Result<RawVertex, ObjError> {
    if statement.args.len() < 3 {
        return Err(ObjError::invalid(format!(
            "第 {} 行的顶点需要至少 3 个坐标（实际 {} 个）",
            statement.line,
            statement.args.len()
        )));
    }
    let mut coords = [0.0, 0.0, 0.0, 1.0];
    for (slot, raw) in coords.iter_mut().zip(&statement.args) {
        *slot = parse_f64(raw, "顶点坐标", statement.line)?;
    }
    Ok(RawVertex {
        position: DVec3::new(coords[0], coords[1], coords[2]),
        weight: coords[3],
    })
}

/// `cstype bspline` → 非有理，`cstype rat bspline` → 有理；其余类型不产生任何效果。
pub(crate) fn parse_cstype(args: &[&str]) -> Option<bool> {
    match args {
        ["bspline", ..] => Some(false),
        ["rat", "bspline", ..] => Some(true),
        _ => None,
    }
}

pub(crate) fn parse_f64(raw: &str, context: &str, line: usize) -> Result<f64, ObjError> {
    raw.parse::<f64>().map_err(|_| {
        ObjError::invalid(format!("第 {line} 行的{context}解析失败（值：\"{raw}\"）"))
    })
}

pub(crate) fn parse_degree(raw: &str, line: usize) -> Result<u32, ObjError> {
    raw.parse::<u32>().map_err(|_| {
        ObjError::invalid(format!("第 {line} 行的阶数解析失败（值：\"{raw}\"）"))
    })
}

/// 索引也可写成整数值的浮点形式（如 `2.0`），非整数值视为无效。
pub(crate) fn parse_index(raw: &str, line: usize) -> Result<i64, ObjError> {
    if let Ok(index) = raw.parse::<i64>() {
        return Ok(index);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .map(|value| value as i64)
        .ok_or_else(|| {
            ObjError::invalid(format!("第 {line} 行的控制点索引解析失败（值：\"{raw}\"）"))
        })
}

/// 读取 `curv`/`surf` 的参数域边界（不保留）与其后的索引列表。
/// 边界数值不足时返回 `None`，该行视为不完整。
pub(crate) fn parse_domain_and_indices(
    statement: &Statement<'_>,
    bound_count: usize,
) -> Result<Option<Vec<i64>>, ObjError> {
    if statement.args.len() < bound_count {
        return Ok(None);
    }
    let (bounds, indices) = statement.args.split_at(bound_count);
    for raw in bounds {
        parse_f64(raw, "参数域边界", statement.line)?;
    }
    indices
        .iter()
        .map(|raw| parse_index(raw, statement.line))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

pub(crate) fn parse_knots(args: &[&str], line: usize) -> Result<Vec<f64>, ObjError> {
    args.iter()
        .map(|raw| parse_f64(raw, "节点值", line))
        .collect()
}

/// `控制点数 = 节点数 - 阶数 - 1`。
pub(crate) fn control_point_count(
    knots: &[f64],
    degree: u32,
    direction: &str,
) -> Result<usize, ObjError> {
    usize::try_from(degree)
        .ok()
        .and_then(|degree| knots.len().checked_sub(degree + 1))
        .ok_or_else(|| {
            ObjError::mismatch(format!(
                "{direction} 方向节点数 {} 不足以支撑阶数 {degree}",
                knots.len()
            ))
        })
}

pub(crate) fn require<T>(value: Option<T>, directive: &'static str) -> Result<T, ObjError> {
    value.ok_or(ObjError::MissingDirective { directive })
}

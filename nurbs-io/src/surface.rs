//! 曲面记录的 OBJ 解码与编码。控制点索引按 u 方向变化最快排列。

use glam::DVec3;
use nurbs_core::grid::Grid;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::ObjError;
use crate::directive::{
    VertexPool, control_point_count, parse_cstype, parse_degree, parse_domain_and_indices,
    parse_knots, parse_vertex, require,
};
use crate::emit::{ObjWriter, WriterOptions};
use crate::scanner::{SURFACE_BLANK_LINES, Scanner, Statement};

/// 解码后的曲面数据。网格行对应 u，列对应 v。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub degree_u: u32,
    pub degree_v: u32,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub control_points: Grid<DVec3>,
    pub weights: Grid<f64>,
    pub rational: bool,
}

#[derive(Debug, Default)]
struct SurfaceBuilder {
    vertices: VertexPool,
    indices: Vec<i64>,
    knots_u: Option<Vec<f64>>,
    knots_v: Option<Vec<f64>>,
    degrees: Option<(u32, u32)>,
    rational: Option<bool>,
    seen_surf: bool,
}

impl SurfaceBuilder {
    fn apply(&mut self, statement: &Statement<'_>) -> Result<(), ObjError> {
        match statement.keyword {
            "v" => self.vertices.push(parse_vertex(statement)?),
            "cstype" => {
                if let Some(rational) = parse_cstype(&statement.args) {
                    self.rational = Some(rational);
                }
            }
            "deg" => {
                if let [raw_u, raw_v, ..] = statement.args.as_slice() {
                    self.degrees = Some((
                        parse_degree(raw_u, statement.line)?,
                        parse_degree(raw_v, statement.line)?,
                    ));
                }
            }
            "surf" => {
                if let Some(indices) = parse_domain_and_indices(statement, 4)? {
                    self.indices.extend(indices);
                    self.seen_surf = true;
                }
            }
            "parm" => match statement.args.split_first() {
                Some((&"u", knots)) => self
                    .knots_u
                    .get_or_insert_with(Vec::new)
                    .extend(parse_knots(knots, statement.line)?),
                Some((&"v", knots)) => self
                    .knots_v
                    .get_or_insert_with(Vec::new)
                    .extend(parse_knots(knots, statement.line)?),
                _ => trace!(line = statement.line, "忽略未知方向的 parm"),
            },
            other => trace!(line = statement.line, keyword = other, "跳过未识别的指令"),
        }
        Ok(())
    }

    fn finish(self) -> Result<SurfaceRecord, ObjError> {
        let rational = require(self.rational, "cstype")?;
        let (degree_u, degree_v) = require(self.degrees, "deg")?;
        require(self.seen_surf.then_some(()), "surf")?;
        let knots_u = require(self.knots_u, "parm u")?;
        let knots_v = require(self.knots_v, "parm v")?;

        let count_u = control_point_count(&knots_u, degree_u, "u")?;
        let count_v = control_point_count(&knots_v, degree_v, "v")?;
        if self.indices.len() != count_u * count_v {
            return Err(ObjError::mismatch(format!(
                "surf 索引数量 {} 与控制网格 {count_u}x{count_v} 不一致",
                self.indices.len()
            )));
        }

        let resolved = self
            .indices
            .iter()
            .map(|&index| self.vertices.resolve(index))
            .collect::<Result<Vec<_>, _>>()?;
        // 第 k 个索引对应 (u = k % count_u, v = k / count_u)
        let control_points = Grid::from_fn(count_u, count_v, |u, v| {
            resolved[v * count_u + u].position
        });
        let weights = Grid::from_fn(count_u, count_v, |u, v| resolved[v * count_u + u].weight);

        debug!(
            vertices = self.vertices.len(),
            count_u,
            count_v,
            rational,
            "曲面解码完成"
        );
        Ok(SurfaceRecord {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
            weights,
            rational,
        })
    }
}

/// 解析曲面 OBJ 文本。第一个空行或 `end` 即结束读取。
pub fn decode_surface(source: &str) -> Result<SurfaceRecord, ObjError> {
    let mut builder = SurfaceBuilder::default();
    for statement in Scanner::new(source, SURFACE_BLANK_LINES) {
        if statement.keyword == "end" {
            break;
        }
        builder.apply(&statement)?;
    }
    builder.finish()
}

fn domain_bounds(knots: &[f64], degree: u32, direction: &str) -> Result<(f64, f64), ObjError> {
    let degree_index = degree as usize;
    let min = knots.get(degree_index);
    let max = knots
        .len()
        .checked_sub(degree_index + 1)
        .and_then(|last| knots.get(last));
    match (min, max) {
        (Some(&min), Some(&max)) => Ok((min, max)),
        _ => Err(ObjError::mismatch(format!(
            "{direction} 方向节点数 {} 不足以确定阶数 {degree} 的参数域",
            knots.len()
        ))),
    }
}

/// 将曲面记录写为 OBJ 文本。控制网格为空时返回空文本。
pub fn encode_surface(record: &SurfaceRecord, options: &WriterOptions) -> Result<String, ObjError> {
    let rows = record.control_points.rows();
    let cols = record.control_points.cols();
    if rows == 0 || cols == 0 {
        warn!("曲面控制网格为空，写出空文件");
        return Ok(String::new());
    }

    let (umin, umax) = domain_bounds(&record.knots_u, record.degree_u, "u")?;
    let (vmin, vmax) = domain_bounds(&record.knots_v, record.degree_v, "v")?;

    let mut writer = ObjWriter::new(options);
    for v in 0..cols {
        for u in 0..rows {
            let point = record.control_points.get(u, v);
            let weight = record.weights.get(u, v);
            let (Some(&point), Some(&weight)) = (point, weight) else {
                return Err(ObjError::mismatch(format!(
                    "权重网格 {}x{} 与控制网格 {rows}x{cols} 尺寸不一致",
                    record.weights.rows(),
                    record.weights.cols()
                )));
            };
            writer.vertex(point, weight);
        }
    }
    writer.cstype(record.rational);
    writer.line(&format!("deg {} {}", record.degree_u, record.degree_v));
    let head = format!(
        "surf {} {} {} {}",
        writer.number(umin),
        writer.number(umax),
        writer.number(vmin),
        writer.number(vmax)
    );
    writer.list(&head, (1..=rows * cols).map(|index| index.to_string()));
    let knots_u: Vec<String> = record.knots_u.iter().map(|&knot| writer.number(knot)).collect();
    writer.list("parm u", knots_u);
    let knots_v: Vec<String> = record.knots_v.iter().map(|&knot| writer.number(knot)).collect();
    writer.list("parm v", knots_v);

    debug!(rows, cols, "曲面编码完成");
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BILINEAR_PATCH: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 1 0.5
cstype rat bspline
deg 1 1
surf 0 1 0 1 1 2 3 4
parm u 0 0 1 1
parm v 0 0 1 1
end
";

    #[test]
    fn indices_fill_grid_with_u_fastest() {
        let record = decode_surface(BILINEAR_PATCH).expect("解码曲面");
        assert!(record.rational);
        assert_eq!((record.degree_u, record.degree_v), (1, 1));
        assert_eq!(record.control_points.rows(), 2);
        assert_eq!(record.control_points.cols(), 2);
        assert_eq!(record.control_points[(0, 0)], DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(record.control_points[(1, 0)], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(record.control_points[(0, 1)], DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(record.control_points[(1, 1)], DVec3::new(1.0, 1.0, 1.0));
        assert!((record.weights[(1, 1)] - 0.5).abs() < 1e-12);
        assert!((record.weights[(0, 1)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_square_grid_uses_u_count_as_stride() {
        let source = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 0
v 2 1 0
cstype bspline
deg 2 1
surf 0 1 0 1 1 2 3 4 5 6
parm u 0 0 0 1 1 1
parm v 0 0 1 1
";
        let record = decode_surface(source).expect("解码曲面");
        assert_eq!(record.control_points.rows(), 3);
        assert_eq!(record.control_points.cols(), 2);
        assert_eq!(record.control_points[(2, 0)], DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(record.control_points[(0, 1)], DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(record.control_points[(2, 1)], DVec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn blank_line_terminates_surface_record() {
        let source = BILINEAR_PATCH.replace("cstype", "\ncstype");
        assert!(matches!(
            decode_surface(&source),
            Err(ObjError::MissingDirective { directive: "cstype" })
        ));
    }

    #[test]
    fn blank_line_after_all_directives_is_harmless() {
        let source = BILINEAR_PATCH.replace("end\n", "\nparm v 9 9\n");
        let record = decode_surface(&source).expect("解码曲面");
        assert_eq!(record.knots_v, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_parm_v_is_named() {
        let source = BILINEAR_PATCH.replace("parm v 0 0 1 1\n", "");
        assert!(matches!(
            decode_surface(&source),
            Err(ObjError::MissingDirective { directive: "parm v" })
        ));
    }

    #[test]
    fn single_degree_counts_as_missing() {
        let source = BILINEAR_PATCH.replace("deg 1 1", "deg 1");
        assert!(matches!(
            decode_surface(&source),
            Err(ObjError::MissingDirective { directive: "deg" })
        ));
    }

    #[test]
    fn continuation_lines_extend_index_and_knot_lists() {
        let source = BILINEAR_PATCH
            .replace("surf 0 1 0 1 1 2 3 4", "surf 0 1 0 1 1 2 \\\n3 4")
            .replace("parm u 0 0 1 1", "parm u 0 0 \\\n1 1");
        let record = decode_surface(&source).expect("解码曲面");
        assert_eq!(record.knots_u, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(record.control_points[(1, 1)], DVec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn grid_size_mismatch_is_rejected() {
        let source = BILINEAR_PATCH.replace("surf 0 1 0 1 1 2 3 4", "surf 0 1 0 1 1 2 3");
        assert!(matches!(decode_surface(&source), Err(ObjError::Mismatch { .. })));
    }

    #[test]
    fn encoder_walks_grid_u_fastest() {
        let record = decode_surface(BILINEAR_PATCH).expect("解码曲面");
        let text = encode_surface(&record, &WriterOptions::default()).expect("编码曲面");
        let vertices: Vec<&str> = text.lines().filter(|line| line.starts_with("v ")).collect();
        assert_eq!(
            vertices,
            vec!["v 0 0 0 1", "v 1 0 0 1", "v 0 1 0 1", "v 1 1 1 0.5"]
        );
        assert!(text.contains("cstype rat bspline\ndeg 1 1\nsurf 0 1 0 1 1 2 3 4\n"));
        assert!(text.ends_with("parm u 0 0 1 1\nparm v 0 0 1 1\nend\n"));
        assert_eq!(decode_surface(&text).expect("回读曲面"), record);
    }

    #[test]
    fn empty_grid_encodes_to_empty_text() {
        let record = SurfaceRecord {
            degree_u: 1,
            degree_v: 1,
            knots_u: Vec::new(),
            knots_v: Vec::new(),
            control_points: Grid::empty(),
            weights: Grid::empty(),
            rational: false,
        };
        assert_eq!(
            encode_surface(&record, &WriterOptions::default()).expect("编码空曲面"),
            ""
        );
    }

    #[test]
    fn mismatched_weight_grid_is_rejected() {
        let mut record = decode_surface(BILINEAR_PATCH).expect("解码曲面");
        record.weights = Grid::new(1, 2, 1.0);
        assert!(matches!(
            encode_surface(&record, &WriterOptions::default()),
            Err(ObjError::Mismatch { .. })
        ));
    }
}

use std::f64::consts::FRAC_1_SQRT_2;
use std::path::PathBuf;

use glam::DVec3;
use nurbs_core::geometry::{Point2, Point3};
use nurbs_core::nurbs::{Curve, RationalCurve, RationalSurface, Surface};
use nurbs_io::{GeometryLoader, IoError, ObjFacade, read_curve, read_rational_curve};
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

#[test]
fn load_rational_circle_with_continuations() {
    let loader = ObjFacade::new();
    let record = loader
        .read_curve_record(&fixture("rational_circle.obj"))
        .expect("读取有理圆失败");

    assert!(record.rational);
    assert_eq!(record.degree, 2);
    assert_eq!(record.knots.len(), 12);
    assert_eq!(record.control_points.len(), 9);
    assert_eq!(record.control_points[0], record.control_points[8]);
    assert_eq!(record.control_points[3], DVec3::new(-1.0, 1.0, 0.0));
    for (index, weight) in record.weights.iter().enumerate() {
        let expected = if index % 2 == 0 { 1.0 } else { FRAC_1_SQRT_2 };
        assert!((weight - expected).abs() < 1e-12, "权重 {index} 为 {weight}");
    }
}

#[test]
fn load_reused_vertices_matches_expected_record() {
    let loader = ObjFacade::new();
    let record = loader
        .read_curve_record(&fixture("reused_vertices.obj"))
        .expect("读取复用顶点曲线失败");

    let snapshot = serde_json::to_value(&record).expect("序列化曲线记录失败");
    assert_eq!(
        snapshot,
        json!({
            "degree": 1,
            "knots": [0.0, 0.0, 1.0, 2.0, 3.0, 3.0],
            "control_points": [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0]
            ],
            "weights": [1.0, 1.0, 1.0, 1.0],
            "rational": false
        })
    );
}

#[test]
fn planar_curve_drops_z_and_weights() {
    let curve: Curve<Point2> = read_curve(fixture("rational_circle.obj")).expect("读取二维曲线失败");
    assert_eq!(curve.control_points.len(), 9);
    assert_eq!(curve.control_points[1], Point2::new(1.0, 1.0));
    assert_eq!(curve.knots[3], 0.25);

    let rational: RationalCurve<Point3> =
        read_rational_curve(fixture("rational_circle.obj")).expect("读取有理曲线失败");
    assert_eq!(rational.weights.len(), 9);
    assert_eq!(rational.control_points[6], Point3::new(0.0, -1.0, 0.0));
}

#[test]
fn missing_deg_fails_before_any_geometry() {
    let loader = ObjFacade::new();
    let result: Result<Curve<Point3>, IoError> = loader.load(&fixture("missing_deg.obj"));
    match result {
        Err(IoError::MissingDirective { directive }) => assert_eq!(directive, "deg"),
        other => panic!("期望缺少 deg 指令，实际为 {other:?}"),
    }
}

#[test]
fn out_of_range_reference_is_reported() {
    let loader = ObjFacade::new();
    let result: Result<RationalCurve<Point3>, IoError> = loader.load(&fixture("out_of_range.obj"));
    assert!(matches!(result, Err(IoError::StructuralMismatch(_))));
}

#[test]
fn missing_file_is_read_error() {
    let loader = ObjFacade::new();
    let path = fixture("does_not_exist.obj");
    let result: Result<Curve<Point3>, IoError> = loader.load(&path);
    match result {
        Err(IoError::ReadError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("期望读取失败，实际为 {other:?}"),
    }
}

#[test]
fn surface_stops_at_blank_line() {
    let loader = ObjFacade::new();
    let surface: RationalSurface<Point3> = loader
        .load(&fixture("bilinear_patch.obj"))
        .expect("读取双线性曲面失败");

    assert_eq!((surface.degree_u, surface.degree_v), (1, 1));
    assert_eq!(surface.control_points[(0, 0)], Point3::new(0.0, 0.0, 0.0));
    assert_eq!(surface.control_points[(1, 0)], Point3::new(2.0, 0.0, 0.0));
    assert_eq!(surface.control_points[(0, 1)], Point3::new(0.0, 2.0, 0.0));
    assert_eq!(surface.control_points[(1, 1)], Point3::new(2.0, 2.0, 1.0));
    assert!((surface.weights[(1, 1)] - 0.5).abs() < 1e-12);
}

#[test]
fn surface_read_as_planar_non_rational() {
    let loader = ObjFacade::new();
    let surface: Surface<Point2> = loader
        .load(&fixture("bilinear_patch.obj"))
        .expect("读取二维曲面失败");
    assert_eq!(surface.control_points.rows(), 2);
    assert_eq!(surface.control_points.cols(), 2);
    assert_eq!(surface.control_points[(1, 1)], Point2::new(2.0, 2.0));
}

#[test]
fn curve_file_is_not_a_surface() {
    let loader = ObjFacade::new();
    let result: Result<Surface<Point3>, IoError> = loader.load(&fixture("reused_vertices.obj"));
    // 曲面扫描在第一个空行处停止，之后的 cstype 不可见
    assert!(matches!(
        result,
        Err(IoError::MissingDirective {
            directive: "cstype"
        })
    ));
}

//! 三维齐次缓冲与调用方点类型之间的维度适配，以及记录与实体之间的转换。
//!
//! 读取时丢弃超出目标维度的分量，写出时缺失分量补零；非有理实体读取时丢弃权重，
//! 写出时权重统一为 1.0。

use glam::{DVec2, DVec3};
use nurbs_core::geometry::{Point2, Point3};
use nurbs_core::grid::Grid;
use nurbs_core::nurbs::{Curve, RationalCurve, RationalSurface, Surface};

use crate::curve::CurveRecord;
use crate::surface::SurfaceRecord;

/// 取前 `D` 个分量，不足的部分补零。
pub fn narrow<const D: usize>(point: DVec3) -> [f64; D] {
    let full = point.to_array();
    std::array::from_fn(|axis| full.get(axis).copied().unwrap_or(0.0))
}

/// 将 `D` 个分量放入三维缓冲，缺失分量补零，多余分量丢弃。
pub fn widen<const D: usize>(components: [f64; D]) -> DVec3 {
    let mut full = [0.0; 3];
    for (slot, value) in full.iter_mut().zip(components) {
        *slot = value;
    }
    DVec3::from_array(full)
}

/// 可作为控制点的二维或三维点类型。
pub trait ControlPoint: Copy {
    fn from_homogeneous(point: DVec3) -> Self;
    fn to_homogeneous(self) -> DVec3;
}

impl ControlPoint for Point2 {
    fn from_homogeneous(point: DVec3) -> Self {
        let [x, y] = narrow::<2>(point);
        Point2::new(x, y)
    }

    fn to_homogeneous(self) -> DVec3 {
        widen([self.x(), self.y()])
    }
}

impl ControlPoint for Point3 {
    fn from_homogeneous(point: DVec3) -> Self {
        let [x, y, z] = narrow::<3>(point);
        Point3::new(x, y, z)
    }

    fn to_homogeneous(self) -> DVec3 {
        widen([self.x(), self.y(), self.z()])
    }
}

impl ControlPoint for DVec2 {
    fn from_homogeneous(point: DVec3) -> Self {
        DVec2::from_array(narrow::<2>(point))
    }

    fn to_homogeneous(self) -> DVec3 {
        widen(self.to_array())
    }
}

impl ControlPoint for DVec3 {
    fn from_homogeneous(point: DVec3) -> Self {
        point
    }

    fn to_homogeneous(self) -> DVec3 {
        self
    }
}

pub fn into_curve<P: ControlPoint>(record: CurveRecord) -> Curve<P> {
    Curve::new(
        record.degree,
        record.knots,
        record
            .control_points
            .into_iter()
            .map(P::from_homogeneous)
            .collect(),
    )
}

pub fn into_rational_curve<P: ControlPoint>(record: CurveRecord) -> RationalCurve<P> {
    RationalCurve::new(
        record.degree,
        record.knots,
        record
            .control_points
            .into_iter()
            .map(P::from_homogeneous)
            .collect(),
        record.weights,
    )
}

pub fn into_surface<P: ControlPoint>(record: SurfaceRecord) -> Surface<P> {
    Surface::new(
        record.degree_u,
        record.degree_v,
        record.knots_u,
        record.knots_v,
        record.control_points.map(|&point| P::from_homogeneous(point)),
    )
}

pub fn into_rational_surface<P: ControlPoint>(record: SurfaceRecord) -> RationalSurface<P> {
    RationalSurface::new(
        record.degree_u,
        record.degree_v,
        record.knots_u,
        record.knots_v,
        record.control_points.map(|&point| P::from_homogeneous(point)),
        record.weights,
    )
}

pub fn curve_record<P: ControlPoint>(curve: &Curve<P>) -> CurveRecord {
    CurveRecord {
        degree: curve.degree,
        knots: curve.knots.clone(),
        control_points: curve
            .control_points
            .iter()
            .map(|point| point.to_homogeneous())
            .collect(),
        weights: vec![1.0; curve.control_points.len()],
        rational: false,
    }
}

pub fn rational_curve_record<P: ControlPoint>(curve: &RationalCurve<P>) -> CurveRecord {
    CurveRecord {
        degree: curve.degree,
        knots: curve.knots.clone(),
        control_points: curve
            .control_points
            .iter()
            .map(|point| point.to_homogeneous())
            .collect(),
        weights: curve.weights.clone(),
        rational: true,
    }
}

pub fn surface_record<P: ControlPoint>(surface: &Surface<P>) -> SurfaceRecord {
    let grid = &surface.control_points;
    SurfaceRecord {
        degree_u: surface.degree_u,
        degree_v: surface.degree_v,
        knots_u: surface.knots_u.clone(),
        knots_v: surface.knots_v.clone(),
        control_points: grid.map(|point| point.to_homogeneous()),
        weights: Grid::new(grid.rows(), grid.cols(), 1.0),
        rational: false,
    }
}

pub fn rational_surface_record<P: ControlPoint>(surface: &RationalSurface<P>) -> SurfaceRecord {
    SurfaceRecord {
        degree_u: surface.degree_u,
        degree_v: surface.degree_v,
        knots_u: surface.knots_u.clone(),
        knots_v: surface.knots_v.clone(),
        control_points: surface.control_points.map(|point| point.to_homogeneous()),
        weights: surface.weights.clone(),
        rational: true,
    }
}

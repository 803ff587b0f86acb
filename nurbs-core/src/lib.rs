pub mod geometry {
    use glam::{DVec2, DVec3};
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 三维点，曲面控制网格与空间曲线均使用该类型。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub DVec3);

    impl Point3 {
        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f64 {
            self.0.z
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }
    }

    impl From<DVec3> for Point3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }
}

pub mod grid {
    use std::ops::{Index, IndexMut};

    use serde::{Deserialize, Serialize};

    /// 二维网格容器。行对应 u 方向，列对应 v 方向，按行优先连续存储。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Grid<T> {
        rows: usize,
        cols: usize,
        data: Vec<T>,
    }

    impl<T> Grid<T> {
        pub fn empty() -> Self {
            Self {
                rows: 0,
                cols: 0,
                data: Vec::new(),
            }
        }

        /// 按 `(row, col)` 逐个生成元素。
        pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
            let mut data = Vec::with_capacity(rows * cols);
            for row in 0..rows {
                for col in 0..cols {
                    data.push(f(row, col));
                }
            }
            Self { rows, cols, data }
        }

        #[inline]
        pub fn rows(&self) -> usize {
            self.rows
        }

        #[inline]
        pub fn cols(&self) -> usize {
            self.cols
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.data.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.data.is_empty()
        }

        pub fn get(&self, row: usize, col: usize) -> Option<&T> {
            if row < self.rows && col < self.cols {
                self.data.get(row * self.cols + col)
            } else {
                None
            }
        }

        pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
            if row < self.rows && col < self.cols {
                self.data.get_mut(row * self.cols + col)
            } else {
                None
            }
        }

        pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
            Grid {
                rows: self.rows,
                cols: self.cols,
                data: self.data.iter().map(&mut f).collect(),
            }
        }
    }

    impl<T: Clone> Grid<T> {
        pub fn new(rows: usize, cols: usize, fill: T) -> Self {
            Self {
                rows,
                cols,
                data: vec![fill; rows * cols],
            }
        }
    }

    impl<T> Default for Grid<T> {
        fn default() -> Self {
            Self::empty()
        }
    }

    impl<T> Index<(usize, usize)> for Grid<T> {
        type Output = T;

        fn index(&self, (row, col): (usize, usize)) -> &T {
            assert!(
                row < self.rows && col < self.cols,
                "网格下标 ({row}, {col}) 越界（尺寸 {}x{}）",
                self.rows,
                self.cols
            );
            &self.data[row * self.cols + col]
        }
    }

    impl<T> IndexMut<(usize, usize)> for Grid<T> {
        fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
            assert!(
                row < self.rows && col < self.cols,
                "网格下标 ({row}, {col}) 越界（尺寸 {}x{}）",
                self.rows,
                self.cols
            );
            &mut self.data[row * self.cols + col]
        }
    }
}

pub mod nurbs {
    //! 曲线/曲面实体只负责保存阶数、节点矢量与控制点，求值等数学运算不在本 crate 中。

    use serde::{Deserialize, Serialize};

    use crate::grid::Grid;

    /// 非有理 B 样条曲线。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Curve<P> {
        pub degree: u32,
        pub knots: Vec<f64>,
        pub control_points: Vec<P>,
    }

    impl<P> Curve<P> {
        pub fn new(degree: u32, knots: Vec<f64>, control_points: Vec<P>) -> Self {
            Self {
                degree,
                knots,
                control_points,
            }
        }
    }

    impl<P> Default for Curve<P> {
        fn default() -> Self {
            Self::new(0, Vec::new(), Vec::new())
        }
    }

    /// 有理 B 样条曲线，每个控制点携带一个齐次权重。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RationalCurve<P> {
        pub degree: u32,
        pub knots: Vec<f64>,
        pub control_points: Vec<P>,
        pub weights: Vec<f64>,
    }

    impl<P> RationalCurve<P> {
        pub fn new(degree: u32, knots: Vec<f64>, control_points: Vec<P>, weights: Vec<f64>) -> Self {
            Self {
                degree,
                knots,
                control_points,
                weights,
            }
        }
    }

    impl<P> Default for RationalCurve<P> {
        fn default() -> Self {
            Self::new(0, Vec::new(), Vec::new(), Vec::new())
        }
    }

    /// 非有理 B 样条曲面，控制网格行对应 u、列对应 v。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Surface<P> {
        pub degree_u: u32,
        pub degree_v: u32,
        pub knots_u: Vec<f64>,
        pub knots_v: Vec<f64>,
        pub control_points: Grid<P>,
    }

    impl<P> Surface<P> {
        pub fn new(
            degree_u: u32,
            degree_v: u32,
            knots_u: Vec<f64>,
            knots_v: Vec<f64>,
            control_points: Grid<P>,
        ) -> Self {
            Self {
                degree_u,
                degree_v,
                knots_u,
                knots_v,
                control_points,
            }
        }
    }

    impl<P> Default for Surface<P> {
        fn default() -> Self {
            Self::new(0, 0, Vec::new(), Vec::new(), Grid::empty())
        }
    }

    /// 有理 B 样条曲面，权重网格与控制网格尺寸一致。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RationalSurface<P> {
        pub degree_u: u32,
        pub degree_v: u32,
        pub knots_u: Vec<f64>,
        pub knots_v: Vec<f64>,
        pub control_points: Grid<P>,
        pub weights: Grid<f64>,
    }

    impl<P> RationalSurface<P> {
        pub fn new(
            degree_u: u32,
            degree_v: u32,
            knots_u: Vec<f64>,
            knots_v: Vec<f64>,
            control_points: Grid<P>,
            weights: Grid<f64>,
        ) -> Self {
            Self {
                degree_u,
                degree_v,
                knots_u,
                knots_v,
                control_points,
                weights,
            }
        }
    }

    impl<P> Default for RationalSurface<P> {
        fn default() -> Self {
            Self::new(0, 0, Vec::new(), Vec::new(), Grid::empty(), Grid::empty())
        }
    }
}

use nalgebra::{Matrix3, Point2, Vector3};

use crate::Error;

const DET_EPSILON: f64 = 1e-12;

/// Projective map from the unit square onto a quadrilateral.
///
/// Uses the row vector convention: `(x', y', w) = (u, v, 1) * M`, with the
/// physical point at `(x' / w, y' / w)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: Matrix3<f64>,
}

impl Homography {
    /// Wrap a matrix laid out for row vectors
    pub fn new(m: Matrix3<f64>) -> Self {
        Self { m }
    }

    /// Solve the square-to-quad transform for corners ordered TL, TR, BR, BL.
    ///
    /// `(0,0)` lands on TL, `(1,0)` on TR, `(1,1)` on BR and `(0,1)` on BL.
    pub fn solve(corners: &[Point2<f64>; 4]) -> Result<Self, Error> {
        let [p0, p1, p2, p3] = *corners;
        let (x0, y0) = (p0.x, p0.y);
        let (x1, y1) = (p1.x, p1.y);
        let (x2, y2) = (p2.x, p2.y);
        let (x3, y3) = (p3.x, p3.y);

        let dx1 = x1 - x2;
        let dy1 = y1 - y2;
        let dx2 = x3 - x2;
        let dy2 = y3 - y2;
        let sx = x0 - x1 + x2 - x3;
        let sy = y0 - y1 + y2 - y3;

        // Relative to the squared corner span, so tiny quads stay valid.
        let det = dx1 * dy2 - dy1 * dx2;
        let span = dx1.abs().max(dy1.abs()).max(dx2.abs()).max(dy2.abs());
        if !det.is_finite() || det.abs() <= DET_EPSILON * span * span {
            return Err(Error::DegenerateQuadrilateral);
        }

        let g = (sx * dy2 - sy * dx2) / det;
        let h = (dx1 * sy - dy1 * sx) / det;
        let a = x1 - x0 + g * x1;
        let d = y1 - y0 + g * y1;
        let b = x3 - x0 + h * x3;
        let e = y3 - y0 + h * y3;

        #[rustfmt::skip]
        let m = Matrix3::new(
            a,  d,  g,
            b,  e,  h,
            x0, y0, 1.0,
        );
        Ok(Self::new(m))
    }

    /// The underlying matrix
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    /// Map normalized `(u, v)` to a physical point.
    #[inline]
    pub fn apply(&self, u: f64, v: f64) -> Point2<f64> {
        let p = Vector3::new(u, v, 1.0).transpose() * self.m;
        Point2::new(p[0] / p[2], p[1] / p[2])
    }

    /// Physical to normalized map, if the matrix is invertible.
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(Self::new)
    }
}

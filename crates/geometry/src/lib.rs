pub mod point;
pub mod vector;
pub mod line;
pub mod plane;
pub mod polygon;
pub mod triangle;
pub mod bilinear;
pub mod transform;

pub use bilinear::{BilinearSurface, Roots, solve_quadratic};
pub use line::Line3d;
pub use plane::{LineHit, Plane};
pub use point::Point3d;
pub use polygon::{OrientedRect, Outline, Polygon, convex_hull_xy, min_enclosing_rectangle};
pub use transform::PlanarRotation;
pub use triangle::Triangle;
pub use vector::Vec3;

use thiserror::Error;

/// Failures of the primitive intersection routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("line is parallel to the plane")]
    Parallel,

    #[error("line has zero length")]
    ZeroLength,
}

/// Thresholds for the comparisons the grid queries make.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// `|normal · direction|` at or below this counts as parallel.
    pub parallel: f64,
    /// Edges whose horizontal cross product is this small relative to
    /// their lengths count as collinear.
    pub collinear: f64,
    /// Slack on `(u, v)` when deciding whether a parameter lies in `[0, 1]`.
    pub parametric: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            parallel: 1e-12,
            collinear: 1e-12,
            parametric: 1e-9,
        }
    }
}

impl Tolerance {
    /// Whether `t` lies in `[0, 1]` up to the parametric slack.
    pub fn in_unit_interval(&self, t: f64) -> bool {
        (-self.parametric..=1.0 + self.parametric).contains(&t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_interval_slack() {
        let tol = Tolerance::default();
        assert!(tol.in_unit_interval(0.0));
        assert!(tol.in_unit_interval(1.0 + 1e-10));
        assert!(!tol.in_unit_interval(-1e-6));

        let loose = Tolerance {
            parametric: 0.1,
            ..tol
        };
        assert!(loose.in_unit_interval(-0.05));
        assert!(!loose.in_unit_interval(1.2));
    }
}

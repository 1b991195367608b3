use serde::{Deserialize, Serialize};

use super::GeometryError;
use super::line::Line3d;
use super::point::Point3d;
use super::vector::Vec3;

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
}

/// Result of a line-plane intersection.
#[derive(Debug, Clone, Copy)]
pub struct LineHit {
    pub point: Point3d,
    pub t: f64,
}

impl Plane {
    /// Build a plane; returns `None` for a zero normal.
    pub fn new(origin: Point3d, normal: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            normal: normal.normalized()?,
        })
    }

    /// Horizontal plane at depth `z`.
    pub fn horizontal(z: f64) -> Self {
        Self {
            origin: Point3d::new(0.0, 0.0, z),
            normal: Vec3::Z,
        }
    }

    /// Intersect the infinite extension of `line` with the plane.
    ///
    /// End flags are not applied here; callers that care check
    /// [`Line3d::accepts`] on the returned parameter.
    pub fn intersect_line(&self, line: &Line3d, parallel_tol: f64) -> Result<LineHit, GeometryError> {
        let dir = line.direction();
        if dir.length_squared() == 0.0 {
            return Err(GeometryError::ZeroLength);
        }
        let denom = self.normal.dot(&dir);
        if denom.abs() <= parallel_tol {
            return Err(GeometryError::Parallel);
        }
        let t = self.normal.dot(&(self.origin - line.start)) / denom;
        Ok(LineHit {
            point: line.evaluate(t),
            t,
        })
    }
}

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use super::point::Point3d;

/// Rotation of the horizontal plane about the z axis.
///
/// `to_local` maps world coordinates into a frame whose x axis points along
/// `angle`: `x' = cos·x + sin·y`, `y' = cos·y − sin·x`. Depth is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarRotation {
    pub angle: f64,
}

impl PlanarRotation {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    pub fn identity() -> Self {
        Self::new(0.0)
    }

    fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.angle)
    }

    /// World → rotated frame.
    pub fn to_local(&self, p: &Point3d) -> Point3d {
        let v = self.rotation().inverse() * Vector2::new(p.x, p.y);
        Point3d::new(v.x, v.y, p.z)
    }

    /// Rotated frame → world.
    pub fn to_world(&self, p: &Point3d) -> Point3d {
        let v = self.rotation() * Vector2::new(p.x, p.y);
        Point3d::new(v.x, v.y, p.z)
    }

    pub fn to_local_xy(&self, x: f64, y: f64) -> (f64, f64) {
        let v = self.rotation().inverse() * Vector2::new(x, y);
        (v.x, v.y)
    }

    pub fn to_world_xy(&self, x: f64, y: f64) -> (f64, f64) {
        let v = self.rotation() * Vector2::new(x, y);
        (v.x, v.y)
    }
}

impl Default for PlanarRotation {
    fn default() -> Self {
        Self::identity()
    }
}

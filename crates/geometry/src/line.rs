use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// A line through two points, parameterised as `start + t * (end - start)`.
///
/// Each end carries a flag telling intersection routines whether parameter
/// values beyond that end are rejected (`true`) or accepted (`false`). Both
/// flags set gives a segment, neither gives an infinite line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line3d {
    pub start: Point3d,
    pub end: Point3d,
    pub start_bounded: bool,
    pub end_bounded: bool,
}

impl Line3d {
    pub fn new(start: Point3d, end: Point3d, start_bounded: bool, end_bounded: bool) -> Self {
        Self {
            start,
            end,
            start_bounded,
            end_bounded,
        }
    }

    pub fn segment(start: Point3d, end: Point3d) -> Self {
        Self::new(start, end, true, true)
    }

    pub fn infinite(start: Point3d, end: Point3d) -> Self {
        Self::new(start, end, false, false)
    }

    /// Unbounded vertical line through `(x, y)`.
    pub fn vertical(x: f64, y: f64) -> Self {
        Self::infinite(Point3d::new(x, y, 0.0), Point3d::new(x, y, 1.0))
    }

    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn evaluate(&self, t: f64) -> Point3d {
        self.start + self.direction() * t
    }

    /// Whether parameter `t` lies on the line given its end flags.
    pub fn accepts(&self, t: f64) -> bool {
        !((self.start_bounded && t < 0.0) || (self.end_bounded && t > 1.0))
    }

    /// True when the two ends share a depth, so the line carries no z information.
    pub fn is_horizontal(&self) -> bool {
        self.end.z == self.start.z
    }
}

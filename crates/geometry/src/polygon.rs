//! Planar polygons in the horizontal plane, multi-ring outlines, convex hull
//! and the minimum-area enclosing rectangle.
//!
//! Points keep their z value but every test here works on x and y only.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::transform::PlanarRotation;

/// A closed ring of points; the closing edge from last to first is implicit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point3d>,
}

impl Polygon {
    pub fn new(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, p: Point3d) {
        self.points.push(p);
    }

    /// Crossing-number test against the horizontal projection.
    ///
    /// A ray is cast in +x. Edges are half-open in y, so a point on a
    /// shared vertex is counted once.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut p1 = self.points[n - 1];
        for &p2 in &self.points {
            if y > p1.y.min(p2.y) && y <= p1.y.max(p2.y) && x <= p1.x.max(p2.x) && p1.y != p2.y {
                let x_cross = (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
                if p1.x == p2.x || x <= x_cross {
                    inside = !inside;
                }
            }
            p1 = p2;
        }
        inside
    }

    /// Signed shoelace area; positive for counter-clockwise rings.
    pub fn signed_area_xy(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for idx in 0..n {
            let a = &self.points[idx];
            let b = &self.points[(idx + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        0.5 * sum
    }
}

/// Outline of a region: a single ring, or several rings combined with
/// even-odd parity so that inner rings cut holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outline {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Default for Outline {
    fn default() -> Self {
        Outline::MultiPolygon(Vec::new())
    }
}

impl Outline {
    pub fn rings(&self) -> &[Polygon] {
        match self {
            Outline::Polygon(p) => std::slice::from_ref(p),
            Outline::MultiPolygon(rings) => rings,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &Point3d> {
        self.rings().iter().flat_map(|r| r.points.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.rings().iter().all(Polygon::is_empty)
    }

    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        self.rings()
            .iter()
            .filter(|r| r.contains_xy(x, y))
            .count()
            % 2
            == 1
    }
}

// ─── Convex Hull ─────────────────────────────────────────────────────────────

fn cross_xy(o: &Point3d, a: &Point3d, b: &Point3d) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Monotone-chain convex hull of the horizontal projection, counter-clockwise,
/// without collinear points.
pub fn convex_hull_xy(points: &[Point3d]) -> Vec<Point3d> {
    let mut pts: Vec<Point3d> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point3d> = Vec::with_capacity(2 * pts.len());
    for p in &pts {
        while hull.len() >= 2 && cross_xy(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(*p);
    }
    let lower_len = hull.len() + 1;
    for p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross_xy(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(*p);
    }
    hull.pop();
    hull
}

// ─── Minimum Enclosing Rectangle ─────────────────────────────────────────────

/// Rectangle with one corner at `(x0, y0)`, sides `lx` along `angle` and
/// `ly` perpendicular to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub x0: f64,
    pub y0: f64,
    pub lx: f64,
    pub ly: f64,
    pub angle: f64,
}

impl OrientedRect {
    pub fn area(&self) -> f64 {
        self.lx * self.ly
    }

    /// The four corners, counter-clockwise starting at `(x0, y0)`.
    pub fn corners(&self) -> [Point3d; 4] {
        let rot = PlanarRotation::new(self.angle);
        let (u0, v0) = rot.to_local_xy(self.x0, self.y0);
        [
            (u0, v0),
            (u0 + self.lx, v0),
            (u0 + self.lx, v0 + self.ly),
            (u0, v0 + self.ly),
        ]
        .map(|(u, v)| {
            let (x, y) = rot.to_world_xy(u, v);
            Point3d::new(x, y, 0.0)
        })
    }

    pub fn contains_xy(&self, x: f64, y: f64, tol: f64) -> bool {
        let rot = PlanarRotation::new(self.angle);
        let (u0, v0) = rot.to_local_xy(self.x0, self.y0);
        let (u, v) = rot.to_local_xy(x, y);
        u >= u0 - tol && u <= u0 + self.lx + tol && v >= v0 - tol && v <= v0 + self.ly + tol
    }
}

/// Minimum-area rectangle containing all points, found by testing one
/// orientation per convex-hull edge. Angles are reported in `[0, π/2)`.
pub fn min_enclosing_rectangle(points: &[Point3d]) -> Option<OrientedRect> {
    let hull = convex_hull_xy(points);
    if hull.is_empty() {
        return None;
    }

    let mut angles: Vec<f64> = (0..hull.len())
        .filter_map(|idx| {
            let a = &hull[idx];
            let b = &hull[(idx + 1) % hull.len()];
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            (dx != 0.0 || dy != 0.0).then(|| {
                let angle = dy.atan2(dx).rem_euclid(FRAC_PI_2);
                if angle >= FRAC_PI_2 { 0.0 } else { angle }
            })
        })
        .collect();
    if angles.is_empty() {
        angles.push(0.0);
    }

    let mut best: Option<OrientedRect> = None;
    for angle in angles {
        let rot = PlanarRotation::new(angle);
        let (mut umin, mut vmin) = (f64::INFINITY, f64::INFINITY);
        let (mut umax, mut vmax) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &hull {
            let (u, v) = rot.to_local_xy(p.x, p.y);
            umin = umin.min(u);
            umax = umax.max(u);
            vmin = vmin.min(v);
            vmax = vmax.max(v);
        }
        let (x0, y0) = rot.to_world_xy(umin, vmin);
        let candidate = OrientedRect {
            x0,
            y0,
            lx: umax - umin,
            ly: vmax - vmin,
            angle,
        };
        if best.is_none_or(|b| candidate.area() < b.area()) {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: f64) -> Polygon {
        Polygon::new(vec![
            Point3d::new(x0, y0, 0.0),
            Point3d::new(x0 + side, y0, 0.0),
            Point3d::new(x0 + side, y0 + side, 0.0),
            Point3d::new(x0, y0 + side, 0.0),
        ])
    }

    #[test]
    fn test_contains_square() {
        let sq = square(0.0, 0.0, 2.0);
        assert!(sq.contains_xy(1.0, 1.0));
        assert!(!sq.contains_xy(3.0, 1.0));
        assert!(!sq.contains_xy(1.0, -0.5));
    }

    #[test]
    fn test_contains_concave() {
        // L-shape
        let poly = Polygon::new(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(1.0, 2.0, 0.0),
            Point3d::new(0.0, 2.0, 0.0),
        ]);
        assert!(poly.contains_xy(0.5, 1.5));
        assert!(poly.contains_xy(1.5, 0.5));
        assert!(!poly.contains_xy(1.5, 1.5));
    }

    #[test]
    fn test_multipolygon_hole() {
        let outline = Outline::MultiPolygon(vec![square(0.0, 0.0, 4.0), square(1.0, 1.0, 2.0)]);
        assert!(outline.contains_xy(0.5, 0.5));
        assert!(!outline.contains_xy(2.0, 2.0));
        assert!(!outline.contains_xy(5.0, 2.0));
    }

    #[test]
    fn test_signed_area() {
        assert!((square(0.0, 0.0, 3.0).signed_area_xy() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_convex_hull_drops_interior_points() {
        let mut pts = square(0.0, 0.0, 1.0).points;
        pts.push(Point3d::new(0.5, 0.5, 0.0));
        pts.push(Point3d::new(0.5, 0.0, 0.0));
        let hull = convex_hull_xy(&pts);
        assert_eq!(hull.len(), 4);
        assert!(Polygon::new(hull).signed_area_xy() > 0.0);
    }

    #[test]
    fn test_min_rectangle_axis_aligned() {
        let rect = min_enclosing_rectangle(&square(1.0, 2.0, 3.0).points).unwrap();
        assert!(rect.angle.abs() < 1e-12);
        assert!((rect.area() - 9.0).abs() < 1e-9);
        assert!((rect.x0 - 1.0).abs() < 1e-9);
        assert!((rect.y0 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_rectangle_rotated_square() {
        let angle: f64 = 0.4;
        let rot = PlanarRotation::new(angle);
        let pts: Vec<Point3d> = square(0.0, 0.0, 2.0)
            .points
            .iter()
            .map(|p| rot.to_world(p))
            .collect();
        let rect = min_enclosing_rectangle(&pts).unwrap();
        assert!((rect.area() - 4.0).abs() < 1e-9);
        for p in &pts {
            assert!(rect.contains_xy(p.x, p.y, 1e-9));
        }
    }

    #[test]
    fn test_min_rectangle_empty() {
        assert!(min_enclosing_rectangle(&[]).is_none());
    }
}

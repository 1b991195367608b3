use serde::{Deserialize, Serialize};

use super::line::Line3d;
use super::point::Point3d;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub p0: Point3d,
    pub p1: Point3d,
    pub p2: Point3d,
}

impl Triangle {
    pub fn new(p0: Point3d, p1: Point3d, p2: Point3d) -> Self {
        Self { p0, p1, p2 }
    }

    /// Intersection with `line`, honouring its end flags. Edges and
    /// vertices count as inside. Degenerate triangles and lines parallel to
    /// the triangle plane give `None`.
    pub fn intersect_line(&self, line: &Line3d) -> Option<Point3d> {
        let u = self.p1 - self.p0;
        let v = self.p2 - self.p0;
        let n = u.cross(&v);
        if n.length_squared() == 0.0 {
            return None;
        }

        let dir = line.direction();
        let w0 = line.start - self.p0;
        let a = -n.dot(&w0);
        let b = n.dot(&dir);
        if b.abs() < 1e-14 * n.length() * dir.length() {
            return None;
        }

        let r = a / b;
        if !line.accepts(r) {
            return None;
        }
        let hit = line.evaluate(r);

        let uu = u.dot(&u);
        let uv = u.dot(&v);
        let vv = v.dot(&v);
        let w = hit - self.p0;
        let wu = w.dot(&u);
        let wv = w.dot(&v);
        let d = uv * uv - uu * vv;

        let s = (uv * wv - vv * wu) / d;
        if !(0.0..=1.0).contains(&s) {
            return None;
        }
        let t = (uv * wu - uu * wv) / d;
        if t < 0.0 || s + t > 1.0 {
            return None;
        }
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sloped() -> Triangle {
        Triangle::new(
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(10.0, 0.0, 10.0),
            Point3d::new(0.0, 10.0, 20.0),
        )
    }

    #[test]
    fn test_vertical_line_interpolates_depth() {
        let hit = sloped().intersect_line(&Line3d::vertical(2.0, 3.0)).unwrap();
        assert!((hit.x - 2.0).abs() < 1e-12);
        assert!((hit.y - 3.0).abs() < 1e-12);
        assert!((hit.z - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_edges_included() {
        let tri = sloped();
        assert!(tri.intersect_line(&Line3d::vertical(5.0, 0.0)).is_some());
        assert!(tri.intersect_line(&Line3d::vertical(0.0, 0.0)).is_some());
        assert!(tri.intersect_line(&Line3d::vertical(5.0, 5.0)).is_some());
        assert!(tri.intersect_line(&Line3d::vertical(6.0, 6.0)).is_none());
    }

    #[test]
    fn test_segment_too_short() {
        let seg = Line3d::segment(Point3d::new(2.0, 3.0, 0.0), Point3d::new(2.0, 3.0, 5.0));
        assert!(sloped().intersect_line(&seg).is_none());
    }

    #[test]
    fn test_degenerate_triangle() {
        let p = Point3d::new(1.0, 1.0, 1.0);
        let tri = Triangle::new(p, p, Point3d::new(2.0, 2.0, 2.0));
        assert!(tri.intersect_line(&Line3d::vertical(1.0, 1.0)).is_none());
    }
}

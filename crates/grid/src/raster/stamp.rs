//! Stamping one quad onto the raster.
//!
//! Quads arrive in the raster frame as a ring: corner `(0,0)`, `(0,1)`,
//! `(1,1)`, `(1,0)`. Each raster cell whose centre falls in the quad's
//! bounding box is probed with a vertical line.

use std::f64::consts::PI;
use std::ops::Range;

use pillargrid_geometry::{BilinearSurface, Line3d, Point3d, Triangle, Vec3};

use super::{SurfaceRaster, SurfaceStrategy};

/// Raster cell layout in the rotated frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub x0: f64,
    pub y0: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Frame {
    fn center(&self, p: usize, q: usize) -> (f64, f64) {
        (
            self.x0 + 0.5 * self.dx + p as f64 * self.dx,
            self.y0 + 0.5 * self.dy + q as f64 * self.dy,
        )
    }
}

/// Indices of the centres that can fall inside `[min, max]`.
fn candidates(min: f64, max: f64, origin: f64, step: f64, n: usize) -> Range<usize> {
    let first = ((min - origin) / step - 0.5).max(0.0) as usize;
    let end = ((max - origin) / step + 1.0).max(0.0) as usize;
    first..end.min(n)
}

fn cells_under(corners: &[Point3d], frame: &Frame, raster: &SurfaceRaster) -> Vec<(usize, usize)> {
    let (mut xmin, mut ymin) = (f64::INFINITY, f64::INFINITY);
    let (mut xmax, mut ymax) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in corners {
        xmin = xmin.min(c.x);
        xmax = xmax.max(c.x);
        ymin = ymin.min(c.y);
        ymax = ymax.max(c.y);
    }
    let rows = candidates(ymin, ymax, frame.y0, frame.dy, raster.nj());
    candidates(xmin, xmax, frame.x0, frame.dx, raster.ni())
        .flat_map(|p| rows.clone().map(move |q| (p, q)))
        .collect()
}

/// Stamp one quad; returns how many raster cells it hit.
pub(crate) fn stamp_quad(
    raster: &mut SurfaceRaster,
    frame: &Frame,
    corners: &[Point3d; 4],
    strategy: SurfaceStrategy,
) -> usize {
    match strategy {
        SurfaceStrategy::Bilinear => stamp_bilinear(raster, frame, corners),
        SurfaceStrategy::Triangles => stamp_triangles(raster, frame, corners),
    }
}

fn stamp_bilinear(raster: &mut SurfaceRaster, frame: &Frame, corners: &[Point3d; 4]) -> usize {
    let surface = BilinearSurface::from_ring(corners);
    let mut hit = 0;
    for (p, q) in cells_under(corners, frame, raster) {
        let (x, y) = frame.center(p, q);
        if let Some(point) = surface.intersect_line(&Line3d::vertical(x, y)) {
            let value = &mut raster.values[(p, q)];
            let count = &mut raster.hits[(p, q)];
            *value = if *count > 0 { 0.5 * (*value + point.z) } else { point.z };
            *count = count.saturating_add(1);
            hit += 1;
        }
    }
    hit
}

/// Split a quad into triangles along the diagonal whose opposite angles
/// sum to at most π. A quad with two equal neighbouring corners becomes a
/// single triangle.
fn split(corners: &[Point3d; 4]) -> (Triangle, Option<Triangle>) {
    if let Some(dup) = (0..4).find(|&n| corners[n] == corners[(n + 1) % 4]) {
        let rest: Vec<Point3d> = (0..4).filter(|&n| n != dup).map(|n| corners[n]).collect();
        return (Triangle::new(rest[0], rest[1], rest[2]), None);
    }

    let planar = |from: usize, to: usize| {
        let d = corners[to] - corners[from];
        Vec3::new(d.x, d.y, 0.0)
    };
    let angles = planar(0, 1).angle_to(&planar(0, 3)) + planar(2, 1).angle_to(&planar(2, 3));
    let [c0, c1, c2, c3] = *corners;
    if angles <= PI {
        (Triangle::new(c3, c0, c1), Some(Triangle::new(c1, c2, c3)))
    } else {
        (Triangle::new(c0, c1, c2), Some(Triangle::new(c2, c3, c0)))
    }
}

fn stamp_triangles(raster: &mut SurfaceRaster, frame: &Frame, corners: &[Point3d; 4]) -> usize {
    let (first, second) = split(corners);
    let mut hit = 0;
    for (p, q) in cells_under(corners, frame, raster) {
        let (x, y) = frame.center(p, q);
        let line = Line3d::vertical(x, y);
        let found = first
            .intersect_line(&line)
            .or_else(|| second.as_ref().and_then(|t| t.intersect_line(&line)));
        if let Some(point) = found {
            let value = &mut raster.values[(p, q)];
            let count = &mut raster.hits[(p, q)];
            let n = f64::from(*count);
            *value = if *count > 0 { (*value * n + point.z) / (n + 1.0) } else { point.z };
            *count = count.saturating_add(1);
            hit += 1;
        }
    }
    hit
}

fn split_apart(a: &Point3d, b: &Point3d, tol: f64) -> bool {
    (a.x - b.x).abs() > tol || (a.y - b.y).abs() > tol
}

/// Quad closing the gap between a column and its `j - 1` neighbour, if
/// their shared corners are split apart.
pub(crate) fn bridge_across_j(below: &[Point3d; 4], corners: &[Point3d; 4], tol: f64) -> Option<[Point3d; 4]> {
    let (left, right) = (below[1], below[2]);
    let (c0, c3) = (corners[0], corners[3]);
    if !split_apart(&left, &c0, tol) && !split_apart(&right, &c3, tol) {
        return None;
    }
    let mut quad = [left, c0, c3, right];
    if c0.y < left.y && c3.y < right.y {
        // overlap: depths swap sides
        quad[0].z = c0.z;
        quad[1].z = left.z;
        quad[2].z = right.z;
        quad[3].z = c3.z;
    }
    Some(quad)
}

/// Quad closing the gap between a column and its `i - 1` neighbour, if
/// their shared corners are split apart.
pub(crate) fn bridge_across_i(prev: &[Point3d; 4], corners: &[Point3d; 4], tol: f64) -> Option<[Point3d; 4]> {
    let (lower, upper) = (prev[3], prev[2]);
    let (c0, c1) = (corners[0], corners[1]);
    if !split_apart(&upper, &c1, tol) && !split_apart(&lower, &c0, tol) {
        return None;
    }
    let mut quad = [lower, upper, c1, c0];
    if c1.x < upper.x && c0.x < lower.x {
        quad[0].z = c1.z;
        quad[1].z = c0.z;
        quad[2].z = upper.z;
        quad[3].z = lower.z;
    }
    Some(quad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_frame() -> Frame {
        Frame {
            x0: 0.0,
            y0: 0.0,
            dx: 1.0,
            dy: 1.0,
        }
    }

    fn ring(x0: f64, y0: f64, x1: f64, y1: f64, z: [f64; 4]) -> [Point3d; 4] {
        [
            Point3d::new(x0, y0, z[0]),
            Point3d::new(x0, y1, z[1]),
            Point3d::new(x1, y1, z[2]),
            Point3d::new(x1, y0, z[3]),
        ]
    }

    #[test]
    fn test_candidates_clamped() {
        assert_eq!(candidates(-5.0, 2.2, 0.0, 1.0, 10), 0..3);
        assert_eq!(candidates(3.7, 50.0, 0.0, 1.0, 10), 3..10);
        assert_eq!(candidates(-9.0, -4.0, 0.0, 1.0, 10), 0..0);
    }

    #[test]
    fn test_bilinear_flat_quad() {
        let mut raster = SurfaceRaster::new(4, 4);
        let hit = stamp_quad(
            &mut raster,
            &unit_frame(),
            &ring(0.0, 0.0, 2.0, 2.0, [7.0; 4]),
            SurfaceStrategy::Bilinear,
        );
        assert_eq!(hit, 4);
        assert_eq!(raster.value(1, 1), Some(7.0));
        assert_eq!(raster.value(2, 2), None);
    }

    #[test]
    fn test_bilinear_averages_pairwise() {
        let mut raster = SurfaceRaster::new(1, 1);
        let frame = unit_frame();
        for z in [2.0, 4.0, 8.0] {
            stamp_quad(&mut raster, &frame, &ring(0.0, 0.0, 1.0, 1.0, [z; 4]), SurfaceStrategy::Bilinear);
        }
        assert_eq!(raster.hits[(0, 0)], 3);
        assert!((raster.values[(0, 0)] - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_triangles_running_mean() {
        let mut raster = SurfaceRaster::new(1, 1);
        let frame = unit_frame();
        for z in [2.0, 4.0, 9.0] {
            stamp_quad(&mut raster, &frame, &ring(0.0, 0.0, 1.0, 1.0, [z; 4]), SurfaceStrategy::Triangles);
        }
        assert_eq!(raster.hits[(0, 0)], 3);
        assert!((raster.values[(0, 0)] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangles_sloped() {
        let mut raster = SurfaceRaster::new(4, 1);
        let corners = ring(0.0, 0.0, 4.0, 1.0, [0.0, 0.0, 8.0, 8.0]);
        stamp_quad(&mut raster, &unit_frame(), &corners, SurfaceStrategy::Triangles);
        for p in 0..4 {
            let expected = 2.0 * (p as f64 + 0.5);
            assert!((raster.values[(p, 0)] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_split_picks_diagonal() {
        // wide angles at corners 0 and 2: the 0-2 diagonal is used
        let corners = [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(3.0, 1.0, 0.0),
            Point3d::new(0.0, 2.0, 0.0),
            Point3d::new(-3.0, 1.0, 0.0),
        ];
        let (first, second) = split(&corners);
        assert_eq!(first, Triangle::new(corners[0], corners[1], corners[2]));
        assert!(second.is_some());

        let square = ring(0.0, 0.0, 1.0, 1.0, [0.0; 4]);
        let (first, _) = split(&square);
        assert_eq!(first, Triangle::new(square[3], square[0], square[1]));
    }

    #[test]
    fn test_split_collapses_repeated_corner() {
        let mut corners = ring(0.0, 0.0, 1.0, 1.0, [0.0; 4]);
        corners[2] = corners[1];
        let (tri, second) = split(&corners);
        assert!(second.is_none());
        assert_eq!(tri, Triangle::new(corners[0], corners[2], corners[3]));
    }

    #[test]
    fn test_no_bridge_when_corners_meet() {
        let below = ring(0.0, 0.0, 1.0, 1.0, [5.0; 4]);
        let above = ring(0.0, 1.0, 1.0, 2.0, [5.0; 4]);
        assert!(bridge_across_j(&below, &above, 1e-8).is_none());
        let right = ring(1.0, 0.0, 2.0, 1.0, [5.0; 4]);
        assert!(bridge_across_i(&below, &right, 1e-8).is_none());
    }

    #[test]
    fn test_bridge_across_i_gap() {
        let prev = ring(0.0, 0.0, 1.0, 1.0, [1.0; 4]);
        let next = ring(1.5, 0.0, 2.5, 1.0, [3.0; 4]);
        let quad = bridge_across_i(&prev, &next, 1e-8).unwrap();
        assert_eq!(quad[0], prev[3]);
        assert_eq!(quad[1], prev[2]);
        assert_eq!(quad[2], next[1]);
        assert_eq!(quad[3], next[0]);
    }

    #[test]
    fn test_bridge_across_i_overlap_swaps_depths() {
        let prev = ring(0.0, 0.0, 1.0, 1.0, [1.0; 4]);
        let next = ring(0.5, 0.0, 1.5, 1.0, [3.0; 4]);
        let quad = bridge_across_i(&prev, &next, 1e-8).unwrap();
        assert_eq!([quad[0].z, quad[1].z, quad[2].z, quad[3].z], [3.0, 3.0, 1.0, 1.0]);
        assert_eq!(quad[0].x, 1.0);
    }

    #[test]
    fn test_bridge_across_j_overlap_swaps_depths() {
        let below = ring(0.0, 0.0, 1.0, 1.0, [1.0; 4]);
        let above = ring(0.0, 0.8, 1.0, 1.8, [3.0; 4]);
        let quad = bridge_across_j(&below, &above, 1e-8).unwrap();
        assert_eq!([quad[0].z, quad[1].z, quad[2].z, quad[3].z], [3.0, 1.0, 1.0, 3.0]);
        assert_eq!(quad[1].y, 0.8);
    }
}

//! Outlines of the active pillars.
//!
//! The tracer walks the pillar mask keeping inactive pillars on its left,
//! so every connected boundary (outer edges and holes alike) comes out as
//! its own ring.

use pillargrid_geometry::{OrientedRect, Outline, Point3d, Polygon, min_enclosing_rectangle};
use tracing::{info, instrument, warn};

use crate::config::BoundaryMode;
use crate::grid2d::Grid2D;
use crate::model::CornerPointGrid;

/// Outlines of the active pillars at the shallowest and deepest active
/// corner depth.
#[derive(Debug, Clone, Default)]
pub struct Boundaries {
    pub polymin: Outline,
    pub polymax: Outline,
    /// `(zmin, zmax)`, `None` when no cell is active.
    pub elevation: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    fn turn_left(self) -> Self {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    fn turn_right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    fn step(self, (i, j): (usize, usize)) -> Option<(usize, usize)> {
        match self {
            Heading::Up => Some((i, j + 1)),
            Heading::Right => Some((i + 1, j)),
            Heading::Down => Some((i, j.checked_sub(1)?)),
            Heading::Left => Some((i.checked_sub(1)?, j)),
        }
    }
}

impl CornerPointGrid {
    /// Outlines at the extreme active depths, traced on first use.
    pub fn boundaries(&self) -> &Boundaries {
        self.boundaries.get_or_init(|| self.trace_outlines())
    }

    /// Minimum-area rectangle around both cached outlines.
    pub fn enclosing_rectangle(&self) -> Option<OrientedRect> {
        let outlines = self.boundaries();
        let points: Vec<Point3d> = outlines
            .polymin
            .points()
            .chain(outlines.polymax.points())
            .copied()
            .collect();
        min_enclosing_rectangle(&points)
    }

    /// Outline of the active pillars cut at depth `z`, shaped by the
    /// configured [`BoundaryMode`].
    pub fn trace_active_boundary(&self, z: f64) -> Outline {
        let components = self.trace_active_components(z);
        match self.config.boundary {
            BoundaryMode::Components => Outline::MultiPolygon(components),
            BoundaryMode::Bridged => Outline::Polygon(bridge(&components)),
        }
    }

    /// One ring per connected boundary of the active pillars at depth `z`,
    /// with collinear points removed. Rings with fewer than three points
    /// left are dropped.
    pub fn trace_active_components(&self, z: f64) -> Vec<Polygon> {
        let mut visited = Grid2D::new(self.ni() + 1, self.nj() + 1, false);
        let mut components = Vec::new();
        for j in 0..=self.nj() {
            for i in 0..=self.ni() {
                if !self.is_pillar_active(i, j) || visited[(i, j)] {
                    continue;
                }
                if i > 0 && self.is_pillar_active(i - 1, j) {
                    continue;
                }
                let path = self.walk_boundary((i, j), &mut visited);
                let points: Vec<Point3d> = path
                    .iter()
                    .map(|&(pi, pj)| self.point_at_pillar(pi, pj, z))
                    .collect();
                let ring = prune_collinear(points, self.config.tolerance.collinear);
                if ring.len() >= 3 {
                    components.push(Polygon::new(ring));
                }
            }
        }
        components
    }

    #[instrument(skip(self))]
    fn trace_outlines(&self) -> Boundaries {
        let Some((zmin, zmax)) = self.elevation_range() else {
            info!("no active cells, outlines empty");
            return Boundaries::default();
        };
        let polymin = self.trace_active_boundary(zmin);
        let polymax = self.trace_active_boundary(zmax);
        info!(
            zmin,
            zmax,
            rings = polymin.rings().len(),
            points = polymin.points().count(),
            "active outlines traced"
        );
        Boundaries {
            polymin,
            polymax,
            elevation: Some((zmin, zmax)),
        }
    }

    /// Pillars along one boundary, starting at `seed` heading up. Each step
    /// prefers a left turn, then straight on, then a right turn.
    fn walk_boundary(&self, seed: (usize, usize), visited: &mut Grid2D<bool>) -> Vec<(usize, usize)> {
        let limit = 4 * (self.ni() + 1) * (self.nj() + 1) + 4;
        let active = |(i, j): (usize, usize)| i <= self.ni() && j <= self.nj() && self.is_pillar_active(i, j);

        visited[seed] = true;
        let mut path = vec![seed];
        let (mut at, mut heading) = (seed, Heading::Up);
        for _ in 0..limit {
            let next = [heading.turn_left(), heading, heading.turn_right()]
                .into_iter()
                .find_map(|h| h.step(at).filter(|&p| active(p)).map(|p| (p, h)));
            let Some((p, h)) = next else {
                return path;
            };
            if p == seed {
                return path;
            }
            visited[p] = true;
            path.push(p);
            at = p;
            heading = h;
        }
        warn!(i = seed.0, j = seed.1, steps = limit, "boundary walk did not close");
        path
    }
}

/// Drop points whose incoming and outgoing edges are parallel, treating
/// the path as a closed ring. The first point is always kept.
fn prune_collinear(points: Vec<Point3d>, tol: f64) -> Vec<Point3d> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let mut kept = Vec::with_capacity(n);
    kept.push(points[0]);
    for m in 1..n {
        let incoming = points[m] - points[m - 1];
        let outgoing = points[(m + 1) % n] - points[m];
        if !incoming.is_parallel_xy(&outgoing, tol) {
            kept.push(points[m]);
        }
    }
    kept
}

/// Chain rings into one: each ring is closed explicitly and every ring
/// after the first is followed by the first ring's start point.
fn bridge(components: &[Polygon]) -> Polygon {
    let mut out = Polygon::default();
    let Some(start) = components.first().and_then(|c| c.points.first()).copied() else {
        return out;
    };
    for (n, ring) in components.iter().enumerate() {
        out.points.extend_from_slice(&ring.points);
        if let Some(&first) = ring.points.first() {
            out.push(first);
        }
        if n > 0 {
            out.push(start);
        }
    }
    out
}

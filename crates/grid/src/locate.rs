//! Point location: `(x, y, z)` to the cell containing it.
//!
//! The column is found by cutting every active pillar at `z` and testing
//! the resulting quads. The layer is then found by a binary search on the
//! face depths at the point's local `(u, v)`.

use pillargrid_geometry::{Plane, Point3d, Polygon};
use tracing::{debug, trace};

use crate::config::OverturnedPolicy;
use crate::error::GridError;
use crate::face::CellFace;
use crate::grid2d::Grid2D;
use crate::model::CornerPointGrid;
use crate::CellIndex;

impl CornerPointGrid {
    /// Cell containing `(x, y, z)`, or `None`.
    ///
    /// A point on a shared top face belongs to the cell below the face; a
    /// point on the bottom face of the deepest layer is outside. The cell
    /// found may be inactive.
    pub fn locate(&self, x: f64, y: f64, z: f64) -> Option<CellIndex> {
        let (i, j) = self.locate_column(x, y, z)?;
        let (u, v) = match self.uv_from_xy(i, j, z, x, y) {
            Ok(uv) => uv,
            Err(err) => {
                debug!(x, y, z, %err, "locate: no local coordinates");
                return None;
            }
        };

        let found = self.search_layers(i, j, u, v, z).or_else(|| match self.config.locate.overturned {
            OverturnedPolicy::Reject => None,
            OverturnedPolicy::LinearScan => (0..self.nk()).find(|&k| self.layer_contains(i, j, k, u, v, z)),
        });
        if found.is_none() {
            debug!(x, y, z, i, j, "locate: no layer contains the point");
        }
        found.map(|k| CellIndex::new(i, j, k))
    }

    /// Column whose pillar quad at depth `z` contains `(x, y)`.
    ///
    /// Points outside both cached outlines are rejected up front. Pillars
    /// that cannot be cut at `z` leave their columns out of the search.
    pub fn locate_column(&self, x: f64, y: f64, z: f64) -> Option<(usize, usize)> {
        let outlines = self.boundaries();
        if !outlines.polymin.contains_xy(x, y) && !outlines.polymax.contains_xy(x, y) {
            debug!(x, y, z, "locate: outside active outline");
            return None;
        }

        let mut cut = Grid2D::new(self.ni() + 1, self.nj() + 1, None);
        for j in 0..=self.nj() {
            for i in 0..=self.ni() {
                if !self.is_pillar_active(i, j) {
                    continue;
                }
                match self.cut_pillar(i, j, z) {
                    Ok(p) => cut[(i, j)] = Some(p),
                    Err(err) => trace!(i, j, z, %err, "pillar skipped"),
                }
            }
        }

        self.columns().find(|&(i, j)| {
            let quad = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)].map(|ij| cut[ij]);
            match quad {
                [Some(p0), Some(p1), Some(p2), Some(p3)] => {
                    Polygon::new(vec![p0, p1, p2, p3]).contains_xy(x, y)
                }
                _ => false,
            }
        })
    }

    /// Whether the face depths at `(u, v)` never decrease going down
    /// column `(i, j)`: each top above its bottom, each bottom above the
    /// next top.
    pub fn column_is_monotonic(&self, i: usize, j: usize, u: f64, v: f64) -> bool {
        let mut last = f64::NEG_INFINITY;
        for k in 0..self.nk() {
            let top = self.face_depth(i, j, k, CellFace::Top, u, v);
            let bottom = self.face_depth(i, j, k, CellFace::Bottom, u, v);
            if top < last || bottom < top {
                return false;
            }
            last = bottom;
        }
        true
    }

    fn cut_pillar(&self, i: usize, j: usize, z: f64) -> Result<Point3d, GridError> {
        Plane::horizontal(z)
            .intersect_line(self.pillar(i, j), self.config.tolerance.parallel)
            .map(|hit| hit.point)
            .map_err(|_| GridError::DegeneratePillar { i, j })
    }

    fn face_depth(&self, i: usize, j: usize, k: usize, face: CellFace, u: f64, v: f64) -> f64 {
        self.face_point_from_uv(i, j, k, face, u, v).z
    }

    fn layer_contains(&self, i: usize, j: usize, k: usize, u: f64, v: f64, z: f64) -> bool {
        self.face_depth(i, j, k, CellFace::Top, u, v) <= z && z < self.face_depth(i, j, k, CellFace::Bottom, u, v)
    }

    /// Binary search over layers, assuming depths grow with `k`.
    fn search_layers(&self, i: usize, j: usize, u: f64, v: f64, z: f64) -> Option<usize> {
        let nk = self.nk();
        if nk == 0
            || z < self.face_depth(i, j, 0, CellFace::Top, u, v)
            || z >= self.face_depth(i, j, nk - 1, CellFace::Bottom, u, v)
        {
            return None;
        }

        let (mut lo, mut hi) = (0, nk - 1);
        while hi > lo + 1 {
            let mid = (lo + hi) / 2;
            if z < self.face_depth(i, j, mid, CellFace::Top, u, v) {
                hi = mid - 1;
            } else if z >= self.face_depth(i, j, mid, CellFace::Bottom, u, v) {
                lo = mid + 1;
            } else {
                return Some(mid);
            }
        }
        (lo..=hi).find(|&k| self.layer_contains(i, j, k, u, v, z))
    }
}

//! Sampling a layer face onto a regular, possibly rotated raster.
//!
//! Every column's face is stamped as a quad; gaps that faults open between
//! neighbouring columns are closed with bridging quads. Raster cells no
//! quad reaches can then be filled by averaging their neighbours.

mod fill;
mod stamp;

use pillargrid_geometry::{PlanarRotation, Point3d};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::RasterMode;
use crate::face::CellFace;
use crate::grid2d::Grid2D;
use crate::model::CornerPointGrid;

use stamp::{Frame, bridge_across_i, bridge_across_j, stamp_quad};

/// Layout of a raster: `ni × nj` cells of `dx × dy`, with origin
/// `(x0, y0)` and its axes turned `angle` radians counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterSpec {
    pub ni: usize,
    pub nj: usize,
    pub dx: f64,
    pub dy: f64,
    pub x0: f64,
    pub y0: f64,
    pub angle: f64,
}

impl RasterSpec {
    /// Axis-aligned raster with its origin at `(0, 0)`.
    pub fn new(ni: usize, nj: usize, dx: f64, dy: f64) -> Self {
        Self {
            ni,
            nj,
            dx,
            dy,
            x0: 0.0,
            y0: 0.0,
            angle: 0.0,
        }
    }

    pub fn with_origin(self, x0: f64, y0: f64) -> Self {
        Self { x0, y0, ..self }
    }

    pub fn with_angle(self, angle: f64) -> Self {
        Self { angle, ..self }
    }

    pub fn rotation(&self) -> PlanarRotation {
        PlanarRotation::new(self.angle)
    }

    /// World `(x, y)` of the centre of cell `(p, q)`.
    pub fn cell_center(&self, p: usize, q: usize) -> (f64, f64) {
        let frame = self.frame();
        self.rotation().to_world_xy(
            frame.x0 + 0.5 * self.dx + p as f64 * self.dx,
            frame.y0 + 0.5 * self.dy + q as f64 * self.dy,
        )
    }

    fn frame(&self) -> Frame {
        let (x0, y0) = self.rotation().to_local_xy(self.x0, self.y0);
        Frame {
            x0,
            y0,
            dx: self.dx,
            dy: self.dy,
        }
    }
}

/// How a quad is turned into depths at raster centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceStrategy {
    /// Bilinear patch through the four corners; repeated hits average
    /// pairwise.
    #[default]
    Bilinear,
    /// Two triangles split on the Delaunay diagonal; repeated hits keep a
    /// running mean.
    Triangles,
}

/// Depth samples on a raster.
///
/// `hits` counts quads that reached each cell directly and `filled` marks
/// cells set afterwards by [`fill_by_averaging`](Self::fill_by_averaging),
/// so the two kinds of coverage can be told apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRaster {
    pub values: Grid2D<f64>,
    pub hits: Grid2D<u32>,
    pub filled: Grid2D<bool>,
}

impl SurfaceRaster {
    pub fn new(ni: usize, nj: usize) -> Self {
        Self {
            values: Grid2D::new(ni, nj, 0.0),
            hits: Grid2D::new(ni, nj, 0),
            filled: Grid2D::new(ni, nj, false),
        }
    }

    pub fn for_spec(spec: &RasterSpec) -> Self {
        Self::new(spec.ni, spec.nj)
    }

    pub fn ni(&self) -> usize {
        self.values.ni()
    }

    pub fn nj(&self) -> usize {
        self.values.nj()
    }

    pub fn is_set(&self, p: usize, q: usize) -> bool {
        self.hits[(p, q)] > 0 || self.filled[(p, q)]
    }

    pub fn value(&self, p: usize, q: usize) -> Option<f64> {
        self.is_set(p, q).then(|| self.values[(p, q)])
    }

    /// Cells reached directly by at least one quad.
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h > 0).count()
    }

    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|&&f| f).count()
    }
}

impl CornerPointGrid {
    /// Depths of one face of layer `k` sampled on `spec`, with holes filled
    /// by averaging.
    #[instrument(skip(self, spec), fields(ni = spec.ni, nj = spec.nj))]
    pub fn rasterize_layer(
        &self,
        k: usize,
        face: CellFace,
        spec: &RasterSpec,
        strategy: SurfaceStrategy,
    ) -> SurfaceRaster {
        let mut raster = SurfaceRaster::for_spec(spec);
        self.stamp_layer(&mut raster, k, face, spec, strategy);
        raster.fill_by_averaging();
        raster
    }

    /// Stamp one face of layer `k` onto a caller-owned raster without
    /// filling. Existing samples are averaged with new ones.
    pub fn stamp_layer(
        &self,
        raster: &mut SurfaceRaster,
        k: usize,
        face: CellFace,
        spec: &RasterSpec,
        strategy: SurfaceStrategy,
    ) {
        assert!(k < self.nk(), "layer {k} outside grid");
        assert!(
            raster.ni() == spec.ni && raster.nj() == spec.nj,
            "raster is {}×{}, layout is {}×{}",
            raster.ni(),
            raster.nj(),
            spec.ni,
            spec.nj
        );

        let (stamped, bridges) = match self.config.raster.mode {
            RasterMode::CornerPoint => self.stamp_corner_points(raster, k, face, spec, strategy),
            RasterMode::CellCenters => (self.stamp_cell_centers(raster, k, face, spec, strategy), 0),
        };
        info!(k, ?face, stamped, bridges, "layer stamped");
    }

    /// Face corners of column `(i, j)` in the raster frame, as a ring.
    fn raster_ring(&self, i: usize, j: usize, k: usize, face: CellFace, rot: &PlanarRotation) -> [Point3d; 4] {
        let c = face.offset();
        [(0, 0), (0, 1), (1, 1), (1, 0)].map(|(a, b)| rot.to_local(&self.find_corner_point(i, j, k, a, b, c)))
    }

    fn stamp_corner_points(
        &self,
        raster: &mut SurfaceRaster,
        k: usize,
        face: CellFace,
        spec: &RasterSpec,
        strategy: SurfaceStrategy,
    ) -> (usize, usize) {
        let rot = spec.rotation();
        let frame = spec.frame();
        let tol = self.config.raster.fault_tolerance;
        let (mut stamped, mut bridges) = (0, 0);

        for (i, j) in self.columns() {
            if !self.is_column_active(i, j) {
                continue;
            }
            let corners = self.raster_ring(i, j, k, face, &rot);
            stamped += stamp_quad(raster, &frame, &corners, strategy);

            if j > 0 && self.is_column_active(i, j - 1) {
                let below = self.raster_ring(i, j - 1, k, face, &rot);
                if let Some(quad) = bridge_across_j(&below, &corners, tol) {
                    debug!(i, j, "fault bridged towards j - 1");
                    stamped += stamp_quad(raster, &frame, &quad, strategy);
                    bridges += 1;
                }
            }
            if i > 0 && self.is_column_active(i - 1, j) {
                let prev = self.raster_ring(i - 1, j, k, face, &rot);
                if let Some(quad) = bridge_across_i(&prev, &corners, tol) {
                    debug!(i, j, "fault bridged towards i - 1");
                    stamped += stamp_quad(raster, &frame, &quad, strategy);
                    bridges += 1;
                }
            }
        }
        (stamped, bridges)
    }

    /// Quads through the face centres of each 2×2 block of columns whose
    /// nine pillars are all active.
    fn stamp_cell_centers(
        &self,
        raster: &mut SurfaceRaster,
        k: usize,
        face: CellFace,
        spec: &RasterSpec,
        strategy: SurfaceStrategy,
    ) -> usize {
        let rot = spec.rotation();
        let frame = spec.frame();
        let mut stamped = 0;
        for j in 0..self.nj().saturating_sub(1) {
            for i in 0..self.ni().saturating_sub(1) {
                let block_active = (0..3).all(|b| (0..3).all(|a| self.is_pillar_active(i + a, j + b)));
                if !block_active || !self.is_column_active(i, j) {
                    continue;
                }
                let quad = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)]
                    .map(|(ci, cj)| rot.to_local(&self.face_point_from_uv(ci, cj, k, face, 0.5, 0.5)));
                stamped += stamp_quad(raster, &frame, &quad, strategy);
            }
        }
        stamped
    }
}

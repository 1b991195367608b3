//! Spatial queries over corner-point grids.
//!
//! A corner-point grid hangs `ni × nj` columns of cells between
//! `(ni+1) × (nj+1)` pillars. Each cell stores eight depths that place its
//! corners on the four surrounding pillars, so neighbouring cells need not
//! share corners (faults) and cells may be non-convex or inactive.
//!
//! Depth `z` grows downwards throughout: the top of a cell is its shallower
//! face.

pub mod boundary;
pub mod config;
pub mod error;
pub mod face;
pub mod grid2d;
pub mod locate;
pub mod model;
pub mod raster;

pub use boundary::Boundaries;
pub use config::{
    BoundaryMode, GridConfig, LocateConfig, OverturnedPolicy, RasterConfig, RasterMode,
};
pub use error::GridError;
pub use face::CellFace;
pub use grid2d::Grid2D;
pub use model::CornerPointGrid;
pub use raster::{RasterSpec, SurfaceRaster, SurfaceStrategy};

pub use pillargrid_geometry as geometry;

use serde::{Deserialize, Serialize};

/// Number of cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub ni: usize,
    pub nj: usize,
    pub nk: usize,
}

impl GridDims {
    pub fn new(ni: usize, nj: usize, nk: usize) -> Self {
        Self { ni, nj, nk }
    }

    pub fn cell_count(&self) -> usize {
        self.ni * self.nj * self.nk
    }

    pub fn pillar_count(&self) -> usize {
        (self.ni + 1) * (self.nj + 1)
    }
}

/// Logical address of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl CellIndex {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }
}

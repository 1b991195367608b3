use std::sync::OnceLock;

use pillargrid_geometry::{Line3d, Point3d};
use tracing::{info, instrument};

use crate::boundary::Boundaries;
use crate::config::GridConfig;
use crate::error::GridError;
use crate::face::CellFace;
use crate::grid2d::Grid2D;
use crate::{CellIndex, GridDims};

/// A corner-point grid: pillars, corner depths and the active-cell mask.
///
/// Built once, then queried. All queries take `&self`; the outlines used
/// by point location are derived on first use and cached until the
/// active mask or the geometry is edited.
#[derive(Debug, Clone)]
pub struct CornerPointGrid {
    dims: GridDims,
    pillars: Grid2D<Line3d>,
    active_pillars: Grid2D<bool>,
    zcorn: Vec<f64>,
    actnum: Vec<bool>,
    pub(crate) config: GridConfig,
    pub(crate) boundaries: OnceLock<Boundaries>,
}

impl CornerPointGrid {
    /// Zeroed grid with every cell inactive.
    pub fn new(dims: GridDims) -> Self {
        Self::with_config(dims, GridConfig::default())
    }

    pub fn with_config(dims: GridDims, config: GridConfig) -> Self {
        Self {
            dims,
            pillars: Grid2D::new(dims.ni + 1, dims.nj + 1, Line3d::default()),
            active_pillars: Grid2D::new(dims.ni + 1, dims.nj + 1, false),
            zcorn: vec![0.0; 8 * dims.cell_count()],
            actnum: vec![false; dims.cell_count()],
            config,
            boundaries: OnceLock::new(),
        }
    }

    /// Build from the flat arrays of a grid keyword file.
    ///
    /// `coord` holds `x1 y1 z1 x2 y2 z2` per pillar with `i` running
    /// fastest, `zcorn` is in storage order, and any non-zero `actnum`
    /// entry marks an active cell.
    #[instrument(skip(coord, zcorn, actnum))]
    pub fn from_keywords(
        dims: GridDims,
        coord: &[f64],
        zcorn: &[f64],
        actnum: &[i32],
    ) -> Result<Self, GridError> {
        check_len("COORD", 6 * dims.pillar_count(), coord.len())?;
        check_len("ZCORN", 8 * dims.cell_count(), zcorn.len())?;
        check_len("ACTNUM", dims.cell_count(), actnum.len())?;

        let pillars: Vec<Line3d> = coord
            .chunks_exact(6)
            .map(|c| {
                Line3d::segment(Point3d::new(c[0], c[1], c[2]), Point3d::new(c[3], c[4], c[5]))
            })
            .collect();

        let mut grid = Self::new(dims);
        if let Some(pillars) = Grid2D::from_vec(dims.ni + 1, dims.nj + 1, pillars) {
            grid.pillars = pillars;
        }
        grid.zcorn.copy_from_slice(zcorn);
        for (dst, &src) in grid.actnum.iter_mut().zip(actnum) {
            *dst = src != 0;
        }
        grid.initialize_active_pillars();

        info!(
            ni = dims.ni,
            nj = dims.nj,
            nk = dims.nk,
            active = grid.actnum.iter().filter(|a| **a).count(),
            "corner-point grid built"
        );
        Ok(grid)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn ni(&self) -> usize {
        self.dims.ni
    }

    pub fn nj(&self) -> usize {
        self.dims.nj
    }

    pub fn nk(&self) -> usize {
        self.dims.nk
    }

    fn invalidate(&mut self) {
        self.boundaries.take();
    }

    // ─── Keyword export ──────────────────────────────────────────────────────

    pub fn coord(&self) -> Vec<f64> {
        self.pillars
            .iter()
            .flat_map(|l| [l.start.x, l.start.y, l.start.z, l.end.x, l.end.y, l.end.z])
            .collect()
    }

    pub fn zcorn(&self) -> &[f64] {
        &self.zcorn
    }

    pub fn actnum(&self) -> Vec<i32> {
        self.actnum.iter().map(|&a| i32::from(a)).collect()
    }

    // ─── Pillars ─────────────────────────────────────────────────────────────

    pub fn pillar(&self, i: usize, j: usize) -> &Line3d {
        &self.pillars[(i, j)]
    }

    pub fn set_pillar(&mut self, i: usize, j: usize, line: Line3d) {
        self.pillars[(i, j)] = line;
        self.invalidate();
    }

    pub fn is_pillar_active(&self, i: usize, j: usize) -> bool {
        self.active_pillars[(i, j)]
    }

    /// Point where pillar `(i, j)` reaches depth `z`. The line is extended
    /// past its end points if needed. A pillar without vertical extent
    /// yields its top `(x, y)` at depth `z`.
    pub fn point_at_pillar(&self, i: usize, j: usize, z: f64) -> Point3d {
        let pillar = &self.pillars[(i, j)];
        let dir = pillar.direction();
        if dir.z == 0.0 {
            return pillar.start.with_z(z);
        }
        let t = (z - pillar.start.z) / dir.z;
        Point3d::new(pillar.start.x + t * dir.x, pillar.start.y + t * dir.y, z)
    }

    /// Like [`point_at_pillar`](Self::point_at_pillar) with `z` clamped to
    /// the depth range of the active cells touching the pillar.
    pub fn point_at_pillar_inside_grid(&self, i: usize, j: usize, z: f64) -> Option<Point3d> {
        let top = self
            .pillar_columns(i, j)
            .filter_map(|(ci, cj, a, b)| {
                self.top_active_cell(ci, cj)
                    .map(|k| self.zcorner(ci, cj, k, a, b, 0))
            })
            .reduce(f64::min)?;
        let bottom = self
            .pillar_columns(i, j)
            .filter_map(|(ci, cj, a, b)| {
                self.bottom_active_cell(ci, cj)
                    .map(|k| self.zcorner(ci, cj, k, a, b, 1))
            })
            .reduce(f64::max)?;
        let z = if z < top { top } else { z.min(bottom) };
        Some(self.point_at_pillar(i, j, z))
    }

    /// Columns touching pillar `(i, j)`, each with the corner offsets
    /// `(a, b)` that land on the pillar.
    pub(crate) fn pillar_columns(
        &self,
        i: usize,
        j: usize,
    ) -> impl Iterator<Item = (usize, usize, usize, usize)> + use<> {
        let (ni, nj) = (self.dims.ni, self.dims.nj);
        [(0usize, 0usize), (1, 0), (0, 1), (1, 1)]
            .into_iter()
            .filter_map(move |(a, b)| {
                let ci = i.checked_sub(a)?;
                let cj = j.checked_sub(b)?;
                (ci < ni && cj < nj).then_some((ci, cj, a, b))
            })
    }

    /// Mean distance between horizontally or vertically neighbouring
    /// active pillars at depth `z`.
    pub fn mean_pillar_distance(&self, z: f64) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for j in 0..=self.dims.nj {
            for i in 0..=self.dims.ni {
                if !self.is_pillar_active(i, j) {
                    continue;
                }
                let p = self.point_at_pillar(i, j, z);
                if i > 0 && self.is_pillar_active(i - 1, j) {
                    sum += p.distance_to(&self.point_at_pillar(i - 1, j, z));
                    count += 1;
                }
                if j > 0 && self.is_pillar_active(i, j - 1) {
                    sum += p.distance_to(&self.point_at_pillar(i, j - 1, z));
                    count += 1;
                }
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    // ─── Corner depths ───────────────────────────────────────────────────────

    /// Position of corner `(a, b, c)` of cell `(i, j, k)` in the flat depth
    /// array. `a`, `b` pick the pillar side and `c` is 0 for the top face.
    pub fn find_zcorner_index(&self, i: usize, j: usize, k: usize, a: usize, b: usize, c: usize) -> usize {
        let GridDims { ni, nj, nk } = self.dims;
        assert!(i < ni && j < nj && k < nk, "cell ({i}, {j}, {k}) outside grid");
        debug_assert!(a < 2 && b < 2 && c < 2);
        2 * i + a + 2 * ni * (2 * j + b) + 4 * ni * nj * (2 * k + c)
    }

    pub fn zcorner(&self, i: usize, j: usize, k: usize, a: usize, b: usize, c: usize) -> f64 {
        self.zcorn[self.find_zcorner_index(i, j, k, a, b, c)]
    }

    pub fn set_zcorner(&mut self, i: usize, j: usize, k: usize, a: usize, b: usize, c: usize, z: f64) {
        let idx = self.find_zcorner_index(i, j, k, a, b, c);
        self.zcorn[idx] = z;
        self.invalidate();
    }

    pub fn find_corner_point(&self, i: usize, j: usize, k: usize, a: usize, b: usize, c: usize) -> Point3d {
        self.point_at_pillar(i + a, j + b, self.zcorner(i, j, k, a, b, c))
    }

    /// The four corners of one face, ordered `(0,0), (1,0), (0,1), (1,1)`.
    pub fn face_corners(&self, i: usize, j: usize, k: usize, face: CellFace) -> [Point3d; 4] {
        let c = face.offset();
        [(0, 0), (1, 0), (0, 1), (1, 1)].map(|(a, b)| self.find_corner_point(i, j, k, a, b, c))
    }

    pub fn find_cell_center_point(&self, i: usize, j: usize, k: usize) -> Point3d {
        let top = self.face_corners(i, j, k, CellFace::Top);
        let bottom = self.face_corners(i, j, k, CellFace::Bottom);
        let all: Vec<Point3d> = top.into_iter().chain(bottom).collect();
        Point3d::centroid(&all)
    }

    pub fn find_face_center_point(&self, i: usize, j: usize, k: usize, face: CellFace) -> Point3d {
        Point3d::centroid(&self.face_corners(i, j, k, face))
    }

    /// Sum of the four corner-stack heights (bottom minus top) of a cell.
    pub fn cell_thickness(&self, i: usize, j: usize, k: usize) -> f64 {
        [(0, 0), (1, 0), (1, 1), (0, 1)]
            .iter()
            .map(|&(a, b)| self.zcorner(i, j, k, a, b, 1) - self.zcorner(i, j, k, a, b, 0))
            .sum()
    }

    /// Shallowest top corner of a cell, if its column has any active cell.
    pub fn z_top_in_cell(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        self.is_column_active(i, j).then(|| {
            [(0, 0), (1, 0), (0, 1), (1, 1)]
                .iter()
                .map(|&(a, b)| self.zcorner(i, j, k, a, b, 0))
                .fold(f64::INFINITY, f64::min)
        })
    }

    /// Deepest bottom corner of a cell, if its column has any active cell.
    pub fn z_bottom_in_cell(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        self.is_column_active(i, j).then(|| {
            [(0, 0), (1, 0), (0, 1), (1, 1)]
                .iter()
                .map(|&(a, b)| self.zcorner(i, j, k, a, b, 1))
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }

    // ─── Active cells ────────────────────────────────────────────────────────

    pub fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        let GridDims { ni, nj, nk } = self.dims;
        assert!(i < ni && j < nj && k < nk, "cell ({i}, {j}, {k}) outside grid");
        i + j * ni + k * ni * nj
    }

    pub fn cell_ijk(&self, index: usize) -> CellIndex {
        assert!(index < self.actnum.len(), "cell index {index} outside grid");
        let GridDims { ni, nj, .. } = self.dims;
        CellIndex::new(index % ni, (index / ni) % nj, index / (ni * nj))
    }

    pub fn is_active(&self, i: usize, j: usize, k: usize) -> bool {
        self.actnum[self.cell_index(i, j, k)]
    }

    pub fn is_active_index(&self, index: usize) -> bool {
        self.actnum[index]
    }

    pub fn set_active(&mut self, i: usize, j: usize, k: usize, active: bool) {
        let idx = self.cell_index(i, j, k);
        self.actnum[idx] = active;
        self.refresh_pillars_around(i, j);
        self.invalidate();
    }

    pub fn set_active_index(&mut self, index: usize, active: bool) {
        let CellIndex { i, j, k } = self.cell_ijk(index);
        self.set_active(i, j, k, active);
    }

    pub fn is_column_active(&self, i: usize, j: usize) -> bool {
        (0..self.dims.nk).any(|k| self.is_active(i, j, k))
    }

    /// Shallowest active layer in column `(i, j)`.
    pub fn top_active_cell(&self, i: usize, j: usize) -> Option<usize> {
        (0..self.dims.nk).find(|&k| self.is_active(i, j, k))
    }

    /// Deepest active layer in column `(i, j)`.
    pub fn bottom_active_cell(&self, i: usize, j: usize) -> Option<usize> {
        (0..self.dims.nk).rev().find(|&k| self.is_active(i, j, k))
    }

    pub fn top_active_layer(&self) -> Option<usize> {
        self.columns()
            .filter_map(|(i, j)| self.top_active_cell(i, j))
            .min()
    }

    pub fn bottom_active_layer(&self) -> Option<usize> {
        self.columns()
            .filter_map(|(i, j)| self.bottom_active_cell(i, j))
            .max()
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (ni, nj) = (self.dims.ni, self.dims.nj);
        (0..nj).flat_map(move |j| (0..ni).map(move |i| (i, j)))
    }

    fn initialize_active_pillars(&mut self) {
        self.active_pillars.fill(false);
        for (i, j) in self.columns() {
            if self.is_column_active(i, j) {
                for (a, b) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    self.active_pillars[(i + a, j + b)] = true;
                }
            }
        }
    }

    /// Re-derive the four pillars around column `(i, j)`.
    fn refresh_pillars_around(&mut self, i: usize, j: usize) {
        for (a, b) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (pi, pj) = (i + a, j + b);
            let active = self
                .pillar_columns(pi, pj)
                .any(|(ci, cj, _, _)| self.is_column_active(ci, cj));
            self.active_pillars[(pi, pj)] = active;
        }
    }

    // ─── Extremes ────────────────────────────────────────────────────────────

    /// Shallowest and deepest corner depth over all active cells.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        let GridDims { ni, nj, .. } = self.dims;
        let mut range: Option<(f64, f64)> = None;
        for (idx, _) in self.actnum.iter().enumerate().filter(|(_, a)| **a) {
            let CellIndex { i, j, k } = self.cell_ijk(idx);
            for c in 0..2 {
                for b in 0..2 {
                    let base = 2 * i + 2 * ni * (2 * j + b) + 4 * ni * nj * (2 * k + c);
                    for z in &self.zcorn[base..base + 2] {
                        range = Some(match range {
                            None => (*z, *z),
                            Some((lo, hi)) => (lo.min(*z), hi.max(*z)),
                        });
                    }
                }
            }
        }
        range
    }

    /// Per pillar, the shallowest and deepest corner of the active cells
    /// touching it. `None` for pillars with no active neighbour.
    pub fn column_extreme_points(&self) -> Grid2D<Option<(Point3d, Point3d)>> {
        let GridDims { ni, nj, nk } = self.dims;
        let mut out = Grid2D::new(ni + 1, nj + 1, None);
        for j in 0..=nj {
            for i in 0..=ni {
                let mut extreme: Option<(Point3d, Point3d)> = None;
                for (ci, cj, a, b) in self.pillar_columns(i, j) {
                    for k in (0..nk).filter(|&k| self.is_active(ci, cj, k)) {
                        for c in 0..2 {
                            let p = self.find_corner_point(ci, cj, k, a, b, c);
                            extreme = Some(match extreme {
                                None => (p, p),
                                Some((top, bot)) => (
                                    if p.z < top.z { p } else { top },
                                    if p.z > bot.z { p } else { bot },
                                ),
                            });
                        }
                    }
                }
                out[(i, j)] = extreme;
            }
        }
        out
    }
}

fn check_len(keyword: &'static str, expected: usize, actual: usize) -> Result<(), GridError> {
    if expected == actual {
        Ok(())
    } else {
        Err(GridError::InputLength {
            keyword,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Box grid of `ni × nj × nk` unit-spaced columns with vertical pillars
    /// and layers `dz` thick starting at `z0`, all cells active.
    pub(crate) fn box_grid(ni: usize, nj: usize, nk: usize, dx: f64, z0: f64, dz: f64) -> CornerPointGrid {
        let dims = GridDims::new(ni, nj, nk);
        let mut coord = Vec::with_capacity(6 * dims.pillar_count());
        for j in 0..=nj {
            for i in 0..=ni {
                let (x, y) = (i as f64 * dx, j as f64 * dx);
                coord.extend_from_slice(&[x, y, z0, x, y, z0 + nk as f64 * dz]);
            }
        }
        let mut zcorn = vec![0.0; 8 * dims.cell_count()];
        for k in 0..nk {
            for c in 0..2 {
                let z = z0 + (k + c) as f64 * dz;
                for b in 0..2 {
                    for j in 0..nj {
                        for i in 0..ni {
                            for a in 0..2 {
                                zcorn[2 * i + a + 2 * ni * (2 * j + b) + 4 * ni * nj * (2 * k + c)] = z;
                            }
                        }
                    }
                }
            }
        }
        let actnum = vec![1; dims.cell_count()];
        CornerPointGrid::from_keywords(dims, &coord, &zcorn, &actnum).unwrap()
    }

    #[test]
    fn test_from_keywords_rejects_bad_lengths() {
        let dims = GridDims::new(1, 1, 1);
        let err = CornerPointGrid::from_keywords(dims, &[0.0; 23], &[0.0; 8], &[1]).unwrap_err();
        assert_eq!(
            err,
            GridError::InputLength {
                keyword: "COORD",
                expected: 24,
                actual: 23
            }
        );
        let err = CornerPointGrid::from_keywords(dims, &[0.0; 24], &[0.0; 8], &[]).unwrap_err();
        assert!(matches!(err, GridError::InputLength { keyword: "ACTNUM", .. }));
    }

    #[test]
    fn test_keyword_round_trip() {
        let grid = box_grid(2, 3, 2, 10.0, 1000.0, 5.0);
        let again =
            CornerPointGrid::from_keywords(grid.dims(), &grid.coord(), grid.zcorn(), &grid.actnum()).unwrap();
        assert_eq!(again.coord(), grid.coord());
        assert_eq!(again.zcorn(), grid.zcorn());
        assert_eq!(again.actnum(), grid.actnum());
    }

    #[test]
    fn test_zcorner_index_layout() {
        let grid = box_grid(3, 2, 2, 1.0, 0.0, 1.0);
        assert_eq!(grid.find_zcorner_index(0, 0, 0, 0, 0, 0), 0);
        assert_eq!(grid.find_zcorner_index(0, 0, 0, 1, 0, 0), 1);
        assert_eq!(grid.find_zcorner_index(1, 0, 0, 0, 0, 0), 2);
        assert_eq!(grid.find_zcorner_index(0, 0, 0, 0, 1, 0), 6);
        assert_eq!(grid.find_zcorner_index(0, 0, 0, 0, 0, 1), 24);
        assert_eq!(grid.find_zcorner_index(2, 1, 1, 1, 1, 1), 95);
    }

    #[test]
    fn test_cell_index_round_trip() {
        let grid = box_grid(3, 4, 5, 1.0, 0.0, 1.0);
        for idx in 0..grid.dims().cell_count() {
            let CellIndex { i, j, k } = grid.cell_ijk(idx);
            assert_eq!(grid.cell_index(i, j, k), idx);
        }
    }

    #[test]
    fn test_point_at_inclined_pillar() {
        let mut grid = CornerPointGrid::new(GridDims::new(1, 1, 1));
        grid.set_pillar(0, 0, Line3d::segment(Point3d::new(0.0, 0.0, 0.0), Point3d::new(10.0, 0.0, 100.0)));
        let p = grid.point_at_pillar(0, 0, 50.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.z - 50.0).abs() < 1e-12);
        let beyond = grid.point_at_pillar(0, 0, 200.0);
        assert!((beyond.x - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_horizontal_pillar_keeps_top_xy() {
        let mut grid = CornerPointGrid::new(GridDims::new(1, 1, 1));
        let top = Point3d::new(3.0, 4.0, 7.0);
        grid.set_pillar(1, 1, Line3d::segment(top, top));
        let p = grid.point_at_pillar(1, 1, 99.0);
        assert_eq!((p.x, p.y, p.z), (3.0, 4.0, 99.0));
    }

    #[test]
    fn test_active_pillars_follow_mask() {
        let mut grid = box_grid(2, 2, 1, 1.0, 0.0, 1.0);
        assert!(grid.is_pillar_active(1, 1));
        for (i, j) in [(0, 0), (1, 0), (0, 1)] {
            grid.set_active(i, j, 0, false);
        }
        assert!(!grid.is_pillar_active(0, 0));
        assert!(grid.is_pillar_active(1, 1));
        assert!(grid.is_pillar_active(2, 2));
        grid.set_active_index(grid.cell_index(1, 1, 0), false);
        assert!(!grid.is_pillar_active(1, 1));
        assert!(!grid.is_pillar_active(2, 2));
    }

    #[test]
    fn test_active_layers() {
        let mut grid = box_grid(2, 1, 4, 1.0, 0.0, 1.0);
        grid.set_active(0, 0, 0, false);
        grid.set_active(1, 0, 3, false);
        assert_eq!(grid.top_active_cell(0, 0), Some(1));
        assert_eq!(grid.bottom_active_cell(1, 0), Some(2));
        assert_eq!(grid.top_active_layer(), Some(0));
        assert_eq!(grid.bottom_active_layer(), Some(3));
        for k in 0..4 {
            grid.set_active(0, 0, k, false);
        }
        assert_eq!(grid.top_active_cell(0, 0), None);
        assert!(!grid.is_column_active(0, 0));
    }

    #[test]
    fn test_cell_measures() {
        let grid = box_grid(1, 1, 2, 10.0, 100.0, 4.0);
        assert!((grid.cell_thickness(0, 0, 1) - 16.0).abs() < 1e-12);
        let centre = grid.find_cell_center_point(0, 0, 1);
        assert!((centre.x - 5.0).abs() < 1e-12);
        assert!((centre.z - 106.0).abs() < 1e-12);
        let bottom = grid.find_face_center_point(0, 0, 1, CellFace::Bottom);
        assert!((bottom.z - 108.0).abs() < 1e-12);
        assert_eq!(grid.z_top_in_cell(0, 0, 1), Some(104.0));
        assert_eq!(grid.z_bottom_in_cell(0, 0, 0), Some(104.0));
    }

    #[test]
    fn test_elevation_range_ignores_inactive() {
        let mut grid = box_grid(1, 1, 3, 1.0, 10.0, 5.0);
        assert_eq!(grid.elevation_range(), Some((10.0, 25.0)));
        grid.set_active(0, 0, 0, false);
        assert_eq!(grid.elevation_range(), Some((15.0, 25.0)));
        grid.set_active(0, 0, 1, false);
        grid.set_active(0, 0, 2, false);
        assert_eq!(grid.elevation_range(), None);
    }

    #[test]
    fn test_point_inside_grid_clamps() {
        let grid = box_grid(1, 1, 2, 1.0, 10.0, 5.0);
        let p = grid.point_at_pillar_inside_grid(0, 0, 0.0).unwrap();
        assert!((p.z - 10.0).abs() < 1e-12);
        let p = grid.point_at_pillar_inside_grid(1, 1, 100.0).unwrap();
        assert!((p.z - 20.0).abs() < 1e-12);
        let p = grid.point_at_pillar_inside_grid(1, 0, 12.0).unwrap();
        assert!((p.z - 12.0).abs() < 1e-12);

        let empty = CornerPointGrid::new(GridDims::new(1, 1, 1));
        assert!(empty.point_at_pillar_inside_grid(0, 0, 0.0).is_none());
    }

    #[test]
    fn test_mean_pillar_distance() {
        let grid = box_grid(2, 2, 1, 10.0, 0.0, 1.0);
        assert!((grid.mean_pillar_distance(0.5).unwrap() - 10.0).abs() < 1e-12);
        assert!(CornerPointGrid::new(GridDims::new(1, 1, 1)).mean_pillar_distance(0.0).is_none());
    }

    #[test]
    fn test_column_extreme_points() {
        let grid = box_grid(2, 1, 3, 1.0, 0.0, 2.0);
        let extremes = grid.column_extreme_points();
        let (top, bot) = extremes[(1, 0)].unwrap();
        assert!((top.z - 0.0).abs() < 1e-12);
        assert!((bot.z - 6.0).abs() < 1e-12);
        assert!((top.x - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_cell_index_out_of_range() {
        let grid = box_grid(1, 1, 1, 1.0, 0.0, 1.0);
        grid.cell_index(1, 0, 0);
    }
}

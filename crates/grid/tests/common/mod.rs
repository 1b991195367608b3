//! Grid builders shared by the integration tests.
#![allow(dead_code)]

use pillargrid::{CornerPointGrid, GridConfig, GridDims};

/// Flat-array keywords for a grid; `pillar(i, j)` gives the pillar's top
/// and bottom points and `depth(i, j, k, a, b, c)` each corner depth.
pub fn build(
    dims: GridDims,
    pillar: impl Fn(usize, usize) -> [f64; 6],
    depth: impl Fn(usize, usize, usize, usize, usize, usize) -> f64,
    config: GridConfig,
) -> CornerPointGrid {
    let GridDims { ni, nj, nk } = dims;
    let mut coord = Vec::with_capacity(6 * dims.pillar_count());
    for j in 0..=nj {
        for i in 0..=ni {
            coord.extend_from_slice(&pillar(i, j));
        }
    }
    let mut zcorn = vec![0.0; 8 * dims.cell_count()];
    for k in 0..nk {
        for j in 0..nj {
            for i in 0..ni {
                for c in 0..2 {
                    for b in 0..2 {
                        for a in 0..2 {
                            let idx = 2 * i + a + 2 * ni * (2 * j + b) + 4 * ni * nj * (2 * k + c);
                            zcorn[idx] = depth(i, j, k, a, b, c);
                        }
                    }
                }
            }
        }
    }
    let actnum = vec![1; dims.cell_count()];
    let mut grid = CornerPointGrid::from_keywords(dims, &coord, &zcorn, &actnum).unwrap();
    grid.set_config(config);
    grid
}

/// Vertical pillars `dx` apart, layers `dz` thick from `z0`.
pub fn box_grid(ni: usize, nj: usize, nk: usize, dx: f64, z0: f64, dz: f64) -> CornerPointGrid {
    let bottom = z0 + nk as f64 * dz;
    build(
        GridDims::new(ni, nj, nk),
        |i, j| {
            let (x, y) = (i as f64 * dx, j as f64 * dx);
            [x, y, z0, x, y, bottom]
        },
        |_, _, k, _, _, c| z0 + (k + c) as f64 * dz,
        GridConfig::default(),
    )
}

/// Two 10×10 columns side by side along `i`. The middle pillar leans as
/// `x = 10 + 0.1·z`; the left cell spans z 10..20 and the right one
/// z 40..50, so their shared corners sit 3 apart in x.
pub fn faulted_along_i() -> CornerPointGrid {
    build(
        GridDims::new(2, 1, 1),
        |i, j| {
            let y = 10.0 * j as f64;
            match i {
                0 => [0.0, y, 0.0, 0.0, y, 100.0],
                1 => [10.0, y, 0.0, 20.0, y, 100.0],
                _ => [20.0, y, 0.0, 20.0, y, 100.0],
            }
        },
        |i, _, _, _, _, c| (if i == 0 { 10.0 } else { 40.0 }) + 10.0 * c as f64,
        GridConfig::default(),
    )
}

/// The same fault turned to run along `j`.
pub fn faulted_along_j() -> CornerPointGrid {
    build(
        GridDims::new(1, 2, 1),
        |i, j| {
            let x = 10.0 * i as f64;
            match j {
                0 => [x, 0.0, 0.0, x, 0.0, 100.0],
                1 => [x, 10.0, 0.0, x, 20.0, 100.0],
                _ => [x, 20.0, 0.0, x, 20.0, 100.0],
            }
        },
        |_, j, _, _, _, c| (if j == 0 { 10.0 } else { 40.0 }) + 10.0 * c as f64,
        GridConfig::default(),
    )
}

/// Reverse fault along `j`: the middle pillar leans as `y = 10 - 0.1·z`,
/// so the upper cell (top at z 40) starts at y 6 while the lower one
/// (top at z 10) reaches y 9.
pub fn overlapping_along_j() -> CornerPointGrid {
    build(
        GridDims::new(1, 2, 1),
        |i, j| {
            let x = 10.0 * i as f64;
            match j {
                0 => [x, 0.0, 0.0, x, 0.0, 100.0],
                1 => [x, 10.0, 0.0, x, 0.0, 100.0],
                _ => [x, 20.0, 0.0, x, 20.0, 100.0],
            }
        },
        |_, j, _, _, _, c| (if j == 0 { 10.0 } else { 40.0 }) + 10.0 * c as f64,
        GridConfig::default(),
    )
}

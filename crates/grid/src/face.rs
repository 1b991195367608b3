//! Parametric model of cell faces and its inverse.
//!
//! A face is addressed by local coordinates `(u, v) ∈ [0,1]²`, `u` running
//! along `i` and `v` along `j`.

use pillargrid_geometry::{Point3d, Roots, Tolerance, Vec3, solve_quadratic};

use crate::error::GridError;
use crate::model::CornerPointGrid;

/// Relative size below which a coefficient counts as zero.
const REL_ZERO: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CellFace {
    Top,
    Bottom,
}

impl CellFace {
    /// The `c` corner offset selecting this face.
    pub fn offset(self) -> usize {
        match self {
            CellFace::Top => 0,
            CellFace::Bottom => 1,
        }
    }
}

impl CornerPointGrid {
    /// Point on a cell face at local coordinates `(u, v)`.
    ///
    /// Each face corner `p` is paired with the two points where the
    /// corner's own pillar reaches the depths of its `i` and `j`
    /// neighbours on the same face. Those twelve points give a surface that
    /// is quadratic in each parameter, so face edges can follow pillars
    /// whose spacing changes with depth. The four face corners are
    /// reproduced exactly at the parameter corners.
    pub fn face_point_from_uv(&self, i: usize, j: usize, k: usize, face: CellFace, u: f64, v: f64) -> Point3d {
        let c = face.offset();
        let z = |a: usize, b: usize| self.zcorner(i, j, k, a, b, c);
        let at = |pi: usize, pj: usize, depth: f64| self.point_at_pillar(pi, pj, depth).to_vec3();

        let (z00, z10, z01, z11) = (z(0, 0), z(1, 0), z(0, 1), z(1, 1));

        let p00 = at(i, j, z00);
        let q00 = at(i, j, z10);
        let r00 = at(i, j, z01);

        let p10 = at(i + 1, j, z10);
        let q10 = at(i + 1, j, z00);
        let r10 = at(i + 1, j, z11);

        let p01 = at(i, j + 1, z01);
        let q01 = at(i, j + 1, z11);
        let r01 = at(i, j + 1, z00);

        let p11 = at(i + 1, j + 1, z11);
        let q11 = at(i + 1, j + 1, z01);
        let r11 = at(i + 1, j + 1, z10);

        let s_lower = p00 + p10 - q00 - q10;
        let s_right = p10 + p11 - r10 - r11;
        let s_upper = p01 + p11 - q01 - q11;
        let s_left = p00 + p01 - r00 - r01;
        let bend = r10 + r11 - p10 * 2.0;

        let a2 = s_upper - s_lower - bend;
        let b2 = bend;
        let c2 = s_lower;

        let a1 = s_lower + s_right - s_upper - s_left + bend;
        let b1 = -(r00 + r01 - p00 * 2.0);
        let c1 = q00 + q10 - p00 * 2.0;

        let a0 = s_left;
        let b0 = r00 + r01 - p00 * 2.0;
        let c0 = p00;

        let quad = |a: Vec3, b: Vec3, c: Vec3| a * (v * v) + b * v + c;
        Point3d::from_vec3(quad(a2, b2, c2) * (u * u) + quad(a1, b1, c1) * u + quad(a0, b0, c0))
    }

    /// Point inside a cell, `w` blending from the top face (0) to the
    /// bottom face (1).
    pub fn point_in_cell(&self, i: usize, j: usize, k: usize, u: f64, v: f64, w: f64) -> Point3d {
        let top = self.face_point_from_uv(i, j, k, CellFace::Top, u, v);
        let bottom = self.face_point_from_uv(i, j, k, CellFace::Bottom, u, v);
        top.lerp(&bottom, w)
    }

    /// Local `(u, v)` of `(x, y)` within column `(i, j)` at depth `z`.
    ///
    /// The four pillars are cut at `z` and the resulting quad is treated as
    /// the bilinear patch `p(u,v) = u·v·a + u·b + v·c + d`. Eliminating `u`
    /// leaves a quadratic in `v`; the root inside `[0, 1]` is preferred.
    /// A parameter the equations do not constrain is reported as 0.
    pub fn uv_from_xy(&self, i: usize, j: usize, z: f64, x: f64, y: f64) -> Result<(f64, f64), GridError> {
        let p00 = self.point_at_pillar(i, j, z);
        let p10 = self.point_at_pillar(i + 1, j, z);
        let p01 = self.point_at_pillar(i, j + 1, z);
        let p11 = self.point_at_pillar(i + 1, j + 1, z);

        let (bx, by) = (p10.x - p00.x, p10.y - p00.y);
        let (cx, cy) = (p01.x - p00.x, p01.y - p00.y);
        let (dx, dy) = (p00.x, p00.y);
        let scale = bx.abs().max(by.abs()).max(cx.abs()).max(cy.abs());
        let snap = |value: f64, size: f64| if value.abs() <= REL_ZERO * size { 0.0 } else { value };

        let ax = snap(p00.x + p11.x - p10.x - p01.x, scale);
        let ay = snap(p00.y + p11.y - p10.y - p01.y, scale);
        let bx = snap(bx, scale);
        let cx = snap(cx, scale);

        let degenerate = GridError::DegenerateCell { i, j };

        if ax == 0.0 && bx == 0.0 {
            // x depends on v alone
            if cx == 0.0 {
                return Err(degenerate);
            }
            let v = (x - dx) / cx;
            if ay == 0.0 && snap(by, scale) == 0.0 {
                return Err(degenerate);
            }
            let denom = ay * v + by;
            let u = if denom != 0.0 { (y - cy * v - dy) / denom } else { 0.0 };
            return Ok((u, v));
        }

        let (rx, ry) = (x - dx, y - dy);
        let qa = snap(ax * cy - ay * cx, scale * scale);
        let qb = bx * cy - by * cx + rx * ay - ry * ax;
        let qc = rx * by - ry * bx;

        let u_for = |v: f64| {
            let den_x = ax * v + bx;
            let den_y = ay * v + by;
            if den_x == 0.0 && den_y == 0.0 {
                0.0
            } else if den_x.abs() >= den_y.abs() {
                (rx - cx * v) / den_x
            } else {
                (ry - cy * v) / den_y
            }
        };

        let v = match solve_quadratic(qa, snap(qb, scale * scale), snap(qc, scale * scale)) {
            Roots::None => return Err(degenerate),
            Roots::All => 0.0,
            Roots::One(v) => v,
            Roots::Two(plus, minus) => {
                pick_root([(plus, u_for(plus)), (minus, u_for(minus))], &self.config.tolerance)
            }
        };
        Ok((u_for(v), v))
    }
}

/// Choose between the `+√` and `−√` roots. A root whose `(u, v)` lies in
/// the unit square wins, then one with `v` in `[0, 1]`, then the `+√` root.
fn pick_root(candidates: [(f64, f64); 2], tol: &Tolerance) -> f64 {
    let inside = |t: f64| tol.in_unit_interval(t);
    candidates
        .iter()
        .find(|(v, u)| inside(*v) && inside(*u))
        .or_else(|| candidates.iter().find(|(v, _)| inside(*v)))
        .unwrap_or(&candidates[0])
        .0
}

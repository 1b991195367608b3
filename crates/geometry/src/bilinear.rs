use serde::{Deserialize, Serialize};

use super::line::Line3d;
use super::point::Point3d;
use super::vector::Vec3;

/// Slack on the `v` parameter when accepting a line hit.
const V_SLACK: f64 = 1e-3;
/// Slack on the `u` parameter when accepting a line hit.
const U_SLACK: f64 = 0.05;

/// Real roots of `a·x² + b·x + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    None,
    One(f64),
    /// `(plus, minus)`: the roots taking `+√` and `−√` in the textbook formula.
    Two(f64, f64),
    /// Every value solves the equation.
    All,
}

/// Solve a quadratic, falling back to the linear case when `a` is zero.
///
/// A discriminant that is negative only by rounding noise is clamped to
/// zero. Roots are computed with the cancellation-free form.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    if a == 0.0 {
        return if b != 0.0 {
            Roots::One(-c / b)
        } else if c == 0.0 {
            Roots::All
        } else {
            Roots::None
        };
    }

    let mut disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        if disc >= -1e-12 * (b * b + (4.0 * a * c).abs()) {
            disc = 0.0;
        } else {
            return Roots::None;
        }
    }
    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    if q == 0.0 {
        return Roots::Two(0.0, 0.0);
    }
    let (r_q, r_c) = (q / a, c / q);
    if b >= 0.0 {
        // q/a took −√
        Roots::Two(r_c, r_q)
    } else {
        Roots::Two(r_q, r_c)
    }
}

/// Bilinear patch `p(u,v) = u·v·a + u·b + v·c + d` through four corners
/// given in ring order `p00 → p10 → p11 → p01`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilinearSurface {
    pub p00: Point3d,
    pub p10: Point3d,
    pub p11: Point3d,
    pub p01: Point3d,
}

impl BilinearSurface {
    pub fn new(p00: Point3d, p10: Point3d, p11: Point3d, p01: Point3d) -> Self {
        Self { p00, p10, p11, p01 }
    }

    pub fn from_ring(corners: &[Point3d; 4]) -> Self {
        Self::new(corners[0], corners[1], corners[2], corners[3])
    }

    fn coefficients(&self) -> (Vec3, Vec3, Vec3, Vec3) {
        let a = (self.p00 - self.p10) + (self.p11 - self.p01);
        let b = self.p10 - self.p00;
        let c = self.p01 - self.p00;
        (a, b, c, self.p00.to_vec3())
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let (a, b, c, d) = self.coefficients();
        Point3d::from_vec3(a * (u * v) + b * u + c * v + d)
    }

    /// First intersection (smallest line parameter) of `line` with the
    /// patch. Parameters slightly outside `[0,1]` are accepted so that
    /// hits on shared edges are not lost to rounding.
    pub fn intersect_line(&self, line: &Line3d) -> Option<Point3d> {
        let (mut a, b, c, d) = self.coefficients();

        // Snap the twist term to zero for planar patches.
        let scale = b.length().max(c.length());
        if a.x.abs() <= 1e-12 * scale {
            a.x = 0.0;
        }
        if a.y.abs() <= 1e-12 * scale {
            a.y = 0.0;
        }
        if a.z.abs() <= 1e-12 * scale {
            a.z = 0.0;
        }

        let r = line.start.to_vec3();
        let q = line.direction();

        let a1 = a.x * q.z - a.z * q.x;
        let b1 = b.x * q.z - b.z * q.x;
        let c1 = c.x * q.z - c.z * q.x;
        let d1 = (d.x - r.x) * q.z - (d.z - r.z) * q.x;
        let a2 = a.y * q.z - a.z * q.y;
        let b2 = b.y * q.z - b.z * q.y;
        let c2 = c.y * q.z - c.z * q.y;
        let d2 = (d.y - r.y) * q.z - (d.z - r.z) * q.y;

        let qa = a2 * c1 - a1 * c2;
        let qb = a2 * d1 - a1 * d2 + b2 * c1 - b1 * c2;
        let qc = b2 * d1 - b1 * d2;

        let candidates: Vec<f64> = match solve_quadratic(qa, qb, qc) {
            Roots::None | Roots::All => return None,
            Roots::One(v) => vec![v],
            Roots::Two(v1, v2) => vec![v1, v2],
        };

        let mut best: Option<(f64, Point3d)> = None;
        for v in candidates {
            let aa = v * a2 + b2;
            let bb = v * (a2 - a1) + b2 - b1;
            let u = if bb.abs() >= aa.abs() {
                (v * (c1 - c2) + d1 - d2) / bb
            } else {
                (-v * c2 - d2) / aa
            };
            if !u.is_finite() {
                continue;
            }
            if !(-V_SLACK..=1.0 + V_SLACK).contains(&v) || !(-U_SLACK..=1.0 + U_SLACK).contains(&u) {
                continue;
            }
            let p = Point3d::from_vec3(a * (u * v) + b * u + c * v + d);
            let t = line_parameter(&r, &q, &p);
            if best.is_none_or(|(bt, _)| t < bt) {
                best = Some((t, p));
            }
        }
        best.map(|(_, p)| p)
    }
}

/// Parameter of `p` on `r + t·q`, read off the dominant axis of `q`.
fn line_parameter(r: &Vec3, q: &Vec3, p: &Point3d) -> f64 {
    if q.x.abs() >= q.y.abs() && q.x.abs() >= q.z.abs() {
        (p.x - r.x) / q.x
    } else if q.y.abs() >= q.z.abs() {
        (p.y - r.y) / q.y
    } else {
        (p.z - r.z) / q.z
    }
}

use tracing::{debug, instrument};

use super::SurfaceRaster;

impl SurfaceRaster {
    /// Give unset cells the mean of their set 4-neighbours.
    ///
    /// Cells are visited once, spiralling out from the centroid of the set
    /// cells as far as the raster allows, then the remaining rows below and
    /// above, then the remaining columns left and right. Values filled
    /// earlier feed later cells. A cell with no set neighbour when visited
    /// stays unset. `hits` is not touched.
    ///
    /// Returns the number of cells filled.
    #[instrument(skip(self), fields(ni = self.ni(), nj = self.nj()))]
    pub fn fill_by_averaging(&mut self) -> usize {
        let (n, m) = (self.ni(), self.nj());
        let (mut sum_i, mut sum_j, mut count) = (0usize, 0usize, 0usize);
        for ((p, q), _) in self.hits.indexed_iter() {
            if self.is_set(p, q) {
                sum_i += p;
                sum_j += q;
                count += 1;
            }
        }
        if count == 0 || count == n * m {
            return 0;
        }

        let (ci, cj) = (sum_i / count, sum_j / count);
        let reach = ci.min(cj).min(n - 1 - ci).min(m - 1 - cj);
        let mut filled = usize::from(self.fill_cell(ci, cj));

        for d in 1..=reach {
            for (p, q) in ring(ci, cj, d) {
                filled += usize::from(self.fill_cell(p, q));
            }
        }
        for q in (0..cj - reach).rev() {
            for p in ci - reach..=ci + reach {
                filled += usize::from(self.fill_cell(p, q));
            }
        }
        for q in cj + reach + 1..m {
            for p in ci - reach..=ci + reach {
                filled += usize::from(self.fill_cell(p, q));
            }
        }
        for p in (0..ci - reach).rev() {
            for q in 0..m {
                filled += usize::from(self.fill_cell(p, q));
            }
        }
        for p in ci + reach + 1..n {
            for q in 0..m {
                filled += usize::from(self.fill_cell(p, q));
            }
        }

        debug!(centre_i = ci, centre_j = cj, reach, filled, "raster holes filled");
        filled
    }

    fn fill_cell(&mut self, p: usize, q: usize) -> bool {
        if self.is_set(p, q) {
            return false;
        }
        let (n, m) = (self.ni(), self.nj());
        let neighbours = [
            p.checked_sub(1).map(|pp| (pp, q)),
            (p + 1 < n).then_some((p + 1, q)),
            q.checked_sub(1).map(|qq| (p, qq)),
            (q + 1 < m).then_some((p, q + 1)),
        ];
        let (sum, count) = neighbours
            .into_iter()
            .flatten()
            .filter(|&(a, b)| self.is_set(a, b))
            .fold((0.0, 0u32), |(s, c), ab| (s + self.values[ab], c + 1));
        if count == 0 {
            return false;
        }
        self.values[(p, q)] = sum / f64::from(count);
        self.filled[(p, q)] = true;
        true
    }
}

/// The `8d` cells at Chebyshev distance `d` from `(ci, cj)`, starting at
/// `(ci - d + 1, cj - d)` and running counter-clockwise. Needs `d` no
/// larger than `ci` or `cj`.
fn ring(ci: usize, cj: usize, d: usize) -> Vec<(usize, usize)> {
    let (mut p, mut q) = (ci + 1 - d, cj - d);
    let mut cells = Vec::with_capacity(8 * d);
    for r in 1..=8 * d {
        cells.push((p, q));
        if r < 2 * d {
            p += 1;
        } else if r < 4 * d {
            q += 1;
        } else if r < 6 * d {
            p -= 1;
        } else if r < 8 * d {
            q -= 1;
        }
    }
    cells
}

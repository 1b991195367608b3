use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Dense row-major 2D array, element `(i, j)` stored at `i + j * ni`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid2D<T> {
    ni: usize,
    nj: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid2D<T> {
    pub fn new(ni: usize, nj: usize, value: T) -> Self {
        Self {
            ni,
            nj,
            data: vec![value; ni * nj],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value.clone());
    }
}

impl<T> Grid2D<T> {
    /// Wrap existing row-major data; `None` when the length does not match.
    pub fn from_vec(ni: usize, nj: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == ni * nj).then_some(Self { ni, nj, data })
    }

    pub fn ni(&self) -> usize {
        self.ni
    }

    pub fn nj(&self) -> usize {
        self.nj
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn index_of(&self, i: usize, j: usize) -> usize {
        assert!(i < self.ni && j < self.nj, "({i}, {j}) outside {}x{}", self.ni, self.nj);
        i + j * self.ni
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        (i < self.ni && j < self.nj).then(|| &self.data[i + j * self.ni])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// `((i, j), value)` pairs in storage order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let ni = self.ni;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, v)| ((idx % ni, idx / ni), v))
    }
}

impl<T> Index<(usize, usize)> for Grid2D<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[self.index_of(i, j)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid2D<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let idx = self.index_of(i, j);
        &mut self.data[idx]
    }
}

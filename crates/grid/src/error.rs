use thiserror::Error;

/// Failures raised by the corner-point grid.
///
/// A point that lies outside the grid is not an error; `locate` returns
/// `None` for it. Out-of-range indices are caller bugs and panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("cell column ({i}, {j}) is degenerate at the requested depth")]
    DegenerateCell { i: usize, j: usize },

    #[error("pillar ({i}, {j}) cannot be intersected with a horizontal plane")]
    DegeneratePillar { i: usize, j: usize },

    #[error("{keyword} has {actual} values, expected {expected}")]
    InputLength {
        keyword: &'static str,
        expected: usize,
        actual: usize,
    },
}

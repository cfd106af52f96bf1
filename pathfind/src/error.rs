use std::fmt::Display;

use crate::Point;

/// Errors returned by the grid and the search engine.
///
/// None of these are fatal: the caller can re-paint the grid or pick new
/// endpoints and try again. An unreachable goal is not an error, it is reported
/// as [`crate::StepOutcome::NoPathExists`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The search was started with equal endpoints, or with an endpoint that is a barrier
    InvalidEndpoints,
    /// A cell reference outside of the grid bounds
    InvalidCoordinate { row: usize, col: usize },
    /// `step` was called before `begin`
    NotStarted,
    /// `begin` was called on a search that has already been started
    AlreadyStarted,
    /// `step` was given a grid of a different size than the one the search was started on
    GridMismatch { rows: usize, columns: usize },
}

impl Error {
    pub(crate) fn out_of_bounds(point: Point) -> Self {
        Error::InvalidCoordinate {
            row: point.row,
            col: point.col,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidEndpoints => write!(f, "start and end must be two distinct, open cells"),
            Error::InvalidCoordinate { row, col } => {
                write!(f, "cell ({}, {}) is outside of the grid", row, col)
            }
            Error::NotStarted => write!(f, "the search has not been started"),
            Error::AlreadyStarted => write!(f, "the search has already been started"),
            Error::GridMismatch { rows, columns } => {
                write!(f, "the search was started on a {}x{} grid", rows, columns)
            }
        }
    }
}

impl std::error::Error for Error {}

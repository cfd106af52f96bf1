//! Incremental A* over a painted, 4-connected grid.
//!
//! A [`Grid`] holds the cells a user painted (start, end and barriers). An [`AStar`] search is
//! started with [`AStar::begin`] and then driven one frontier pop at a time with
//! [`AStar::step`], typically once per animation frame. Every step reports the cells it
//! visited and discovered, which a shell folds into an [`Overlay`] for display.

mod error;
mod find;
mod grid;
mod overlay;
pub mod util;

pub use error::Error;
pub use find::{heuristic, AStar, PathResult, SearchStatus, StepOutcome};
pub use grid::{CellKind, CellStorage, Grid, Point, DEFAULT_COLS, DEFAULT_ROWS};
pub use overlay::{Frame, Mark, Overlay};
pub use util::{load_grid, parse_img};

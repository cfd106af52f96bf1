use std::fmt::Display;

use crate::{CellKind, CellStorage, Grid, Point, StepOutcome};

/// Visualization marker painted over a grid cell
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Mark {
    #[default]
    None,
    Open,
    Closed,
    Path,
}

/// The markers a shell keeps while animating a search. The engine never touches these, the
/// shell folds every step outcome into them and resets them before a new search.
#[derive(Debug, Clone)]
pub struct Overlay {
    marks: CellStorage<Mark>,
}

impl Overlay {
    pub fn new(grid: &Grid) -> Self {
        Self {
            marks: grid.create_storage(),
        }
    }

    pub fn reset(&mut self) {
        self.marks.reset();
    }

    pub fn get(&self, point: Point) -> Mark {
        if self.marks.is_valid(point) {
            self.marks.get(point)
        } else {
            Mark::None
        }
    }

    /// Mark a single cell. Start and end cells keep their own look, and a closed cell is never
    /// turned back into an open one.
    pub fn mark(&mut self, grid: &Grid, point: Point, mark: Mark) {
        if !self.marks.is_valid(point) {
            return;
        }
        if matches!(grid.kind(point), Ok(CellKind::Start | CellKind::End)) {
            return;
        }

        let current = self.marks.get_mut(point);
        if mark == Mark::Open && *current == Mark::Closed {
            return;
        }
        *current = mark;
    }

    /// Apply everything a step reported. A found path is marked all at once, shells that reveal
    /// the path gradually call [`Overlay::mark`] per cell instead.
    pub fn apply(&mut self, grid: &Grid, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Continuing {
                newly_visited,
                newly_frontier,
            } => {
                for point in newly_frontier {
                    self.mark(grid, *point, Mark::Open);
                }
                for point in newly_visited {
                    self.mark(grid, *point, Mark::Closed);
                }
            }
            StepOutcome::Found(path) => {
                for point in path.iter() {
                    self.mark(grid, point, Mark::Path);
                }
            }
            StepOutcome::NoPathExists => {}
        }
    }

    pub fn frame<'a>(&'a self, grid: &'a Grid) -> Frame<'a> {
        Frame {
            grid,
            overlay: self,
        }
    }
}

/// A grid and its markers rendered together as text
pub struct Frame<'a> {
    grid: &'a Grid,
    overlay: &'a Overlay,
}

impl Display for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.columns() {
                let point = Point::new(row, col);
                let kind = self.grid.kind(point).unwrap_or_default();
                let glyph = match (kind, self.overlay.get(point)) {
                    (CellKind::Empty, Mark::Open) => 'o',
                    (CellKind::Empty, Mark::Closed) => '+',
                    (CellKind::Empty, Mark::Path) => '*',
                    (kind, _) => kind.glyph(),
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

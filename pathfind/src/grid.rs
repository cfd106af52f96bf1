use std::{fmt::Display, str::FromStr};

use serde::Serialize;

use crate::Error;

pub const DEFAULT_ROWS: usize = 50;
pub const DEFAULT_COLS: usize = 50;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CellKind {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
}

impl CellKind {
    pub fn glyph(&self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Start => 'S',
            CellKind::End => 'E',
            CellKind::Barrier => 'X',
        }
    }
}

impl Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl TryFrom<char> for CellKind {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(CellKind::Empty),
            'S' => Ok(CellKind::Start),
            'E' => Ok(CellKind::End),
            'X' => Ok(CellKind::Barrier),
            _ => Err(anyhow::anyhow!("Invalid cell glyph: {:?}", c)),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `row,col`
impl FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Invalid point {:?}, expected row,col", s))?;
        Ok(Point {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

/// Dense per-cell storage for a rectangular grid, stored row-major in a single vec
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T: Default + Copy> CellStorage<T> {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![T::default(); rows * columns],
        }
    }

    pub fn is_valid(&self, node: Point) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    /// Panics if `node` is out of bounds, callers check with [`CellStorage::is_valid`] first
    pub fn get(&self, node: Point) -> T {
        self.cells[node.row * self.columns + node.col]
    }

    pub fn get_mut(&mut self, node: Point) -> &mut T {
        &mut self.cells[node.row * self.columns + node.col]
    }

    pub fn reset(&mut self) {
        self.cells.fill(T::default());
    }
}

/// The painted grid: a fixed size matrix of cell kinds with at most one start and one end
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: CellStorage<CellKind>,
    start: Option<Point>,
    end: Option<Point>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: CellStorage::new(rows, columns),
            start: None,
            end: None,
        }
    }

    /// Reallocate the grid with a new size, every cell becomes empty
    pub fn initialize(&mut self, rows: usize, columns: usize) {
        *self = Self::new(rows, columns);
    }

    pub fn clear(&mut self) {
        self.cells.reset();
        self.start = None;
        self.end = None;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn is_valid(&self, node: Point) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    pub fn kind(&self, node: Point) -> Result<CellKind, Error> {
        self.check(node)?;
        Ok(self.cells.get(node))
    }

    /// Create a storage with one default value per cell of this grid
    pub fn create_storage<T: Default + Copy>(&self) -> CellStorage<T> {
        CellStorage::new(self.rows, self.columns)
    }

    fn check(&self, node: Point) -> Result<(), Error> {
        if self.is_valid(node) {
            Ok(())
        } else {
            Err(Error::out_of_bounds(node))
        }
    }

    /// Set the kind of a cell. Returns `Ok(false)` without changing anything if the change would
    /// create a second start or end, or would put start/end and a barrier on the same cell.
    pub fn set_kind(&mut self, node: Point, kind: CellKind) -> Result<bool, Error> {
        self.check(node)?;
        let current = self.cells.get(node);

        if current == kind {
            return Ok(true);
        }

        let allowed = match kind {
            CellKind::Empty => true,
            CellKind::Start => self.start.is_none() && current == CellKind::Empty,
            CellKind::End => self.end.is_none() && current == CellKind::Empty,
            CellKind::Barrier => current == CellKind::Empty,
        };
        if !allowed {
            return Ok(false);
        }

        match current {
            CellKind::Start => self.start = None,
            CellKind::End => self.end = None,
            _ => {}
        }
        match kind {
            CellKind::Start => self.start = Some(node),
            CellKind::End => self.end = Some(node),
            _ => {}
        }
        *self.cells.get_mut(node) = kind;

        Ok(true)
    }

    /// Flip a cell between empty and barrier, start and end cells are left alone
    pub fn toggle_barrier(&mut self, node: Point) -> Result<(), Error> {
        self.check(node)?;
        let cell = self.cells.get_mut(node);
        *cell = match *cell {
            CellKind::Empty => CellKind::Barrier,
            CellKind::Barrier => CellKind::Empty,
            other => other,
        };
        Ok(())
    }

    /// A pointer press on a cell: the first free press places the start, the next one the end,
    /// and after that presses toggle barriers.
    pub fn paint(&mut self, node: Point) -> Result<CellKind, Error> {
        self.check(node)?;

        if self.start.is_none() && self.end != Some(node) {
            // a barrier under the pointer is replaced
            *self.cells.get_mut(node) = CellKind::Empty;
            self.set_kind(node, CellKind::Start)?;
        } else if self.end.is_none() && self.start != Some(node) {
            *self.cells.get_mut(node) = CellKind::Empty;
            self.set_kind(node, CellKind::End)?;
        } else {
            self.toggle_barrier(node)?;
        }

        Ok(self.cells.get(node))
    }

    /// The pointer was dragged over a cell while pressed
    pub fn drag_over(&mut self, node: Point) -> Result<CellKind, Error> {
        self.toggle_barrier(node)?;
        Ok(self.cells.get(node))
    }

    /// Return the walkable neighbors of a cell in the order up, down, left, right
    pub fn neighbors(&self, node: Point) -> impl Iterator<Item = Point> + '_ {
        let mut points = Vec::with_capacity(4);

        if self.is_valid(node) {
            if node.row > 0 {
                points.push(Point::new(node.row - 1, node.col));
            }
            if node.row < self.rows - 1 {
                points.push(Point::new(node.row + 1, node.col));
            }
            if node.col > 0 {
                points.push(Point::new(node.row, node.col - 1));
            }
            if node.col < self.columns - 1 {
                points.push(Point::new(node.row, node.col + 1));
            }
        }

        // filter to only keep cells that can be walked on
        points.retain(|p| self.cells.get(*p) != CellKind::Barrier);

        points.into_iter()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                write!(f, "{}", self.cells.get(Point::new(row, col)))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the format written by `Display`: one line per row of `.`, `X`, `S` and `E`
impl FromStr for Grid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let columns = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if lines.is_empty() || columns == 0 {
            anyhow::bail!("Grid text is empty");
        }

        let mut grid = Grid::new(lines.len(), columns);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != columns {
                anyhow::bail!(
                    "Row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    columns
                );
            }
            for (col, c) in line.chars().enumerate() {
                let kind = CellKind::try_from(c)?;
                if !grid.set_kind(Point::new(row, col), kind)? {
                    anyhow::bail!("Grid has more than one {:?} cell", kind);
                }
            }
        }

        Ok(grid)
    }
}

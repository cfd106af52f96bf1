use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, trace};
use serde::Serialize;

use crate::{CellKind, CellStorage, Error, Grid, Point};

/// Score of a cell that has not been reached yet
const UNREACHABLE: usize = usize::MAX;

/// Manhattan distance, admissible and consistent for unit cost 4-connected grids
pub fn heuristic(a: Point, b: Point) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// The objects that we store in the priority queue. Entries whose score no longer matches the
/// cell are stale and skipped when popped.
#[derive(Debug)]
struct ToVisit {
    f: usize,
    // position in which the cell first entered the open set, breaks ties on equal f
    order: usize,
    point: Point,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap
        self.f
            .cmp(&other.f)
            .then_with(|| self.order.cmp(&other.order))
            .reverse()
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ToVisit {
    fn eq(&self, other: &ToVisit) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToVisit {}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum Membership {
    #[default]
    Unseen,
    Open,
    Closed,
}

#[derive(Copy, Clone, Debug)]
struct Node {
    g: usize,
    f: usize,
    from: Option<Point>,
    order: usize,
    membership: Membership,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            f: UNREACHABLE,
            from: None,
            order: 0,
            membership: Membership::Unseen,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    /// Cells from the first step after `start` up to and including `goal`
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    pub total_cost: usize,
}

impl PathResult {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Point> + '_ {
        self.path.iter().copied()
    }

    /// The path walked backwards, from the goal towards the start
    pub fn iter_from_goal(&self) -> impl Iterator<Item = Point> + '_ {
        self.iter().rev()
    }
}

/// What a single call to [`AStar::step`] did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepOutcome {
    Continuing {
        newly_visited: Vec<Point>,
        newly_frontier: Vec<Point>,
    },
    Found(PathResult),
    NoPathExists,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Running,
    Found,
    Exhausted,
}

impl SearchStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, SearchStatus::Found | SearchStatus::Exhausted)
    }
}

#[derive(Debug)]
struct SearchState {
    // size of the grid the search was started on
    rows: usize,
    columns: usize,
    start: Point,
    goal: Point,
    nodes: CellStorage<Node>,
    visit_list: BinaryHeap<ToVisit>,
    open_len: usize,
    inserted: usize,
    expanded: usize,
}

impl SearchState {
    /// Pop the open cell with the lowest f score, earliest inserted first. Open cells that were
    /// painted over with a barrier since they were discovered are dropped from the open set.
    fn pop_open(&mut self, grid: &Grid) -> Option<Point> {
        while let Some(visit) = self.visit_list.pop() {
            let node = self.nodes.get_mut(visit.point);
            if node.membership != Membership::Open || node.f != visit.f {
                continue;
            }
            if grid.kind(visit.point) == Ok(CellKind::Barrier) {
                trace!("dropping {} from the open set, it became a barrier", visit.point);
                node.membership = Membership::Closed;
                self.open_len -= 1;
                continue;
            }
            return Some(visit.point);
        }
        None
    }

    fn reconstruct(&self) -> PathResult {
        let mut path = Vec::new();
        let mut current = self.goal;

        while current != self.start {
            path.push(current);
            match self.nodes.get(current).from {
                Some(from) => current = from,
                // every cell reached from the start has a predecessor, only the start has none
                None => {
                    debug_assert!(false, "backtracking reached {} without a predecessor", current);
                    break;
                }
            }
        }
        path.reverse();

        PathResult {
            path,
            start: self.start,
            goal: self.goal,
            total_cost: self.nodes.get(self.goal).g,
        }
    }
}

/// A* search that advances one frontier pop per [`AStar::step`], so that a render loop can
/// show its progress.
///
/// ```
/// use pathfind::{AStar, Grid, Point, StepOutcome};
///
/// let grid = Grid::new(5, 5);
/// let mut search = AStar::new();
/// search.begin(&grid, Point::new(0, 0), Point::new(0, 4)).unwrap();
///
/// let outcome = search.finish(&grid).unwrap();
/// assert!(matches!(outcome, StepOutcome::Found(path) if path.len() == 4));
/// ```
#[derive(Debug, Default)]
pub struct AStar {
    status: SearchStatus,
    search: Option<SearchState>,
    outcome: Option<StepOutcome>,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, grid: &Grid, start: Point, goal: Point) -> Result<(), Error> {
        if self.status != SearchStatus::Idle {
            return Err(Error::AlreadyStarted);
        }
        let start_kind = grid.kind(start)?;
        let goal_kind = grid.kind(goal)?;
        if start == goal || start_kind == CellKind::Barrier || goal_kind == CellKind::Barrier {
            return Err(Error::InvalidEndpoints);
        }

        let mut nodes: CellStorage<Node> = grid.create_storage();
        let f = heuristic(start, goal);
        *nodes.get_mut(start) = Node {
            g: 0,
            f,
            from: None,
            order: 0,
            membership: Membership::Open,
        };

        debug!("starting search from {} to {}", start, goal);

        self.search = Some(SearchState {
            rows: grid.rows(),
            columns: grid.columns(),
            start,
            goal,
            nodes,
            visit_list: BinaryHeap::from([ToVisit {
                f,
                order: 0,
                point: start,
            }]),
            open_len: 1,
            inserted: 1,
            expanded: 0,
        });
        self.status = SearchStatus::Running;

        Ok(())
    }

    /// Run one iteration of the search. Once the search is done the final outcome is returned
    /// again on every call.
    pub fn step(&mut self, grid: &Grid) -> Result<StepOutcome, Error> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        let Some(search) = self.search.as_mut() else {
            return Err(Error::NotStarted);
        };
        if grid.rows() != search.rows || grid.columns() != search.columns {
            return Err(Error::GridMismatch {
                rows: search.rows,
                columns: search.columns,
            });
        }

        let Some(current) = search.pop_open(grid) else {
            debug!(
                "no path from {} to {} after {} expansions",
                search.start, search.goal, search.expanded
            );
            return Ok(self.finish_with(SearchStatus::Exhausted, StepOutcome::NoPathExists));
        };

        if current == search.goal {
            let path = search.reconstruct();
            debug!(
                "found path of {} cells from {} to {} after {} expansions",
                path.len(),
                search.start,
                search.goal,
                search.expanded
            );
            return Ok(self.finish_with(SearchStatus::Found, StepOutcome::Found(path)));
        }

        let current_g = {
            let node = search.nodes.get_mut(current);
            node.membership = Membership::Closed;
            node.g
        };
        search.open_len -= 1;
        search.expanded += 1;
        trace!("expanding {} with g = {}", current, current_g);

        let tentative_g = current_g + 1;
        let mut newly_frontier = Vec::new();

        for neighbor in grid.neighbors(current) {
            let node = search.nodes.get_mut(neighbor);
            match node.membership {
                Membership::Closed => continue,
                Membership::Unseen => {
                    node.membership = Membership::Open;
                    node.order = search.inserted;
                    search.inserted += 1;
                    search.open_len += 1;
                    newly_frontier.push(neighbor);
                }
                // equal cost keeps the first discovered predecessor
                Membership::Open if tentative_g >= node.g => continue,
                Membership::Open => {}
            }

            node.from = Some(current);
            node.g = tentative_g;
            node.f = tentative_g + heuristic(neighbor, search.goal);
            search.visit_list.push(ToVisit {
                f: node.f,
                order: node.order,
                point: neighbor,
            });
        }

        Ok(StepOutcome::Continuing {
            newly_visited: vec![current],
            newly_frontier,
        })
    }

    /// Step until the search reaches a final outcome
    pub fn finish(&mut self, grid: &Grid) -> Result<StepOutcome, Error> {
        loop {
            match self.step(grid)? {
                StepOutcome::Continuing { .. } => {}
                outcome => return Ok(outcome),
            }
        }
    }

    fn finish_with(&mut self, status: SearchStatus, outcome: StepOutcome) -> StepOutcome {
        self.status = status;
        self.outcome = Some(outcome.clone());
        outcome
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn start(&self) -> Option<Point> {
        self.search.as_ref().map(|s| s.start)
    }

    pub fn goal(&self) -> Option<Point> {
        self.search.as_ref().map(|s| s.goal)
    }

    /// Number of cells moved to the closed set so far
    pub fn expanded(&self) -> usize {
        self.search.as_ref().map_or(0, |s| s.expanded)
    }

    /// Number of cells currently in the open set
    pub fn open_len(&self) -> usize {
        self.search.as_ref().map_or(0, |s| s.open_len)
    }

    fn node(&self, point: Point) -> Option<Node> {
        self.search
            .as_ref()
            .filter(|s| s.nodes.is_valid(point))
            .map(|s| s.nodes.get(point))
    }

    /// Best known cost from the start, `None` while the cell is unreached
    pub fn g_score(&self, point: Point) -> Option<usize> {
        self.node(point).map(|n| n.g).filter(|g| *g != UNREACHABLE)
    }

    pub fn f_score(&self, point: Point) -> Option<usize> {
        self.node(point).map(|n| n.f).filter(|f| *f != UNREACHABLE)
    }

    pub fn came_from(&self, point: Point) -> Option<Point> {
        self.node(point).and_then(|n| n.from)
    }

    pub fn is_open(&self, point: Point) -> bool {
        self.node(point)
            .is_some_and(|n| n.membership == Membership::Open)
    }

    pub fn is_closed(&self, point: Point) -> bool {
        self.node(point)
            .is_some_and(|n| n.membership == Membership::Closed)
    }
}

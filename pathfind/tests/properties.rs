use pathfind::{
    heuristic, AStar, Grid, Point, SearchStatus, StepOutcome, DEFAULT_COLS, DEFAULT_ROWS,
};

/// Step a search to its end, returning the visited order, the number of steps and the outcome
fn run(grid: &Grid, start: Point, goal: Point) -> (Vec<Point>, usize, StepOutcome) {
    let mut search = AStar::new();
    search.begin(grid, start, goal).unwrap();

    let mut visited = Vec::new();
    for steps in 1..=grid.rows() * grid.columns() {
        match search.step(grid).unwrap() {
            StepOutcome::Continuing { newly_visited, .. } => visited.extend(newly_visited),
            outcome => return (visited, steps, outcome),
        }
    }
    panic!("search from {} to {} did not finish in time", start, goal);
}

fn sample_points() -> Vec<Point> {
    let mut points = Vec::new();
    for row in (0..DEFAULT_ROWS).step_by(7) {
        for col in (0..DEFAULT_COLS).step_by(11) {
            points.push(Point::new(row, col));
        }
    }
    points.push(Point::new(DEFAULT_ROWS - 1, DEFAULT_COLS - 1));
    points
}

#[test]
fn open_grid_paths_are_manhattan_shortest() {
    let grid = Grid::default();
    let points = sample_points();

    for &start in &points {
        for &goal in &points {
            if start == goal {
                continue;
            }
            match run(&grid, start, goal).2 {
                StepOutcome::Found(path) => {
                    assert_eq!(path.len(), heuristic(start, goal));
                    assert_eq!(path.total_cost, heuristic(start, goal));
                    assert_eq!(path.path.last(), Some(&goal));
                }
                other => panic!("no path from {} to {}: {:?}", start, goal, other),
            }
        }
    }
}

#[test]
fn enclosed_goal_is_exhausted() {
    let mut grid = Grid::default();
    let goal = Point::new(20, 30);
    for wall in [
        Point::new(19, 30),
        Point::new(21, 30),
        Point::new(20, 29),
        Point::new(20, 31),
    ] {
        grid.toggle_barrier(wall).unwrap();
    }

    let mut search = AStar::new();
    search.begin(&grid, Point::new(0, 0), goal).unwrap();
    let (visited, steps, outcome) = run(&grid, Point::new(0, 0), goal);

    assert_eq!(outcome, StepOutcome::NoPathExists);
    assert!(steps <= DEFAULT_ROWS * DEFAULT_COLS);
    // everything except the walls and the enclosed goal gets expanded
    assert_eq!(visited.len(), DEFAULT_ROWS * DEFAULT_COLS - 5);

    assert_eq!(search.finish(&grid).unwrap(), StepOutcome::NoPathExists);
    assert_eq!(search.status(), SearchStatus::Exhausted);
    assert_eq!(search.open_len(), 0);
}

#[test]
fn enclosed_corner_goal_is_exhausted() {
    let mut grid = Grid::default();
    let goal = Point::new(0, DEFAULT_COLS - 1);
    grid.toggle_barrier(Point::new(0, DEFAULT_COLS - 2)).unwrap();
    grid.toggle_barrier(Point::new(1, DEFAULT_COLS - 1)).unwrap();

    let (_, steps, outcome) = run(&grid, Point::new(DEFAULT_ROWS - 1, 0), goal);
    assert_eq!(outcome, StepOutcome::NoPathExists);
    assert!(steps <= DEFAULT_ROWS * DEFAULT_COLS);
}

#[test]
fn runs_are_deterministic() {
    let grid: Grid = "\
        S....X....\n\
        .XXX.X.XX.\n\
        .X...X..X.\n\
        .X.XXXX.X.\n\
        .X......X.\n\
        .XXXXXX.X.\n\
        ......X...\n\
        .XXXX.XXX.\n\
        ....X....E\n"
        .parse()
        .unwrap();
    let start = grid.start().unwrap();
    let goal = grid.end().unwrap();

    let first = run(&grid, start, goal);
    let second = run(&grid, start, goal);

    assert!(matches!(first.2, StepOutcome::Found(_)));
    assert_eq!(first.0, second.0);
    assert_eq!(first.2, second.2);
}

#[test]
fn neighbors_are_stable_without_mutation() {
    let mut grid = Grid::default();
    grid.toggle_barrier(Point::new(10, 11)).unwrap();

    for point in sample_points() {
        let first: Vec<_> = grid.neighbors(point).collect();
        let second: Vec<_> = grid.neighbors(point).collect();
        assert_eq!(first, second);
        for neighbor in first {
            assert_eq!(heuristic(point, neighbor), 1);
        }
    }
}

#[test]
fn path_cells_are_adjacent_and_walkable() {
    let grid: Grid = "\
        S.X.....\n\
        .XX.XXX.\n\
        ....X...\n\
        XXX.X.XX\n\
        ....X..E\n"
        .parse()
        .unwrap();
    let start = grid.start().unwrap();

    match run(&grid, start, grid.end().unwrap()).2 {
        StepOutcome::Found(path) => {
            let mut previous = start;
            for cell in path.iter() {
                assert_eq!(heuristic(previous, cell), 1);
                assert!(grid.neighbors(previous).any(|n| n == cell));
                previous = cell;
            }
        }
        other => panic!("expected a path, got {:?}", other),
    }
}

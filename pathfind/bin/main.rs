use std::{path::PathBuf, thread, time::Duration};

use anyhow::{anyhow, Context};
use clap::Parser;
use log::{info, warn};
use pathfind::{
    load_grid, AStar, CellKind, Grid, Mark, Overlay, Point, StepOutcome, DEFAULT_COLS,
    DEFAULT_ROWS,
};

/// Animate an A* search over a grid in the terminal
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// grid to load, either a text grid (.txt) or an image where dark pixels are barriers
    #[clap(long)]
    grid: Option<PathBuf>,

    /// rows of the empty grid used when no --grid is given
    #[clap(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// columns of the empty grid used when no --grid is given
    #[clap(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// start cell as row,col
    #[clap(long)]
    start: Option<Point>,

    /// end cell as row,col
    #[clap(long)]
    end: Option<Point>,

    /// extra barrier cell as row,col, can be repeated
    #[clap(long)]
    barrier: Vec<Point>,

    /// delay between search steps
    #[clap(long, default_value_t = 16)]
    frame_delay_ms: u64,

    /// delay between revealed path cells
    #[clap(long, default_value_t = 50)]
    path_delay_ms: u64,

    /// only print the final frame
    #[clap(long)]
    quiet: bool,
}

fn build_grid(args: &Args) -> anyhow::Result<Grid> {
    let mut grid = match &args.grid {
        Some(path) => load_grid(path)?,
        None => Grid::new(args.rows, args.cols),
    };

    for &point in &args.barrier {
        if !grid.set_kind(point, CellKind::Barrier)? {
            warn!("cannot place a barrier on {}", point);
        }
    }
    // explicit endpoints replace the ones painted in the grid file
    if let Some(start) = args.start {
        if let Some(previous) = grid.start() {
            grid.set_kind(previous, CellKind::Empty)?;
        }
        if !grid.set_kind(start, CellKind::Start)? {
            warn!("cannot place the start on {}", start);
        }
    }
    if let Some(end) = args.end {
        if let Some(previous) = grid.end() {
            grid.set_kind(previous, CellKind::Empty)?;
        }
        if !grid.set_kind(end, CellKind::End)? {
            warn!("cannot place the end on {}", end);
        }
    }

    Ok(grid)
}

fn draw(grid: &Grid, overlay: &Overlay) {
    // clear the terminal and move the cursor home
    print!("\x1b[2J\x1b[H{}", overlay.frame(grid));
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = Args::parse();
    let grid = build_grid(&args)?;

    let start = grid
        .start()
        .ok_or_else(|| anyhow!("the grid has no start cell, pass --start row,col"))?;
    let end = grid
        .end()
        .ok_or_else(|| anyhow!("the grid has no end cell, pass --end row,col"))?;

    let mut overlay = Overlay::new(&grid);
    let mut search = AStar::new();
    search
        .begin(&grid, start, end)
        .with_context(|| format!("could not search from {} to {}", start, end))?;

    let frame_delay = Duration::from_millis(args.frame_delay_ms);
    let path_delay = Duration::from_millis(args.path_delay_ms);
    let mut steps = 0;

    let outcome = loop {
        let outcome = search.step(&grid)?;
        steps += 1;
        if search.status().is_done() {
            break outcome;
        }
        overlay.apply(&grid, &outcome);
        if !args.quiet {
            draw(&grid, &overlay);
            thread::sleep(frame_delay);
        }
    };

    match outcome {
        StepOutcome::Found(path) => {
            for point in path.iter() {
                overlay.mark(&grid, point, Mark::Path);
                if !args.quiet {
                    draw(&grid, &overlay);
                    thread::sleep(path_delay);
                }
            }
            if args.quiet {
                print!("{}", overlay.frame(&grid));
            }
            info!(
                "path of length {} found in {} steps, {} cells expanded",
                path.total_cost,
                steps,
                search.expanded()
            );
            println!("path length: {}", path.total_cost);
        }
        _ => {
            if args.quiet {
                print!("{}", overlay.frame(&grid));
            }
            info!(
                "no path after {} steps, {} cells expanded",
                steps,
                search.expanded()
            );
            println!("no path exists");
        }
    }

    Ok(())
}

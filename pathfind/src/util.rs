use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, GenericImageView};

use crate::{CellKind, Grid, Point};

/// Build a grid from a thresholded image, dark pixels become barriers
pub fn parse_img(img: &DynamicImage) -> Result<Grid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut grid = Grid::new(height, width);

    for row in 0..height {
        for col in 0..width {
            let p = img.get_pixel(col as u32, row as u32);

            if p.0[0] < 128 {
                grid.set_kind(Point::new(row, col), CellKind::Barrier)?;
            }
        }
    }

    Ok(grid)
}

/// Load a grid from disk. `.txt` files use the text grid format, everything else is opened as
/// an image.
pub fn load_grid(path: &Path) -> Result<Grid, anyhow::Error> {
    let is_text = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("txt"));

    if is_text {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read grid file {}", path.display()))?;
        text.parse()
            .with_context(|| format!("could not parse grid file {}", path.display()))
    } else {
        let img = image::open(path)
            .with_context(|| format!("could not open grid image {}", path.display()))?;
        parse_img(&img)
    }
}

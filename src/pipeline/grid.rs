//! Grid compositing: tile equally-sized card rasters onto one sheet.
//!
//! The cell size is measured once, from the visible content of the first
//! raster, and every raster is stretched to that size without preserving
//! aspect ratio. Cards fill the sheet row-major from the top-left; cells
//! beyond the last card stay white.

use crate::config::GridSize;
use crate::error::CardgenError;
use crate::output::CellSize;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Smallest rectangle holding every visible pixel, or `None` for a blank
/// image.
///
/// With an alpha channel a pixel is visible when it is not fully
/// transparent; without one, when it is not pure black.
pub fn content_bounds(img: &DynamicImage) -> Option<Bounds> {
    let rgba = img.to_rgba8();
    let has_alpha = img.color().has_alpha();

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let visible = if has_alpha { a != 0 } else { r | g | b != 0 };
        if visible {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    any.then(|| Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Open the raster at `path` and measure its visible content.
pub fn measure_cell(path: &Path) -> Result<CellSize, CardgenError> {
    let img = open_raster(path)?;
    let bounds = content_bounds(&img).ok_or_else(|| CardgenError::BlankRaster {
        path: path.to_path_buf(),
    })?;
    let cell = CellSize::new(bounds.width, bounds.height);
    let (w, h) = img.dimensions();
    info!("Cell size {} from {} ({}x{} raster)", cell, path.display(), w, h);
    Ok(cell)
}

/// Tile `images` onto a white `grid.columns·w × grid.rows·h` canvas.
///
/// Fails with [`CardgenError::GridOverflow`] when there are more images than
/// cells; nothing is dropped silently.
pub fn compose(
    images: &[DynamicImage],
    grid: GridSize,
    cell: CellSize,
) -> Result<RgbImage, CardgenError> {
    check_capacity(images.len(), grid)?;
    let mut canvas = blank_canvas(grid, cell);
    for (index, img) in images.iter().enumerate() {
        paste(&mut canvas, img, index, grid, cell);
    }
    Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Like [`compose`], opening each raster from disk one at a time.
pub fn compose_files(
    paths: &[PathBuf],
    grid: GridSize,
    cell: CellSize,
) -> Result<RgbImage, CardgenError> {
    check_capacity(paths.len(), grid)?;
    let mut canvas = blank_canvas(grid, cell);
    for (index, path) in paths.iter().enumerate() {
        let img = open_raster(path)?;
        paste(&mut canvas, &img, index, grid, cell);
        debug!("Placed {} at cell {:?}", path.display(), grid.cell_of(index));
    }
    info!(
        "Composed {} cards on a {} grid → {}x{} px",
        paths.len(),
        grid,
        canvas.width(),
        canvas.height()
    );
    Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Write the merged grid as PNG via a temporary sibling and a rename, so a
/// crash never leaves a truncated sheet behind.
pub fn save_grid(grid_image: &RgbImage, path: &Path) -> Result<(), CardgenError> {
    let tmp_path = path.with_extension("png.tmp");
    let written = grid_image
        .save_with_format(&tmp_path, image::ImageFormat::Png)
        .map_err(|e| CardgenError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })
        .and_then(|()| {
            std::fs::rename(&tmp_path, path).map_err(|e| CardgenError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })
        });
    if written.is_err() && tmp_path.exists() {
        if let Err(e) = std::fs::remove_file(&tmp_path) {
            warn!("Could not remove {}: {}", tmp_path.display(), e);
        }
    }
    written?;
    info!("Saved grid to {}", path.display());
    Ok(())
}

fn open_raster(path: &Path) -> Result<DynamicImage, CardgenError> {
    image::open(path).map_err(|e| CardgenError::ImageOpen {
        path: path.to_path_buf(),
        source: e,
    })
}

fn check_capacity(images: usize, grid: GridSize) -> Result<(), CardgenError> {
    if images > grid.capacity() {
        return Err(CardgenError::GridOverflow {
            images,
            columns: grid.columns,
            rows: grid.rows,
            capacity: grid.capacity(),
        });
    }
    Ok(())
}

fn blank_canvas(grid: GridSize, cell: CellSize) -> RgbaImage {
    RgbaImage::from_pixel(
        grid.columns * cell.width,
        grid.rows * cell.height,
        Rgba([255, 255, 255, 255]),
    )
}

fn paste(canvas: &mut RgbaImage, img: &DynamicImage, index: usize, grid: GridSize, cell: CellSize) {
    let resized = imageops::resize(img, cell.width, cell.height, FilterType::CatmullRom);
    let (col, row) = grid.cell_of(index);
    imageops::overlay(
        canvas,
        &resized,
        i64::from(col * cell.width),
        i64::from(row * cell.height),
    );
}

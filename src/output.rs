//! Output types returned by a generation run.

use crate::config::GridSize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// One entry per distinct card, in sheet order.
    pub cards: Vec<CardResult>,
    /// Location of the merged grid image.
    pub grid_path: PathBuf,
    /// Grid capacity the sheet was laid out on.
    pub grid_size: GridSize,
    /// Pixel size of every cell, measured from the first raster.
    pub cell_size: CellSize,
    pub stats: GenerationStats,
}

/// Artifacts produced for a single card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResult {
    /// 1-based spreadsheet row (the header is row 1).
    pub row: usize,
    pub name: String,
    pub svg_path: PathBuf,
    /// `None` until the card has been rasterized.
    pub png_path: Option<PathBuf>,
}

/// Counters and stage timings for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Data rows read from the sheet, blank rows excluded.
    pub total_rows: usize,
    /// Distinct SVG files written.
    pub svgs_written: usize,
    /// PNG files handed back by the rasterizer.
    pub pngs_rasterized: usize,
    pub fill_duration_ms: u64,
    pub raster_duration_ms: u64,
    pub composite_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Pixel dimensions of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} px", self.width, self.height)
    }
}

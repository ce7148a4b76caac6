//! Error types for the cardsmith library.
//!
//! Every failure is fatal to a run: the pipeline has no per-card recovery,
//! so a single [`CardgenError`] is returned from the top-level entry points
//! and whatever artifacts were already written stay on disk.
//!
//! The variants fall into four groups:
//!
//! * **Input**: the spreadsheet, sheet, a column, a card name or a template
//!   is missing or unusable.
//! * **Tool**: the rasterizer could not be started, or a raster it was
//!   supposed to produce is missing or cannot be decoded.
//! * **Invariant**: no rasters at all, a blank first raster, or more
//!   rasters than the grid has cells.
//! * **Output / Config**: writing an artifact failed, or the builder
//!   rejected the configuration.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the cardsmith library.
#[derive(Debug, Error)]
pub enum CardgenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source spreadsheet does not exist.
    #[error("Spreadsheet not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// The spreadsheet exists but could not be opened or parsed.
    #[error("Failed to read spreadsheet '{path}': {detail}")]
    Spreadsheet { path: PathBuf, detail: String },

    /// The requested sheet is not in the workbook.
    #[error("Sheet '{sheet}' not found in '{path}' (available: {available})")]
    SheetNotFound {
        sheet: String,
        path: PathBuf,
        available: String,
    },

    /// A required column header is absent from the sheet.
    #[error("Row {row}: the sheet has no '{column}' column")]
    MissingColumn { row: usize, column: String },

    /// A card name is empty or cannot be used as a file name.
    #[error("Row {row}: card name {name:?} is not usable as a file name")]
    InvalidCardName { row: usize, name: String },

    /// The template file selected by a card does not exist.
    #[error("Template not found: '{path}'")]
    TemplateNotFound { path: PathBuf },

    /// The template file exists but could not be read as text.
    #[error("Failed to read template '{path}': {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artwork path could not be made absolute.
    #[error("Failed to resolve image path '{path}': {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Tool errors ───────────────────────────────────────────────────────
    /// The external rasterizer could not be started at all.
    #[error("Failed to run rasterizer '{program}': {source}\nIs it installed and on PATH?")]
    RasterizerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The in-process rasterizer rejected a document.
    #[error("Rasterisation failed for '{path}': {detail}")]
    Rasterization { path: PathBuf, detail: String },

    /// A raster that should exist is missing or cannot be decoded.
    #[error("Failed to open raster '{path}': {source}")]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Invariant violations ──────────────────────────────────────────────
    /// Nothing was rasterized, so there is nothing to measure or composite.
    #[error("No rasters were produced; is the sheet empty?")]
    NoRasters,

    /// The raster used to size grid cells has no visible content.
    #[error("Raster '{path}' has no visible content; cannot derive the card size")]
    BlankRaster { path: PathBuf },

    /// More rasters than the grid has cells.
    #[error(
        "{images} cards do not fit a {columns}x{rows} grid ({capacity} cells).\n\
         Increase the grid size and retry."
    )]
    GridOverflow {
        images: usize,
        columns: u32,
        rows: u32,
        capacity: usize,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create an output directory or write an output file.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the merged grid failed.
    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

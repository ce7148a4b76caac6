//! Pipeline driver: spreadsheet in, merged card sheet out.
//!
//! [`generate`] runs every stage in order and returns once the grid is on
//! disk. [`fill_cards`] stops after the SVGs are written. Both are
//! synchronous; the only blocking calls are file I/O and the rasterizer.

use crate::config::GeneratorConfig;
use crate::error::CardgenError;
use crate::output::{CardResult, GenerationOutput, GenerationStats};
use crate::pipeline::normalize::CardRecord;
use crate::pipeline::{grid, rasterize, sheet, template};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate every card in the configured sheet and the merged grid.
///
/// # Order
/// Cards are filled in sheet row order. Rasterisation and grid placement
/// follow the same order, keeping only the first row of any repeated name
/// (later rows with that name overwrite its SVG and PNG but take no extra
/// cell).
///
/// # Errors
/// Any failure aborts the run; artifacts already written are left in place.
/// Having more cards than grid cells is reported as a warning up front and
/// fails with [`CardgenError::GridOverflow`] once every card is rasterized.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationOutput, CardgenError> {
    let total_start = Instant::now();
    info!("Starting generation from {}", config.source_file.display());

    // ── Steps 1–4: load, normalise, fill ─────────────────────────────────
    let fill_start = Instant::now();
    let FilledCards {
        mut cards,
        total_rows,
    } = fill_all(config)?;
    let fill_duration_ms = fill_start.elapsed().as_millis() as u64;

    // ── Step 5: rasterise in row order ───────────────────────────────────
    let raster_start = Instant::now();
    let rasterizer = rasterize::resolve_rasterizer(config);
    let png_dir = config.png_dir();
    info!(
        "Rasterising {} cards with {}",
        cards.len(),
        rasterizer.name()
    );

    let total = cards.len();
    let mut png_files = Vec::with_capacity(total);
    for (index, card) in cards.iter_mut().enumerate() {
        let png = rasterize::png_path_for(&card.svg_path, &png_dir);
        if let Some(ref cb) = config.progress_callback {
            cb.on_rasterize_start(index, total, &card.name);
        }
        rasterizer.rasterize(&card.svg_path, &png)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_rasterize_complete(index, total, &card.name);
        }
        card.png_path = Some(png.clone());
        png_files.push(png);
    }
    let raster_duration_ms = raster_start.elapsed().as_millis() as u64;

    // ── Step 6: measure the first raster ─────────────────────────────────
    let Some(first) = png_files.first() else {
        return Err(CardgenError::NoRasters);
    };
    let cell_size = grid::measure_cell(first)?;

    // ── Step 7: composite and save ───────────────────────────────────────
    let composite_start = Instant::now();
    let merged = grid::compose_files(&png_files, config.grid, cell_size)?;
    let grid_path = config.merged_path();
    grid::save_grid(&merged, &grid_path)?;
    let composite_duration_ms = composite_start.elapsed().as_millis() as u64;

    let stats = GenerationStats {
        total_rows,
        svgs_written: cards.len(),
        pngs_rasterized: png_files.len(),
        fill_duration_ms,
        raster_duration_ms,
        composite_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Generation complete: {} cards, {}ms total → {}",
        stats.pngs_rasterized,
        stats.total_duration_ms,
        grid_path.display()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total_rows, png_files.len());
    }

    Ok(GenerationOutput {
        cards,
        grid_path,
        grid_size: config.grid,
        cell_size,
        stats,
    })
}

/// Fill the SVG of every card in the configured sheet without rasterising.
///
/// Returns one [`CardResult`] per distinct card name, in row order, with
/// `png_path` left empty.
pub fn fill_cards(config: &GeneratorConfig) -> Result<Vec<CardResult>, CardgenError> {
    Ok(fill_all(config)?.cards)
}

// ── Internal helpers ─────────────────────────────────────────────────────

struct FilledCards {
    cards: Vec<CardResult>,
    total_rows: usize,
}

fn fill_all(config: &GeneratorConfig) -> Result<FilledCards, CardgenError> {
    ensure_output_dirs(config)?;

    let rows = sheet::load_rows(&config.source_file, &config.source_sheet)?;
    let total_rows = rows.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total_rows);
    }

    let capacity = config.grid.capacity();
    if total_rows > capacity {
        warn!(
            "You have more cards ({}) to create than your grid ({}, {} cells) can accommodate. \
             Change the grid size and retry.",
            total_rows, config.grid, capacity
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_capacity_exceeded(total_rows, capacity);
        }
    }

    let mut cards = Vec::with_capacity(total_rows);
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for (index, row) in rows.iter().enumerate() {
        let card = CardRecord::from_row(row)?;
        let svg_path = template::make_card(config, &card)?;
        debug!("Row {}: {} → {}", card.row, card.name(), svg_path.display());

        if let Some(ref cb) = config.progress_callback {
            cb.on_card_filled(index, total_rows, card.name());
        }

        if seen.insert(svg_path.clone()) {
            cards.push(CardResult {
                row: card.row,
                name: card.name().to_string(),
                svg_path,
                png_path: None,
            });
        } else {
            warn!(
                "Row {}: duplicate card name '{}' overwrites an earlier card",
                card.row,
                card.name()
            );
        }
    }

    info!("Filled {} SVGs from {} rows", cards.len(), total_rows);
    Ok(FilledCards { cards, total_rows })
}

fn ensure_output_dirs(config: &GeneratorConfig) -> Result<(), CardgenError> {
    for dir in [config.svg_dir(), config.png_dir()] {
        create_dir(&dir)?;
    }
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), CardgenError> {
    std::fs::create_dir_all(dir).map_err(|e| CardgenError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

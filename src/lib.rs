//! # cardsmith
//!
//! Batch-generate print-ready card images for a tabletop game from a
//! spreadsheet and a set of SVG templates.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Cards.xlsx
//!  │
//!  ├─ 1. Sheet      read one worksheet into header-keyed rows
//!  ├─ 2. Normalise  row → eight string fields + template variant
//!  ├─ 3. Fill       literal placeholder substitution → output/SVGs/{Name}.svg
//!  ├─ 4. Raster     inkscape (or resvg) → output/PNGs/{Name}.png
//!  └─ 5. Grid       tile every PNG on a fixed grid → output/merged_grid.png
//! ```
//!
//! ## Templates
//!
//! A template is an ordinary SVG drawn in any editor. Text reading
//! `<name>`, `<description>`, `<b>`, `<m>`, `<effect_1>`, `<sym_1>`,
//! `<effect_2>` or `<sym_2>` is replaced by the matching column of the card's
//! row, and the placeholder artwork reference is pointed at
//! `pictures/{Name}.webp`. The row's `Template` column picks
//! `templates/{prefix}_{Template}.svg`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardsmith::{generate, GeneratorConfig, GridSize};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::builder()
//!         .source_file("sources/Cards.xlsx")
//!         .source_sheet("Creatures")
//!         .grid(GridSize::new(10, 7))
//!         .build()?;
//!     let output = generate(&config)?;
//!     eprintln!(
//!         "{} cards of {} → {}",
//!         output.stats.pngs_rasterized,
//!         output.cell_size,
//!         output.grid_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cardsmith` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GeneratorConfig, GeneratorConfigBuilder, GridSize, RasterBackend};
pub use error::CardgenError;
pub use generate::{fill_cards, generate};
pub use output::{CardResult, CellSize, GenerationOutput, GenerationStats};
pub use pipeline::normalize::CardRecord;
pub use pipeline::rasterize::{InkscapeRasterizer, Rasterizer, ResvgRasterizer};
pub use pipeline::template::{make_card, Replacements};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};

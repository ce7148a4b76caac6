//! Configuration types for card generation.
//!
//! Every path, name and dimension the pipeline touches lives in
//! [`GeneratorConfig`], built via its [`GeneratorConfigBuilder`]. The
//! defaults reproduce the conventional project layout:
//!
//! ```text
//! pictures/            artwork, one `{Name}.webp` per card
//! sources/Cards.xlsx   the card table, sheet "Creatures"
//! templates/           creature_{Template}.svg
//! output/SVGs/         filled documents
//! output/PNGs/         rasters
//! output/merged_grid.png
//! ```

use crate::error::CardgenError;
use crate::pipeline::rasterize::Rasterizer;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for a card-generation run.
///
/// Built via [`GeneratorConfig::builder()`] or using
/// [`GeneratorConfig::default()`].
///
/// # Example
/// ```rust
/// use cardsmith::{GeneratorConfig, GridSize};
///
/// let config = GeneratorConfig::builder()
///     .source_file("decks/Cards.xlsx")
///     .source_sheet("Spells")
///     .template_prefix("spell")
///     .grid(GridSize::new(10, 7))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Directory holding the card artwork. Default: `pictures`.
    pub pictures_dir: PathBuf,

    /// Spreadsheet holding one card per row. Default: `sources/Cards.xlsx`.
    pub source_file: PathBuf,

    /// Sheet within [`Self::source_file`]. Default: `Creatures`.
    pub source_sheet: String,

    /// Directory holding the SVG templates. Default: `templates`.
    pub templates_dir: PathBuf,

    /// Template file prefix; a card with `Template = light` uses
    /// `{prefix}_light.svg`. Default: `creature`.
    pub template_prefix: String,

    /// Root of all generated artifacts. Default: `output`.
    pub output_dir: PathBuf,

    /// Capacity of the merged sheet. Default: 10 × 7.
    ///
    /// 10 × 7 matches the deck-sheet limit of common tabletop simulators.
    pub grid: GridSize,

    /// Opening delimiter of a placeholder token. Default: `&lt;`.
    ///
    /// Placeholders are written `<name>` in the editor, which SVG stores as
    /// escaped text, so the token on disk is `&lt;name&gt;`.
    pub token_open: String,

    /// Closing delimiter of a placeholder token. Default: `&gt;`.
    pub token_close: String,

    /// Literal artwork reference inside the templates, replaced by the
    /// absolute path of each card's picture.
    pub image_placeholder: String,

    /// Extension of the artwork files. Default: `webp`.
    pub image_extension: String,

    /// File name of the merged grid under [`Self::output_dir`].
    /// Default: `merged_grid.png`.
    pub merged_filename: String,

    /// Which rasterizer to construct when [`Self::rasterizer`] is `None`.
    pub backend: RasterBackend,

    /// Executable used by [`RasterBackend::Inkscape`]. Default: `inkscape`.
    pub inkscape_program: PathBuf,

    /// Pre-constructed rasterizer. Takes precedence over `backend`.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Receives per-card events while the run progresses.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pictures_dir: PathBuf::from("pictures"),
            source_file: PathBuf::from("sources/Cards.xlsx"),
            source_sheet: "Creatures".to_string(),
            templates_dir: PathBuf::from("templates"),
            template_prefix: "creature".to_string(),
            output_dir: PathBuf::from("output"),
            grid: GridSize::default(),
            token_open: "&lt;".to_string(),
            token_close: "&gt;".to_string(),
            image_placeholder: DEFAULT_IMAGE_PLACEHOLDER.to_string(),
            image_extension: "webp".to_string(),
            merged_filename: "merged_grid.png".to_string(),
            backend: RasterBackend::default(),
            inkscape_program: PathBuf::from("inkscape"),
            rasterizer: None,
            progress_callback: None,
        }
    }
}

/// Artwork reference the stock templates were drawn with (URL-encoded, as
/// the SVG stores it).
pub const DEFAULT_IMAGE_PLACEHOLDER: &str = "./PICTURE%20PATH%20IN%20YOUR%20SVG%20FILE.webp";

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("pictures_dir", &self.pictures_dir)
            .field("source_file", &self.source_file)
            .field("source_sheet", &self.source_sheet)
            .field("templates_dir", &self.templates_dir)
            .field("template_prefix", &self.template_prefix)
            .field("output_dir", &self.output_dir)
            .field("grid", &self.grid)
            .field("token_open", &self.token_open)
            .field("token_close", &self.token_close)
            .field("image_placeholder", &self.image_placeholder)
            .field("image_extension", &self.image_extension)
            .field("merged_filename", &self.merged_filename)
            .field("backend", &self.backend)
            .field("inkscape_program", &self.inkscape_program)
            .field(
                "rasterizer",
                &self.rasterizer.as_ref().map(|r| r.name().to_string()),
            )
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }

    /// `output/SVGs`
    pub fn svg_dir(&self) -> PathBuf {
        self.output_dir.join("SVGs")
    }

    /// `output/PNGs`
    pub fn png_dir(&self) -> PathBuf {
        self.output_dir.join("PNGs")
    }

    /// `output/{merged_filename}`
    pub fn merged_path(&self) -> PathBuf {
        self.output_dir.join(&self.merged_filename)
    }

    /// Path of the template selected by `variant`.
    pub fn template_path(&self, variant: &str) -> PathBuf {
        self.templates_dir
            .join(format!("{}_{}.svg", self.template_prefix, variant))
    }

    /// File name of the artwork for the card called `name`.
    pub fn image_file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.image_extension)
    }
}

/// Builder for [`GeneratorConfig`].
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl fmt::Debug for GeneratorConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GeneratorConfigBuilder")
            .field(&self.config)
            .finish()
    }
}

impl GeneratorConfigBuilder {
    pub fn pictures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.pictures_dir = dir.into();
        self
    }

    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source_file = path.into();
        self
    }

    pub fn source_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.config.source_sheet = sheet.into();
        self
    }

    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.templates_dir = dir.into();
        self
    }

    pub fn template_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.template_prefix = prefix.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn grid(mut self, grid: GridSize) -> Self {
        self.config.grid = grid;
        self
    }

    /// Set both placeholder delimiters, e.g. `("<", ">")` for templates that
    /// keep raw angle brackets.
    pub fn token_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.config.token_open = open.into();
        self.config.token_close = close.into();
        self
    }

    pub fn image_placeholder(mut self, token: impl Into<String>) -> Self {
        self.config.image_placeholder = token.into();
        self
    }

    pub fn image_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.image_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn merged_filename(mut self, name: impl Into<String>) -> Self {
        self.config.merged_filename = name.into();
        self
    }

    pub fn backend(mut self, backend: RasterBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn inkscape_program(mut self, program: impl AsRef<Path>) -> Self {
        self.config.inkscape_program = program.as_ref().to_path_buf();
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, CardgenError> {
        let c = &self.config;
        if c.grid.columns == 0 || c.grid.rows == 0 {
            return Err(CardgenError::InvalidConfig(format!(
                "grid must have at least one column and one row, got {}",
                c.grid
            )));
        }
        if c.template_prefix.is_empty() {
            return Err(CardgenError::InvalidConfig(
                "template prefix must not be empty".into(),
            ));
        }
        if c.source_sheet.is_empty() {
            return Err(CardgenError::InvalidConfig(
                "sheet name must not be empty".into(),
            ));
        }
        if c.token_open.is_empty() || c.token_close.is_empty() {
            return Err(CardgenError::InvalidConfig(
                "placeholder delimiters must not be empty".into(),
            ));
        }
        if c.merged_filename.is_empty() {
            return Err(CardgenError::InvalidConfig(
                "merged file name must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Grid ─────────────────────────────────────────────────────────────────

/// Capacity of the merged sheet in cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub columns: u32,
    pub rows: u32,
}

impl GridSize {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of cells.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Cell `(column, row)` of the card at sequence position `index`,
    /// filling row-major from the top-left.
    pub fn cell_of(&self, index: usize) -> (u32, u32) {
        let cols = self.columns as usize;
        ((index % cols) as u32, (index / cols) as u32)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(10, 7)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

impl FromStr for GridSize {
    type Err = CardgenError;

    /// Parse `COLSxROWS`, e.g. `10x7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CardgenError::InvalidConfig(format!("grid must look like 10x7, got {s:?}"));
        let (cols, rows) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let columns = cols.trim().parse::<u32>().map_err(|_| invalid())?;
        let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { columns, rows })
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which rasterizer turns filled SVGs into PNGs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterBackend {
    /// Run `inkscape <svg> --export-type=png --export-filename=<png>`. (default)
    #[default]
    Inkscape,
    /// Render in-process with resvg; no external tool needed.
    Resvg,
}

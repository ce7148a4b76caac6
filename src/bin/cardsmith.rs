//! CLI binary for cardsmith.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GeneratorConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use cardsmith::{
    fill_cards, generate, GenerationProgressCallback, GeneratorConfig, GridSize,
    ProgressCallback, RasterBackend,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while the sheet loads, then a bar
/// that advances once per filled card and once per rasterized card.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading spreadsheet…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full bar once the card count is known. Filling and
    /// rasterising each count once per card.
    fn activate_bar(&self, cards: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len}  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(cards as u64 * 2);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Filling");
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_cards: usize) {
        self.activate_bar(total_cards);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total_cards} cards…"))
        ));
    }

    fn on_capacity_exceeded(&self, cards: usize, capacity: usize) {
        self.bar.println(format!(
            "  {} {}",
            yellow("⚠"),
            yellow(&format!(
                "{cards} cards exceed the grid's {capacity} cells; the merge step will fail. \
                 Change --grid and retry."
            ))
        ));
    }

    fn on_card_filled(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    fn on_rasterize_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_prefix("Rasterising");
        self.bar.set_message(name.to_string());
    }

    fn on_rasterize_complete(&self, index: usize, total: usize, name: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}",
            green("✓"),
            index + 1,
            total,
            dim(name)
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _cards: usize, rasterized: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} cards rendered",
            green("✔"),
            bold(&rasterized.to_string())
        );
    }
}

impl CliProgressCallback {
    fn abandon(&self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default project layout (sources/Cards.xlsx, templates/, pictures/)
  cardsmith

  # Another sheet and template family
  cardsmith --sheet Spells --prefix spell

  # Bigger sheet
  cardsmith --grid 10x10

  # Render without Inkscape
  cardsmith --rasterizer resvg

  # Only write the filled SVGs
  cardsmith --svg-only

  # JSON summary
  cardsmith --json > run.json

PROJECT LAYOUT:
  sources/Cards.xlsx        columns: Name, Description, B, M,
                            Effect L, Sym L, Effect R, Sym R, Template
  templates/creature_light.svg
                            placeholders: <name> <description> <b> <m>
                            <effect_1> <sym_1> <effect_2> <sym_2>
  pictures/{Name}.webp      card artwork
  output/SVGs/ output/PNGs/ output/merged_grid.png

ENVIRONMENT VARIABLES:
  CARDSMITH_*             Every flag can be set from the environment
  RUST_LOG                Override log filtering (e.g. cardsmith=debug)
"#;

/// Generate tabletop card images and a merged sheet from a spreadsheet.
#[derive(Parser, Debug)]
#[command(
    name = "cardsmith",
    version,
    about = "Generate tabletop card images and a merged sheet from a spreadsheet",
    long_about = "Fill SVG card templates from spreadsheet rows, rasterise each card \
with Inkscape (or resvg), and tile every card onto a single fixed-grid PNG ready for \
printing or import into a tabletop simulator.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Spreadsheet holding one card per row.
    #[arg(long, env = "CARDSMITH_SOURCE", default_value = "sources/Cards.xlsx")]
    source: PathBuf,

    /// Sheet within the spreadsheet.
    #[arg(long, env = "CARDSMITH_SHEET", default_value = "Creatures")]
    sheet: String,

    /// Directory holding the SVG templates.
    #[arg(long, env = "CARDSMITH_TEMPLATES", default_value = "templates")]
    templates: PathBuf,

    /// Template file prefix: {prefix}_{Template}.svg.
    #[arg(long, env = "CARDSMITH_PREFIX", default_value = "creature")]
    prefix: String,

    /// Directory holding the card artwork.
    #[arg(long, env = "CARDSMITH_PICTURES", default_value = "pictures")]
    pictures: PathBuf,

    /// Output root for SVGs/, PNGs/ and the merged grid.
    #[arg(short, long, env = "CARDSMITH_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Grid capacity as COLSxROWS.
    #[arg(long, env = "CARDSMITH_GRID", default_value = "10x7")]
    grid: GridSize,

    /// Rasteriser backend.
    #[arg(long, env = "CARDSMITH_RASTERIZER", value_enum, default_value = "inkscape")]
    rasterizer: RasterizerArg,

    /// Inkscape executable.
    #[arg(long, env = "CARDSMITH_INKSCAPE", default_value = "inkscape")]
    inkscape: PathBuf,

    /// Write the filled SVGs and stop.
    #[arg(long, env = "CARDSMITH_SVG_ONLY")]
    svg_only: bool,

    /// Print a JSON summary to stdout.
    #[arg(long, env = "CARDSMITH_JSON")]
    json: bool,

    /// Disable progress bar. Also shows the per-card INFO logs, such as
    /// each resolved artwork path; missing artwork is always reported.
    #[arg(long, env = "CARDSMITH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CARDSMITH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CARDSMITH_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum RasterizerArg {
    Inkscape,
    Resvg,
}

impl From<RasterizerArg> for RasterBackend {
    fn from(v: RasterizerArg) -> Self {
        match v {
            RasterizerArg::Inkscape => RasterBackend::Inkscape,
            RasterizerArg::Resvg => RasterBackend::Resvg,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With the progress bar active only warnings get through; the bar
    // reports per-card progress itself.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(
        &cli,
        progress
            .clone()
            .map(|cb| cb as Arc<dyn GenerationProgressCallback>),
    )?;

    // ── SVG-only mode ────────────────────────────────────────────────────
    if cli.svg_only {
        let cards = fill_cards(&config);
        if let Some(ref cb) = progress {
            cb.abandon();
        }
        let cards = cards.context("Filling templates failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&cards).context("Failed to serialize cards")?
            );
        } else if !cli.quiet {
            eprintln!(
                "{} {} SVGs  →  {}",
                green("✔"),
                cards.len(),
                bold(&config.svg_dir().display().to_string())
            );
        }
        return Ok(());
    }

    // ── Run generation ───────────────────────────────────────────────────
    let result = generate(&config);
    if let Some(ref cb) = progress {
        cb.abandon();
    }
    let output = result.context("Card generation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize output")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} cards  {}  {}ms  →  {}",
            green("✔"),
            output.stats.pngs_rasterized,
            dim(&output.cell_size.to_string()),
            output.stats.total_duration_ms,
            bold(&output.grid_path.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `GeneratorConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GeneratorConfig> {
    let mut builder = GeneratorConfig::builder()
        .source_file(&cli.source)
        .source_sheet(&cli.sheet)
        .templates_dir(&cli.templates)
        .template_prefix(&cli.prefix)
        .pictures_dir(&cli.pictures)
        .output_dir(&cli.output)
        .grid(cli.grid)
        .backend(cli.rasterizer.clone().into())
        .inkscape_program(&cli.inkscape);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let cli = Cli::parse_from(["cardsmith"]);
        let config = build_config(&cli, None).unwrap();
        let lib = GeneratorConfig::default();
        assert_eq!(config.source_file, lib.source_file);
        assert_eq!(config.source_sheet, lib.source_sheet);
        assert_eq!(config.template_prefix, lib.template_prefix);
        assert_eq!(config.grid, lib.grid);
        assert_eq!(config.backend, RasterBackend::Inkscape);
    }

    #[test]
    fn grid_and_backend_flags() {
        let cli = Cli::parse_from(["cardsmith", "--grid", "4x3", "--rasterizer", "resvg"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.grid, GridSize::new(4, 3));
        assert_eq!(config.backend, RasterBackend::Resvg);
    }

    #[test]
    fn zero_grid_is_rejected() {
        let cli = Cli::parse_from(["cardsmith", "--grid", "0x3"]);
        assert!(build_config(&cli, None).is_err());
    }
}

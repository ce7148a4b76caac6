//! Rasterisation: filled SVG → PNG.
//!
//! Two backends sit behind the [`Rasterizer`] trait:
//!
//! * [`InkscapeRasterizer`] runs `inkscape <svg> --export-type=png
//!   --export-filename=<png>` and waits for it. Its exit status is logged but
//!   not treated as an error; a failed export shows up later, when the
//!   missing or broken PNG is opened for compositing.
//! * [`ResvgRasterizer`] renders in-process and reports failures directly.

use crate::config::{GeneratorConfig, RasterBackend};
use crate::error::CardgenError;
use resvg::{tiny_skia, usvg};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns one SVG document into one PNG file.
pub trait Rasterizer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Render `svg` to `png`, overwriting it.
    fn rasterize(&self, svg: &Path, png: &Path) -> Result<(), CardgenError>;
}

/// Build the rasterizer a config asks for: the pre-built one if present,
/// otherwise the configured backend.
pub fn resolve_rasterizer(config: &GeneratorConfig) -> Arc<dyn Rasterizer> {
    if let Some(ref rasterizer) = config.rasterizer {
        return Arc::clone(rasterizer);
    }
    match config.backend {
        RasterBackend::Inkscape => Arc::new(InkscapeRasterizer::new(&config.inkscape_program)),
        RasterBackend::Resvg => Arc::new(ResvgRasterizer::new()),
    }
}

/// `{png_dir}/{stem}.png` for a filled SVG.
pub fn png_path_for(svg: &Path, png_dir: &Path) -> PathBuf {
    let stem = svg.file_stem().unwrap_or(svg.as_os_str());
    let mut file = stem.to_os_string();
    file.push(".png");
    png_dir.join(file)
}

// ── Inkscape ─────────────────────────────────────────────────────────────

/// Rasterizes through the Inkscape command-line exporter.
#[derive(Debug, Clone)]
pub struct InkscapeRasterizer {
    program: PathBuf,
}

impl InkscapeRasterizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed after the program name. Paths are passed through
    /// unchanged, including non-UTF-8 ones.
    pub fn args(svg: &Path, png: &Path) -> Vec<OsString> {
        let mut export = OsString::from("--export-filename=");
        export.push(png.as_os_str());
        vec![
            svg.as_os_str().to_os_string(),
            OsString::from("--export-type=png"),
            export,
        ]
    }
}

impl Default for InkscapeRasterizer {
    fn default() -> Self {
        Self::new("inkscape")
    }
}

impl Rasterizer for InkscapeRasterizer {
    fn name(&self) -> &str {
        "inkscape"
    }

    fn rasterize(&self, svg: &Path, png: &Path) -> Result<(), CardgenError> {
        let output = Command::new(&self.program)
            .args(Self::args(svg, png))
            .output()
            .map_err(|e| CardgenError::RasterizerSpawn {
                program: self.program.display().to_string(),
                source: e,
            })?;

        if !output.status.success() {
            warn!(
                "{} exited with {} for {}: {}",
                self.program.display(),
                output.status,
                svg.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        debug!("{} → {}", svg.display(), png.display());
        Ok(())
    }
}

// ── resvg ────────────────────────────────────────────────────────────────

/// Rasterizes in-process with resvg at the document's own size.
#[derive(Clone)]
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    /// Create a rasterizer using the system fonts.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        info!("resvg: loaded {} font faces", fontdb.len());
        Self {
            fontdb: Arc::new(fontdb),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &str {
        "resvg"
    }

    fn rasterize(&self, svg: &Path, png: &Path) -> Result<(), CardgenError> {
        let failed = |detail: String| CardgenError::Rasterization {
            path: svg.to_path_buf(),
            detail,
        };

        let data = std::fs::read(svg).map_err(|e| failed(e.to_string()))?;

        let mut opt = usvg::Options::default();
        opt.resources_dir = svg.parent().map(Path::to_path_buf);
        opt.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_data(&data, &opt).map_err(|e| failed(e.to_string()))?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| failed(format!("cannot allocate {}x{} pixmap", size.width(), size.height())))?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        pixmap.save_png(png).map_err(|e| failed(e.to_string()))?;
        debug!(
            "{} → {} ({}x{} px)",
            svg.display(),
            png.display(),
            size.width(),
            size.height()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_path_swaps_dir_and_extension() {
        let p = png_path_for(Path::new("output/SVGs/Wolf.svg"), Path::new("output/PNGs"));
        assert_eq!(p, PathBuf::from("output/PNGs/Wolf.png"));

        // names containing the directory or extension text stay intact
        let p = png_path_for(Path::new("output/SVGs/SVGs.svg.svg"), Path::new("output/PNGs"));
        assert_eq!(p, PathBuf::from("output/PNGs/SVGs.svg.png"));
    }

    #[test]
    fn inkscape_arguments() {
        let args = InkscapeRasterizer::args(Path::new("a/Wolf.svg"), Path::new("b/Wolf.png"));
        assert_eq!(
            args,
            vec![
                OsString::from("a/Wolf.svg"),
                OsString::from("--export-type=png"),
                OsString::from("--export-filename=b/Wolf.png"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn inkscape_arguments_keep_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let svg = Path::new(OsStr::from_bytes(b"in/W\xffolf.svg"));
        let png = Path::new(OsStr::from_bytes(b"out/W\xffolf.png"));
        let args = InkscapeRasterizer::args(svg, png);

        assert_eq!(args[0].as_bytes(), b"in/W\xffolf.svg");
        assert_eq!(args[2].as_bytes(), b"--export-filename=out/W\xffolf.png");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let r = InkscapeRasterizer::new("/definitely/not/inkscape");
        let err = r
            .rasterize(Path::new("in.svg"), Path::new("out.png"))
            .unwrap_err();
        assert!(matches!(err, CardgenError::RasterizerSpawn { .. }));
    }

    #[test]
    fn resolve_prefers_prebuilt() {
        struct Fixed;
        impl Rasterizer for Fixed {
            fn name(&self) -> &str {
                "fixed"
            }
            fn rasterize(&self, _svg: &Path, _png: &Path) -> Result<(), CardgenError> {
                Ok(())
            }
        }

        let config = GeneratorConfig::builder()
            .backend(RasterBackend::Resvg)
            .rasterizer(Arc::new(Fixed))
            .build()
            .unwrap();
        assert_eq!(resolve_rasterizer(&config).name(), "fixed");

        let config = GeneratorConfig::default();
        assert_eq!(resolve_rasterizer(&config).name(), "inkscape");
    }

    #[test]
    fn resvg_renders_document_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let svg = dir.path().join("card.svg");
        let png = dir.path().join("card.png");
        std::fs::write(
            &svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="40">
                 <rect width="30" height="40" fill="#ff0000"/>
               </svg>"##,
        )
        .unwrap();

        ResvgRasterizer::new().rasterize(&svg, &png).unwrap();

        let img = image::open(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (30, 40));
        assert_eq!(img.get_pixel(15, 20).0, [255, 0, 0, 255]);
    }

    #[test]
    fn resvg_rejects_non_svg() {
        let dir = tempfile::TempDir::new().unwrap();
        let svg = dir.path().join("broken.svg");
        std::fs::write(&svg, "not an svg").unwrap();
        let err = ResvgRasterizer::new()
            .rasterize(&svg, &dir.path().join("broken.png"))
            .unwrap_err();
        assert!(matches!(err, CardgenError::Rasterization { .. }));
    }
}

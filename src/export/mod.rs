pub mod css;
mod font;
pub mod json;
pub mod png;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::error::Result as PaletteResult;
use crate::model::Palette;

pub use css::{to_css, CssExporter};
pub use json::{from_json, to_json, to_json_at, JsonExporter};
pub use png::{draw_palette, ImageSurface, PngExporter, Surface, TextAlign, TextStyle};

/// Tag written into exports and stamped on images.
pub const SOURCE_TAG: &str = "Paletto";

/// A palette output format.
pub trait Exporter {
    /// Human-readable format name.
    fn name(&self) -> &str;

    /// File name the shell should save under.
    fn file_name(&self) -> &str;

    /// Render the palette to bytes.
    fn render(&self, palette: &Palette) -> PaletteResult<Vec<u8>>;

    /// Render and write to an arbitrary path.
    fn write_to(&self, palette: &Palette, path: &Path) -> Result<()> {
        let bytes = self
            .render(palette)
            .with_context(|| format!("failed to render {} export", self.name()))?;
        std::fs::write(path, bytes).with_context(|| {
            format!("failed to write {} export to {}", self.name(), path.display())
        })?;
        info!(format = self.name(), path = %path.display(), "palette exported");
        Ok(())
    }

    /// Write into `dir` under [`Exporter::file_name`], creating the directory.
    fn save_in(&self, palette: &Palette, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export directory: {}", dir.display()))?;
        let path = dir.join(self.file_name());
        self.write_to(palette, &path)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Png,
    Css,
    Json,
}

impl ExportFormat {
    /// Exporter for this format. `width`/`height` only matter for PNG.
    pub fn exporter(self, width: u32, height: u32) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Png => Box::new(PngExporter { width, height }),
            ExportFormat::Css => Box::new(CssExporter),
            ExportFormat::Json => Box::new(JsonExporter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::from_hexes(&["#112233", "#445566", "#778899", "#AABBCC", "#DDEEFF"]).unwrap()
    }

    #[test]
    fn file_names_match_format() {
        let names: Vec<String> = [ExportFormat::Png, ExportFormat::Css, ExportFormat::Json]
            .into_iter()
            .map(|f| f.exporter(120, 30).file_name().to_string())
            .collect();
        assert_eq!(names, vec!["palette.png", "palette.css", "palette.json"]);
    }

    #[test]
    fn save_in_creates_directory_and_file() {
        let dir = std::env::temp_dir().join(format!("paletto-test-export-{}", std::process::id()));
        let path = ExportFormat::Css
            .exporter(0, 0)
            .save_in(&palette(), &dir.join("nested"))
            .unwrap();

        assert_eq!(path, dir.join("nested").join("palette.css"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("--color-1: #112233;"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn write_to_reports_render_failure() {
        let short = Palette::from_hexes(&["#000000"]).unwrap();
        let path = std::env::temp_dir().join("paletto-test-never-written.css");
        let err = CssExporter.write_to(&short, &path).unwrap_err();
        assert!(format!("{err:#}").contains("at least 5"));
        assert!(!path.exists());
    }
}

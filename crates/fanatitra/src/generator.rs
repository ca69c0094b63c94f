//! Receipt generation pipeline

use crate::canvas::{FontRole, MeasuringCanvas};
use crate::composer::Composer;
use crate::config::{HeightPolicy, PdfConfig};
use crate::entry::DeliveryEntry;
use crate::fonts::{FontPaths, FontResolver, SystemFontResolver};
use crate::output::{self, OutputLocation};
use crate::{ReceiptError, Result};
use chrono::NaiveDate;
use pdf_core::{PdfDocument, PdfError, Unit};
use std::path::{Path, PathBuf};

/// A receipt rendered in memory
#[derive(Debug, Clone)]
pub struct RenderedReceipt {
    pub bytes: Vec<u8>,
    pub entry_blocks: usize,
    /// Page height in millimetres
    pub page_height: f64,
}

/// A receipt written to disk
#[derive(Debug, Clone)]
pub struct GeneratedReceipt {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub entry_blocks: usize,
    pub page_height: f64,
}

/// Font files read into memory
struct LoadedFonts {
    paths: FontPaths,
    regular: Vec<u8>,
    bold: Vec<u8>,
}

/// Produces receipts from a configuration and a font source
///
/// # Example
/// ```ignore
/// let config = PdfConfig::default();
/// let fonts = SystemFontResolver::new();
/// let receipt = ReceiptGenerator::new(&config, &fonts)
///     .with_output(OutputLocation::at("/tmp"))
///     .generate("North", &entries)?;
/// ```
pub struct ReceiptGenerator<'a> {
    config: &'a PdfConfig,
    fonts: &'a dyn FontResolver,
    output: OutputLocation,
    date: Option<NaiveDate>,
}

impl<'a> ReceiptGenerator<'a> {
    pub fn new(config: &'a PdfConfig, fonts: &'a dyn FontResolver) -> Self {
        let output = match &config.output_dir {
            Some(dir) => OutputLocation::at(dir),
            None => OutputLocation::downloads(),
        };

        Self {
            config,
            fonts,
            output,
            date: None,
        }
    }

    pub fn with_output(mut self, output: OutputLocation) -> Self {
        self.output = output;
        self
    }

    /// Fix the date printed in the footer and file name
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Render the receipt and write it to the output location
    pub fn generate(&self, zone: &str, entries: &[DeliveryEntry]) -> Result<GeneratedReceipt> {
        let date = self.date();
        let rendered = self.render_on(zone, entries, date)?;

        let path = self.output.file_path(zone, date)?;
        output::write_file(&path, &rendered.bytes)?;
        log::info!("wrote {} ({} bytes)", path.display(), rendered.bytes.len());

        Ok(GeneratedReceipt {
            path,
            bytes: rendered.bytes,
            entry_blocks: rendered.entry_blocks,
            page_height: rendered.page_height,
        })
    }

    /// Render the receipt to bytes without touching the output location
    pub fn render(&self, zone: &str, entries: &[DeliveryEntry]) -> Result<RenderedReceipt> {
        self.render_on(zone, entries, self.date())
    }

    fn render_on(
        &self,
        zone: &str,
        entries: &[DeliveryEntry],
        date: NaiveDate,
    ) -> Result<RenderedReceipt> {
        let config = self.config;
        config.validate()?;

        let fonts = load_fonts(&self.fonts.resolve()?)?;
        let logo = load_logo(config.logo_path.as_deref());

        let mut composer = Composer::new(config);
        if let Some(logo) = &logo {
            composer = composer.with_logo(logo);
        }

        let page_height = match config.height_policy {
            HeightPolicy::Estimated => config.estimated_height(entries.len()),
            HeightPolicy::Measured => {
                let mut scratch =
                    new_document(config.page_width, config.estimated_height(entries.len()), &fonts)?;
                let summary =
                    composer.compose(&mut MeasuringCanvas::new(&mut scratch), zone, entries, date)?;
                summary.end_y + config.margin_bottom
            }
        };
        log::debug!(
            "page {} x {page_height} mm for {} entries",
            config.page_width,
            entries.len()
        );

        let mut doc = new_document(config.page_width, page_height, &fonts)?;
        let summary = composer.compose(&mut doc, zone, entries, date)?;

        let bytes = doc
            .to_bytes()
            .map_err(|e| ReceiptError::Save(e.to_string()))?;

        Ok(RenderedReceipt {
            bytes,
            entry_blocks: summary.entry_blocks,
            page_height,
        })
    }
}

/// Generate a receipt with installed or downloaded fonts into the
/// configured output directory
pub fn generate_pdf(
    zone: &str,
    entries: &[DeliveryEntry],
    config: &PdfConfig,
) -> Result<GeneratedReceipt> {
    let fonts = SystemFontResolver::new();
    ReceiptGenerator::new(config, &fonts).generate(zone, entries)
}

fn load_fonts(paths: &FontPaths) -> Result<LoadedFonts> {
    let read = |weight: &'static str, path: &Path| {
        std::fs::read(path).map_err(|e| ReceiptError::FontLoad {
            weight,
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    };

    Ok(LoadedFonts {
        regular: read(FontRole::Regular.name(), &paths.regular)?,
        bold: read(FontRole::Bold.name(), &paths.bold)?,
        paths: paths.clone(),
    })
}

fn load_logo(path: Option<&Path>) -> Option<Vec<u8>> {
    let path = path?;
    if !path.exists() {
        log::debug!("no logo at {}", path.display());
        return None;
    }

    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(err) => {
            log::warn!("cannot read logo {}: {err}", path.display());
            None
        }
    }
}

/// A single page with both font weights registered
fn new_document(width: f64, height: f64, fonts: &LoadedFonts) -> Result<PdfDocument> {
    let mut doc = PdfDocument::new(width, height, Unit::Mm)?;

    let weights = [
        (FontRole::Regular, &fonts.paths.regular, &fonts.regular),
        (FontRole::Bold, &fonts.paths.bold, &fonts.bold),
    ];
    for (role, path, data) in weights {
        doc.add_font(role.name(), data).map_err(|err| match err {
            PdfError::FontParseError(reason) => ReceiptError::FontLoad {
                weight: role.name(),
                path: path.clone(),
                reason,
            },
            other => ReceiptError::Pdf(other),
        })?;
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FixedFontResolver;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_missing_font_file_names_weight() {
        let dir = tempfile::tempdir().unwrap();
        let regular = dir.path().join("regular.ttf");
        std::fs::write(&regular, b"x").unwrap();

        let result = load_fonts(&FontPaths::new(&regular, dir.path().join("bold.ttf")));
        match result {
            Err(ReceiptError::FontLoad { weight, path, .. }) => {
                assert_eq!(weight, "bold");
                assert_eq!(path, dir.path().join("bold.ttf"));
            }
            _ => panic!("expected a font load error"),
        }
    }

    #[test]
    fn test_unparseable_font_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let config = PdfConfig {
            logo_path: None,
            ..PdfConfig::default()
        };
        let fonts = FixedFontResolver::new(FontPaths::new(&path, &path));
        let result = ReceiptGenerator::new(&config, &fonts)
            .with_output(OutputLocation::at(dir.path()))
            .with_date(date())
            .generate("North", &[]);

        assert!(matches!(
            result,
            Err(ReceiptError::FontLoad { weight: "regular", .. })
        ));
        assert!(!dir.path().join("fanatitra_North_2026-10-19.pdf").exists());
    }

    #[test]
    fn test_invalid_config_rejected_before_fonts() {
        let config = PdfConfig {
            page_width: 5.0,
            ..PdfConfig::default()
        };
        let fonts = FixedFontResolver::new(FontPaths::new("/nope/r.ttf", "/nope/b.ttf"));

        let result = ReceiptGenerator::new(&config, &fonts).render("North", &[]);
        assert!(matches!(result, Err(ReceiptError::Config(_))));
    }

    #[test]
    fn test_missing_logo_is_skipped() {
        let dir = tempfile::tempdir().unwrap();

        assert!(load_logo(None).is_none());
        assert!(load_logo(Some(&dir.path().join("logo.png"))).is_none());

        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, b"png").unwrap();
        assert_eq!(load_logo(Some(&logo)), Some(b"png".to_vec()));
    }

    #[test]
    fn test_output_dir_from_config() {
        let config = PdfConfig {
            output_dir: Some(PathBuf::from("/srv/receipts")),
            ..PdfConfig::default()
        };
        let fonts = FixedFontResolver::new(FontPaths::new("r.ttf", "b.ttf"));

        let generator = ReceiptGenerator::new(&config, &fonts);
        assert_eq!(generator.output, OutputLocation::at("/srv/receipts"));
    }
}

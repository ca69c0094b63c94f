//! PDF Core - Low-level single-page PDF composition
//!
//! This crate provides functionality for:
//! - Creating a blank page sized in millimetres or points
//! - Embedding TrueType fonts and measuring text with them
//! - Inserting text at top-left anchored coordinates
//! - Drawing solid and dashed lines
//! - Inserting images (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{LineStyle, PdfDocument, Unit};
//!
//! let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm)?;
//! doc.add_font("regular", &std::fs::read("DejaVuSans.ttf")?)?;
//! doc.set_font("regular", 9.0)?;
//! doc.insert_text("Hello, World!", 4.0, 4.0)?;
//! doc.draw_line(4.0, 10.0, 74.0, 10.0, 0.3, LineStyle::Solid)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::PdfDocument;
pub use font::FontData;
pub use graphics::{generate_line_operators, LineStyle};
pub use image::{ColorSpace, ImageData, ImageXObject};
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page size: {0} x {1}")]
    InvalidPageSize(f64, f64),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Physical unit used for page size and coordinates
///
/// Font sizes are always expressed in points, whatever the unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Pt,
    Mm,
}

impl Unit {
    /// Number of PDF points in one unit
    pub fn points(self) -> f64 {
        match self {
            Unit::Pt => 1.0,
            Unit::Mm => 72.0 / 25.4,
        }
    }

    /// Convert a length in this unit to points
    pub fn to_points(self, value: f64) -> f64 {
        value * self.points()
    }

    /// Convert a length in points to this unit
    pub fn from_points(self, value: f64) -> f64 {
        value / self.points()
    }
}

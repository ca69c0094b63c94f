//! Fanatitra - delivery receipt composition
//!
//! This crate provides:
//! - Parsing of tab-separated delivery records
//! - Item pricing with the compact "thousands" notation
//! - Width-driven word wrapping
//! - Layout of a narrow, single-page receipt sized to its content
//! - Font resolution and output file placement
//!
//! # Example
//!
//! ```ignore
//! use fanatitra::{parse_content, PdfConfig, ReceiptGenerator, SystemFontResolver};
//!
//! let entries = parse_content("1\tRabe\tLot II A\t034 00 000 00\t10+5\n");
//! let config = PdfConfig::default();
//! let fonts = SystemFontResolver::new();
//! let receipt = ReceiptGenerator::new(&config, &fonts).generate("Analakely", &entries)?;
//! println!("written to {}", receipt.path.display());
//! ```

pub mod canvas;
mod composer;
pub mod config;
mod entry;
pub mod fonts;
mod generator;
pub mod output;
pub mod pricing;
pub mod wrap;

pub use canvas::{Canvas, FontRole};
pub use composer::{Composer, LayoutSummary};
pub use config::{HeightPolicy, PdfConfig};
pub use entry::{parse_content, DeliveryEntry};
pub use fonts::{FallbackFonts, FixedFontResolver, FontPaths, FontResolver, SystemFontResolver};
pub use generator::{generate_pdf, GeneratedReceipt, ReceiptGenerator, RenderedReceipt};
pub use output::OutputLocation;
pub use pdf_core::LineStyle;
pub use wrap::{try_wrap_text, wrap_text};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a receipt
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Could not find a usable font: {0}")]
    FontNotFound(String),

    #[error("Could not download fallback font: {0}")]
    FontDownload(String),

    #[error("Could not load {weight} font {}: {reason}", path.display())]
    FontLoad {
        weight: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Could not get home directory")]
    HomeDirUnavailable,

    #[error("Could not create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save PDF: {0}")]
    Save(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for receipt operations
pub type Result<T> = std::result::Result<T, ReceiptError>;

/// Message shown when the zone or the content is left empty
pub const EMPTY_INPUT_MESSAGE: &str = "mba fenoy tsara pr aloha (par respect)";

/// Reject empty user input before it reaches the pipeline
///
/// Both the zone and the raw content must contain something other than
/// whitespace.
pub fn validate_input(zone: &str, content: &str) -> Result<()> {
    if zone.trim().is_empty() || content.trim().is_empty() {
        return Err(ReceiptError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()));
    }
    Ok(())
}

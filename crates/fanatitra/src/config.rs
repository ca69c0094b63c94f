//! Receipt layout configuration
//!
//! All lengths are in millimetres. Every field has a default, so a JSON
//! configuration only needs to list the values it overrides.

use crate::{ReceiptError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the page height is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightPolicy {
    /// Fixed height per entry plus a base amount
    #[default]
    Estimated,
    /// Lay the receipt out once without drawing and use the final cursor
    Measured,
}

/// Layout parameters for a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub page_width: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub line_height: f64,
    pub section_spacing: f64,
    pub item_spacing: f64,
    pub note_box_height: f64,
    pub name_spacing: f64,
    pub entry_spacing: f64,
    pub item_width: f64,
    pub date_spacing: f64,
    pub phone_spacing: f64,
    pub zone_spacing: f64,
    pub address_spacing: f64,

    /// Left inset of the zone heading, also reserved on the right
    pub zone_indent: f64,
    /// Extra gap under each zone heading line
    pub zone_line_gap: f64,
    /// Extra gap under the name line and under each footer line
    pub header_gap: f64,
    /// Extra gap under each wrapped address or notes line
    pub wrapped_line_gap: f64,
    /// Offset of text following an address or phone marker
    pub marker_indent: f64,
    /// Indent of address continuation lines
    pub address_indent: f64,
    /// Width kept free on the right of wrapped addresses
    pub address_reserve: f64,
    /// Indent of notes text, also kept free on the right
    pub notes_indent: f64,
    /// Position of the note box label inside the box
    pub note_label_inset_x: f64,
    pub note_label_inset_y: f64,
    pub note_box_line_width: f64,
    pub divider_line_width: f64,

    pub logo_width: f64,
    pub logo_height: f64,
    /// Cursor advance after the logo
    pub logo_advance: f64,
    /// Optional logo image, skipped when the file does not exist
    pub logo_path: Option<PathBuf>,

    pub height_policy: HeightPolicy,
    /// Page height reserved per entry under the estimated policy
    pub entry_height: f64,
    /// Page height added once under the estimated policy
    pub base_height: f64,

    /// Output directory, `<home>/Downloads` when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_width: 78.0,
            margin_left: 4.0,
            margin_right: 4.0,
            margin_top: 4.0,
            margin_bottom: 2.0,
            line_height: 2.0,
            section_spacing: 2.0,
            item_spacing: 2.5,
            note_box_height: 8.0,
            name_spacing: 2.0,
            entry_spacing: 4.0,
            item_width: 25.0,
            date_spacing: 3.0,
            phone_spacing: 2.0,
            zone_spacing: 3.0,
            address_spacing: 1.0,

            zone_indent: 2.0,
            zone_line_gap: 1.0,
            header_gap: 2.0,
            wrapped_line_gap: 0.5,
            marker_indent: 4.0,
            address_indent: 6.0,
            address_reserve: 7.0,
            notes_indent: 12.0,
            note_label_inset_x: 1.0,
            note_label_inset_y: 2.0,
            note_box_line_width: 0.1,
            divider_line_width: 0.3,

            logo_width: 18.0,
            logo_height: 16.0,
            logo_advance: 12.0,
            logo_path: Some(PathBuf::from("assets/logo.png")),

            height_policy: HeightPolicy::Estimated,
            entry_height: 50.0,
            base_height: 30.0,

            output_dir: None,
        }
    }
}

impl PdfConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReceiptError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Check that the values describe a drawable page
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("page_width", self.page_width),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("line_height", self.line_height),
            ("item_width", self.item_width),
            ("entry_height", self.entry_height),
            ("base_height", self.base_height),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ReceiptError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(ReceiptError::Config(format!(
                "margins ({} + {}) leave no room on a {} mm page",
                self.margin_left, self.margin_right, self.page_width
            )));
        }

        Ok(())
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// X coordinate of the right margin
    pub fn right_edge(&self) -> f64 {
        self.page_width - self.margin_right
    }

    /// Page height under the estimated policy
    pub fn estimated_height(&self, entry_count: usize) -> f64 {
        entry_count as f64 * self.entry_height + self.base_height
    }
}

//! Drawing surface used by the composer

use crate::Result;
use pdf_core::{LineStyle, PdfDocument};

/// Font weights registered for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Regular,
    Bold,
}

impl FontRole {
    /// Name under which the font is registered in the document
    pub fn name(self) -> &'static str {
        match self {
            FontRole::Regular => "regular",
            FontRole::Bold => "bold",
        }
    }
}

/// Page operations needed to lay out a receipt
///
/// Coordinates are in millimetres from the top-left corner; `y` is the top
/// of the text line or image box.
pub trait Canvas {
    fn set_font(&mut self, role: FontRole, size: f32) -> Result<()>;

    /// Width of `text` under the current font
    fn text_width(&mut self, text: &str) -> Result<f64>;

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;

    fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        style: LineStyle,
    ) -> Result<()>;

    fn draw_image(&mut self, data: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<()>;
}

impl Canvas for PdfDocument {
    fn set_font(&mut self, role: FontRole, size: f32) -> Result<()> {
        PdfDocument::set_font(self, role.name(), size)?;
        Ok(())
    }

    fn text_width(&mut self, text: &str) -> Result<f64> {
        Ok(self.get_text_width(text)?)
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.insert_text(text, x, y)?;
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        style: LineStyle,
    ) -> Result<()> {
        PdfDocument::draw_line(self, from.0, from.1, to.0, to.1, width, style)?;
        Ok(())
    }

    fn draw_image(&mut self, data: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.insert_image(data, x, y, width, height)?;
        Ok(())
    }
}

/// Canvas that only measures
///
/// Text is measured against a real document, but nothing is drawn. Used to
/// find where the layout ends before the final page size is known.
pub(crate) struct MeasuringCanvas<'a> {
    inner: &'a mut PdfDocument,
}

impl<'a> MeasuringCanvas<'a> {
    pub(crate) fn new(inner: &'a mut PdfDocument) -> Self {
        Self { inner }
    }
}

impl Canvas for MeasuringCanvas<'_> {
    fn set_font(&mut self, role: FontRole, size: f32) -> Result<()> {
        Canvas::set_font(&mut *self.inner, role, size)
    }

    fn text_width(&mut self, text: &str) -> Result<f64> {
        self.inner.text_width(text)
    }

    fn draw_text(&mut self, _text: &str, _x: f64, _y: f64) -> Result<()> {
        Ok(())
    }

    fn draw_line(&mut self, _: (f64, f64), _: (f64, f64), _: f64, _: LineStyle) -> Result<()> {
        Ok(())
    }

    fn draw_image(&mut self, _: &[u8], _: f64, _: f64, _: f64, _: f64) -> Result<()> {
        Ok(())
    }
}

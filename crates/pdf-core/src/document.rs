//! PDF Document wrapper

use crate::graphics::{generate_line_operators, LineStyle};
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{FontData, PdfError, Result, Unit};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A font registered in the document together with its resource name
#[derive(Debug, Clone)]
struct RegisteredFont {
    /// Resource name used in content streams (e.g., "F1")
    resource_name: String,
    data: FontData,
}

/// An image registered in the document
#[derive(Debug, Clone)]
struct RegisteredImage {
    /// Resource name used in content streams (e.g., "Im1")
    resource_name: String,
    xobject: ImageXObject,
}

/// Single-page PDF document providing positioned drawing operations
///
/// All coordinates are expressed in the document [`Unit`], measured from
/// the top-left corner of the page. Font sizes are in points.
/// Nothing is written until [`PdfDocument::save`] or
/// [`PdfDocument::to_bytes`] serializes the accumulated page content.
pub struct PdfDocument {
    /// Page width in document units
    width: f64,
    /// Page height in document units
    height: f64,
    /// Physical unit for coordinates
    unit: Unit,
    /// Loaded fonts by name
    fonts: HashMap<String, RegisteredFont>,
    /// Registration order of fonts (for deterministic output)
    font_order: Vec<String>,
    /// Current font name
    current_font: Option<String>,
    /// Current font size
    current_font_size: f32,
    /// Embedded images (data hash -> image)
    images: HashMap<u64, RegisteredImage>,
    /// Registration order of images
    image_order: Vec<u64>,
    /// Buffered content operators for the page
    content: Vec<u8>,
}

impl PdfDocument {
    /// Create a document with a single blank page
    ///
    /// # Arguments
    /// * `width` - Page width in `unit`
    /// * `height` - Page height in `unit`
    /// * `unit` - Physical unit for the page size and every coordinate
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::new(78.0, 130.0, Unit::Mm)?;
    /// ```
    pub fn new(width: f64, height: f64, unit: Unit) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(PdfError::InvalidPageSize(width, height));
        }

        Ok(Self {
            width,
            height,
            unit,
            fonts: HashMap::new(),
            font_order: Vec::new(),
            current_font: None,
            current_font_size: 12.0,
            images: HashMap::new(),
            image_order: Vec::new(),
            content: Vec::new(),
        })
    }

    /// Page width in document units
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in document units
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Coordinate unit of the document
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Add a TrueType font to the document
    ///
    /// # Arguments
    /// * `name` - Font identifier (used in set_font)
    /// * `ttf_data` - TrueType font file bytes
    pub fn add_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }

        let data = FontData::from_ttf(name, ttf_data)?;
        let resource_name = format!("F{}", self.font_order.len() + 1);

        self.fonts.insert(
            name.to_string(),
            RegisteredFont {
                resource_name,
                data,
            },
        );
        self.font_order.push(name.to_string());

        Ok(())
    }

    /// Set the current font and size
    ///
    /// # Arguments
    /// * `name` - Font identifier given to `add_font`
    /// * `size` - Font size in points
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }

        self.current_font = Some(name.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Currently selected font
    fn current_font(&self) -> Result<&RegisteredFont> {
        let name = self
            .current_font
            .as_ref()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;

        self.fonts
            .get(name)
            .ok_or_else(|| PdfError::FontNotFound(name.clone()))
    }

    /// Get current font's text width for a string
    ///
    /// # Returns
    /// Width in document units
    ///
    /// # Example
    /// ```ignore
    /// doc.set_font("regular", 9.0)?;
    /// let width = doc.get_text_width("15000 Ar")?;
    /// ```
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_font()?;
        let points = font.data.text_width_points(text, self.current_font_size) as f64;

        Ok(self.unit.from_points(points))
    }

    /// Insert text with its line box starting at a position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `x` - Left edge in document units
    /// * `y` - Top of the line in document units (from top of page)
    pub fn insert_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let font_size = self.current_font_size;
        let page_height_pt = self.unit.to_points(self.height);
        let name = self
            .current_font
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;
        let font = self
            .fonts
            .get_mut(&name)
            .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;

        let baseline = page_height_pt
            - self.unit.to_points(y)
            - font.data.ascent_points(font_size) as f64;
        let ctx = TextRenderContext {
            font_name: font.resource_name.clone(),
            font_size,
        };
        let text_hex = font.data.encode(text);

        let operators =
            generate_text_operators(&text_hex, self.unit.to_points(x), baseline, &ctx);
        self.content.extend_from_slice(&operators);

        Ok(())
    }

    /// Stroke a straight line between two points
    ///
    /// # Arguments
    /// * `x1`, `y1` - Start point in document units (from top-left)
    /// * `x2`, `y2` - End point in document units (from top-left)
    /// * `width` - Line width in document units
    /// * `style` - Solid or dashed stroke
    pub fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        style: LineStyle,
    ) -> Result<()> {
        let page_height_pt = self.unit.to_points(self.height);
        let operators = generate_line_operators(
            self.unit.to_points(x1),
            page_height_pt - self.unit.to_points(y1),
            self.unit.to_points(x2),
            page_height_pt - self.unit.to_points(y2),
            self.unit.to_points(width),
            style,
        );
        self.content.extend_from_slice(&operators);

        Ok(())
    }

    /// Insert an image stretched into a box
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    /// * `x` - Left edge in document units
    /// * `y` - Top edge in document units (from top of page)
    /// * `width` - Image width in document units
    /// * `height` - Image height in document units
    pub fn insert_image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let resource_name = self.get_or_create_image_ref(data)?;

        let page_height_pt = self.unit.to_points(self.height);
        let operators = generate_image_operators(
            &resource_name,
            self.unit.to_points(x),
            page_height_pt - self.unit.to_points(y + height),
            self.unit.to_points(width),
            self.unit.to_points(height),
        );
        self.content.extend_from_slice(&operators);

        Ok(())
    }

    /// Get or create an image resource, deduplicated by content hash
    fn get_or_create_image_ref(&mut self, data: &[u8]) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(image) = self.images.get(&data_hash) {
            return Ok(image.resource_name.clone());
        }

        let xobject = ImageXObject::from_bytes(data)?;
        let resource_name = format!("Im{}", self.image_order.len() + 1);
        self.images.insert(
            data_hash,
            RegisteredImage {
                resource_name: resource_name.clone(),
                xobject,
            },
        );
        self.image_order.push(data_hash);

        Ok(resource_name)
    }

    /// Save the document to a file
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the document to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build_document()?;

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Assemble the lopdf object graph for the current page content
    fn build_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_resources = Dictionary::new();
        for name in &self.font_order {
            let font = self
                .fonts
                .get(name)
                .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;
            // Unused fonts are left out of the file
            if !font.data.is_used() {
                continue;
            }
            let font_id = font.data.embed(&mut doc)?;
            font_resources.set(font.resource_name.as_bytes(), Object::Reference(font_id));
        }

        let mut image_resources = Dictionary::new();
        for hash in &self.image_order {
            if let Some(image) = self.images.get(hash) {
                let image_id = doc.add_object(image.xobject.to_pdf_stream());
                image_resources.set(image.resource_name.as_bytes(), Object::Reference(image_id));
            }
        }

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_resources));
        if !image_resources.is_empty() {
            resources.set("XObject", Object::Dictionary(image_resources));
        }

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &self.content)?;
        let compressed = encoder.finish()?;
        let contents_id = doc.add_object(
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed)
                .with_compression(false),
        );

        let media_box = vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(self.unit.to_points(self.width) as f32),
            Object::Real(self.unit.to_points(self.height) as f32),
        ];

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Resources" => resources,
            "Contents" => contents_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_page() {
        assert!(matches!(
            PdfDocument::new(0.0, 100.0, Unit::Mm),
            Err(PdfError::InvalidPageSize(_, _))
        ));
        assert!(PdfDocument::new(78.0, f64::NAN, Unit::Mm).is_err());
    }

    #[test]
    fn test_page_size_is_kept_in_units() {
        let doc = PdfDocument::new(78.0, 130.0, Unit::Mm).unwrap();

        assert_eq!(doc.width(), 78.0);
        assert_eq!(doc.height(), 130.0);
        assert_eq!(doc.unit(), Unit::Mm);
    }

    #[test]
    fn test_text_requires_font() {
        let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();

        assert!(matches!(
            doc.insert_text("Hello", 4.0, 4.0),
            Err(PdfError::FontNotFound(_))
        ));
        assert!(doc.get_text_width("Hello").is_err());
        assert!(doc.set_font("regular", 9.0).is_err());
    }

    #[test]
    fn test_empty_text_is_noop() {
        let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
        assert!(doc.insert_text("", 4.0, 4.0).is_ok());
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_line_is_flipped_to_pdf_coordinates() {
        let mut doc = PdfDocument::new(100.0, 200.0, Unit::Pt).unwrap();
        doc.draw_line(10.0, 50.0, 90.0, 50.0, 1.0, LineStyle::Dashed)
            .unwrap();

        let ops = String::from_utf8(doc.content.clone()).unwrap();
        assert!(ops.contains("10 150 m"));
        assert!(ops.contains("90 150 l"));
        assert!(ops.contains("[3 2] 0 d"));
    }

    #[test]
    fn test_blank_document_serializes() {
        let doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
        let bytes = doc.to_bytes().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}

//! Raster images as PDF image XObjects
//!
//! JPEG data is embedded untouched behind `DCTDecode`. Everything else the
//! `image` crate can read is decoded, flattened onto white and stored as
//! Flate-compressed 8-bit samples.

use crate::text::fmt_num;
use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat};
use lopdf::{dictionary, Stream};
use std::io::{Cursor, Write};

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
}

impl ColorSpace {
    fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
        }
    }

    fn channels(self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
        }
    }
}

/// Sample data together with the filter that decodes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
    /// Baseline JPEG file bytes
    Dct(Vec<u8>),
    /// Zlib-compressed samples
    Flate(Vec<u8>),
}

impl ImageData {
    fn filter(&self) -> &'static str {
        match self {
            ImageData::Dct(_) => "DCTDecode",
            ImageData::Flate(_) => "FlateDecode",
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            ImageData::Dct(bytes) | ImageData::Flate(bytes) => bytes,
        }
    }
}

/// Image ready to be written as an XObject stream
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub data: ImageData,
}

impl ImageXObject {
    /// Build an XObject from encoded image bytes, detecting the format
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match image::guess_format(data)? {
            ImageFormat::Jpeg => Self::passthrough_jpeg(data),
            format => Self::flatten(image::load_from_memory_with_format(data, format)?),
        }
    }

    /// Read the JPEG header only and keep the compressed bytes
    fn passthrough_jpeg(data: &[u8]) -> Result<Self> {
        let decoder = JpegDecoder::new(Cursor::new(data))?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 | ColorType::L16 => ColorSpace::Gray,
            _ => ColorSpace::Rgb,
        };

        Ok(Self {
            width,
            height,
            color_space,
            data: ImageData::Dct(data.to_vec()),
        })
    }

    /// Decode to 8-bit samples with any alpha composited onto white
    fn flatten(image: DynamicImage) -> Result<Self> {
        let color = image.color();
        let color_space = if color.has_color() {
            ColorSpace::Rgb
        } else {
            ColorSpace::Gray
        };
        let channels = color_space.channels();

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut samples = Vec::with_capacity(width as usize * height as usize * channels);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = if color.has_alpha() { a } else { u8::MAX };
            match color_space {
                ColorSpace::Gray => samples.push(over_white(r, alpha)),
                ColorSpace::Rgb => {
                    samples.extend([r, g, b].map(|channel| over_white(channel, alpha)))
                }
            }
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&samples)?;

        Ok(Self {
            width,
            height,
            color_space,
            data: ImageData::Flate(encoder.finish()?),
        })
    }

    pub fn to_pdf_stream(&self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color_space.pdf_name(),
            "BitsPerComponent" => 8,
            "Filter" => self.data.filter(),
        };
        Stream::new(dict, self.data.bytes().to_vec()).with_compression(false)
    }
}

/// Composite one channel value over a white background
fn over_white(value: u8, alpha: u8) -> u8 {
    let value = value as u16;
    let alpha = alpha as u16;
    ((value * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}

/// Operators painting `image_name` into a box
///
/// `x`/`y` locate the bottom-left corner, in points and PDF coordinates.
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{image_name} Do\nQ\n",
        fmt_num(width),
        fmt_num(height),
        fmt_num(x),
        fmt_num(y)
    )
    .into_bytes()
}

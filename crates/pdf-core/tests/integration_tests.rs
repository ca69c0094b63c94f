//! Integration tests for pdf-core
//!
//! These tests exercise real font embedding and serialization. They need a
//! TrueType font from the host and are skipped when none is installed.

use lopdf::Document;
use pdf_core::{LineStyle, PdfDocument, PdfError, Unit};
use pretty_assertions::assert_eq;
use std::path::Path;

const CANDIDATE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Read the first TrueType font available on this machine
fn get_test_font_data() -> Option<Vec<u8>> {
    CANDIDATE_FONTS
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
        .and_then(|path| std::fs::read(path).ok())
}

/// Create a minimal PNG image for testing
fn create_test_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    bytes
}

/// Number of embedded composite fonts in a document
fn count_type0_fonts(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_dict().ok())
        .filter(|dict| {
            dict.get(b"Subtype")
                .and_then(|subtype| subtype.as_name())
                .map(|name| name == b"Type0")
                .unwrap_or(false)
        })
        .count()
}

#[test]
fn test_duplicate_font_rejected() {
    let Some(font) = get_test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
    doc.add_font("regular", &font).unwrap();

    assert!(matches!(
        doc.add_font("regular", &font),
        Err(PdfError::FontAlreadyExists(_))
    ));
}

#[test]
fn test_invalid_font_rejected() {
    let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();

    assert!(matches!(
        doc.add_font("regular", b"definitely not a font"),
        Err(PdfError::FontParseError(_))
    ));
}

#[test]
fn test_text_width_scales_with_size() {
    let Some(font) = get_test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
    doc.add_font("regular", &font).unwrap();

    doc.set_font("regular", 8.0).unwrap();
    let small = doc.get_text_width("15000 Ar").unwrap();
    doc.set_font("regular", 16.0).unwrap();
    let large = doc.get_text_width("15000 Ar").unwrap();

    assert!(small > 0.0);
    assert!((large - 2.0 * small).abs() < 1e-6);
    assert_eq!(doc.get_text_width("").unwrap(), 0.0);
}

#[test]
fn test_mm_width_matches_points() {
    let Some(font) = get_test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let mut mm_doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
    mm_doc.add_font("regular", &font).unwrap();
    mm_doc.set_font("regular", 10.0).unwrap();

    let mut pt_doc = PdfDocument::new(221.0, 227.0, Unit::Pt).unwrap();
    pt_doc.add_font("regular", &font).unwrap();
    pt_doc.set_font("regular", 10.0).unwrap();

    let mm = mm_doc.get_text_width("Kimbaso").unwrap();
    let pt = pt_doc.get_text_width("Kimbaso").unwrap();
    assert!((Unit::Mm.to_points(mm) - pt).abs() < 1e-6);
}

#[test]
fn test_full_page_roundtrip() {
    let Some(font) = get_test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let mut doc = PdfDocument::new(78.0, 130.0, Unit::Mm).unwrap();
    doc.add_font("regular", &font).unwrap();
    doc.add_font("bold", &font).unwrap();

    doc.set_font("bold", 12.0).unwrap();
    doc.insert_text("Analakely", 6.0, 4.0).unwrap();
    doc.set_font("regular", 8.0).unwrap();
    doc.insert_text("ID: 42", 4.0, 12.0).unwrap();
    doc.draw_line(4.0, 20.0, 74.0, 20.0, 0.3, LineStyle::Solid)
        .unwrap();
    doc.draw_line(4.0, 24.0, 74.0, 24.0, 0.1, LineStyle::Dashed)
        .unwrap();
    doc.insert_image(&create_test_png(), 29.0, 30.0, 18.0, 16.0)
        .unwrap();

    let bytes = doc.to_bytes().unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();

    let pages = reloaded.get_pages();
    assert_eq!(pages.len(), 1);

    let page_id = pages[&1];
    assert_eq!(count_type0_fonts(&reloaded), 2);

    let content = reloaded.get_page_content(page_id).unwrap();
    let content = String::from_utf8_lossy(&content);
    assert!(content.contains("/F2 12 Tf"));
    assert!(content.contains("/F1 8 Tf"));
    assert!(content.contains("/Im1 Do"));
    assert_eq!(content.matches(" l\nS").count(), 2);
}

#[test]
fn test_unused_font_not_embedded() {
    let Some(font) = get_test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let mut doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
    doc.add_font("regular", &font).unwrap();
    doc.add_font("bold", &font).unwrap();
    doc.set_font("regular", 8.0).unwrap();
    doc.insert_text("only regular", 4.0, 4.0).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();

    assert_eq!(count_type0_fonts(&reloaded), 1);
}

#[test]
fn test_save_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.pdf");

    let doc = PdfDocument::new(78.0, 80.0, Unit::Mm).unwrap();
    doc.save(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

//! End-to-end receipt generation
//!
//! These tests embed a real TrueType font and are skipped when the host has
//! none of the candidates installed.

use chrono::NaiveDate;
use fanatitra::{
    parse_content, FixedFontResolver, FontPaths, HeightPolicy, OutputLocation, PdfConfig,
    ReceiptGenerator,
};
use lopdf::Document;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

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

const CONTENT: &str = "\
12\tRakoto Jean\tLot II A 45 Analakely\t034 12 345 67\t10+abc+5\tSonia mialoha
\tRabe\tAmbohijatovo\t\t0

not\ta\trecord
13\tVola\tFaravohitra ambony akaikin ny fiangonana\t032 00 000 00\t2.5+7+12+1
";

fn test_font() -> Option<PathBuf> {
    CANDIDATE_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn config() -> PdfConfig {
    PdfConfig {
        logo_path: None,
        ..PdfConfig::default()
    }
}

fn page_height_points(bytes: &[u8]) -> f64 {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page = doc.get_dictionary(pages[&1]).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let value = &media_box[3];
    value
        .as_float()
        .map(f64::from)
        .or_else(|_| value.as_i64().map(|v| v as f64))
        .unwrap()
}

fn mm(points: f64) -> f64 {
    points / 72.0 * 25.4
}

#[test]
fn test_generate_writes_named_file() {
    let Some(font) = test_font() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let config = config();
    let fonts = FixedFontResolver::new(FontPaths::new(&font, &font));

    let entries = parse_content(CONTENT);
    let receipt = ReceiptGenerator::new(&config, &fonts)
        .with_output(OutputLocation::at(dir.path()))
        .with_date(date())
        .generate("North", &entries)
        .unwrap();

    assert_eq!(receipt.entry_blocks, 3);
    assert_eq!(receipt.page_height, 180.0);
    assert_eq!(
        receipt.path,
        dir.path().join("fanatitra_North_2026-10-19.pdf")
    );

    let written = std::fs::read(&receipt.path).unwrap();
    assert_eq!(written, receipt.bytes);
    assert!(written.starts_with(b"%PDF"));

    let height = mm(page_height_points(&written));
    assert!((height - 180.0).abs() < 0.01);
}

#[test]
fn test_generate_creates_output_dir() {
    let Some(font) = test_font() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("Downloads");
    let config = PdfConfig {
        output_dir: Some(target.clone()),
        ..config()
    };
    let fonts = FixedFontResolver::new(FontPaths::new(&font, &font));

    let receipt = ReceiptGenerator::new(&config, &fonts)
        .with_date(date())
        .generate("Zone a/b", &parse_content(CONTENT))
        .unwrap();

    assert!(target.is_dir());
    assert_eq!(
        receipt.path.file_name().unwrap(),
        "fanatitra_Zone a_b_2026-10-19.pdf"
    );
}

#[test]
fn test_empty_entry_list_still_renders() {
    let Some(font) = test_font() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let config = config();
    let fonts = FixedFontResolver::new(FontPaths::new(&font, &font));

    let receipt = ReceiptGenerator::new(&config, &fonts)
        .with_date(date())
        .render("North", &[])
        .unwrap();

    assert_eq!(receipt.entry_blocks, 0);
    assert_eq!(receipt.page_height, 30.0);
    assert!(Document::load_mem(&receipt.bytes).is_ok());
}

#[test]
fn test_measured_height_fits_content() {
    let Some(font) = test_font() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let config = PdfConfig {
        height_policy: HeightPolicy::Measured,
        ..config()
    };
    let fonts = FixedFontResolver::new(FontPaths::new(&font, &font));
    let entries = parse_content(CONTENT);

    let receipt = ReceiptGenerator::new(&config, &fonts)
        .with_date(date())
        .render("North", &entries)
        .unwrap();

    assert!(receipt.page_height > 0.0);
    assert!(receipt.page_height < config.estimated_height(entries.len()));
    let height = mm(page_height_points(&receipt.bytes));
    assert!((height - receipt.page_height).abs() < 0.01);
}

#[test]
fn test_logo_is_embedded_when_present() {
    let Some(font) = test_font() else {
        eprintln!("no system font available, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    write_png(&logo);

    let config = PdfConfig {
        logo_path: Some(logo),
        ..PdfConfig::default()
    };
    let fonts = FixedFontResolver::new(FontPaths::new(&font, &font));

    let receipt = ReceiptGenerator::new(&config, &fonts)
        .with_date(date())
        .render("North", &parse_content(CONTENT))
        .unwrap();

    let doc = Document::load_mem(&receipt.bytes).unwrap();
    let page_id = doc.get_pages()[&1];
    let content = doc.get_page_content(page_id).unwrap();
    assert!(String::from_utf8_lossy(&content).contains("/Im1 Do"));
}

/// Write a small opaque PNG
fn write_png(path: &Path) {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([20, 120, 60]));
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

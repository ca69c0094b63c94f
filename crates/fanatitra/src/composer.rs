//! Receipt layout
//!
//! The composer walks the page from top to bottom, advancing a vertical
//! cursor after every element. It draws through the [`Canvas`] trait so the
//! same layout drives the PDF output, the measuring pass and tests.

use crate::canvas::{Canvas, FontRole};
use crate::config::PdfConfig;
use crate::entry::DeliveryEntry;
use crate::pricing::{self, Item};
use crate::wrap::try_wrap_text;
use crate::Result;
use chrono::NaiveDate;
use pdf_core::{LineStyle, Unit};

const ID_PLACEHOLDER: &str = "ID: -";
const ADDRESS_MARKER: &str = ">";
const PHONE_MARKER: &str = "#";
const MISSING_PHONE: &str = "Tsisy lty a! Tsisy";
const ITEMS_LABEL: &str = "Entam-be:";
const GIFT_LABEL: &str = "• Kadoa";
const ITEM_BULLET: &str = "•";
const NOTES_LABEL: &str = "Notes:";
const DELIVERER_LABEL: &str = "Watawata:";
const CURRENCY: &str = "Ar";
const QUOTE: &str = "\"Taloha sarotra nirahana, ankehitriny lasa livreur.🥲\"";
const SLOGAN: &str = "KIMBASÔ !";
const DATE_FORMAT: &str = "%d/%m/%Y";

const ZONE_SIZE: f32 = 12.0;
const NAME_SIZE: f32 = 9.0;
const ID_SIZE: f32 = 7.0;
const BODY_SIZE: f32 = 8.0;
const QUOTE_SIZE: f32 = 10.0;
const SLOGAN_SIZE: f32 = 11.0;

/// Items per row in the item grid
const ITEMS_PER_ROW: usize = 3;

/// Result of laying out a receipt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSummary {
    /// Number of entry blocks drawn
    pub entry_blocks: usize,
    /// Cursor position below the last footer line, in millimetres
    pub end_y: f64,
}

/// Lays out a zone heading, one block per entry and a dated footer
pub struct Composer<'a> {
    config: &'a PdfConfig,
    logo: Option<&'a [u8]>,
}

impl<'a> Composer<'a> {
    pub fn new(config: &'a PdfConfig) -> Self {
        Self { config, logo: None }
    }

    /// Draw an image centred above the zone heading
    pub fn with_logo(mut self, logo: &'a [u8]) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Lay the receipt out on `canvas`
    ///
    /// Fonts named by [`FontRole`] must already be usable on the canvas.
    pub fn compose<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        zone: &str,
        entries: &[DeliveryEntry],
        date: NaiveDate,
    ) -> Result<LayoutSummary> {
        let mut layout = Layout {
            canvas,
            config: self.config,
            y: self.config.margin_top,
        };

        if let Some(logo) = self.logo {
            layout.logo(logo);
        }

        layout.zone_heading(zone)?;

        for (index, entry) in entries.iter().enumerate() {
            layout.entry_block(entry)?;
            if index + 1 < entries.len() {
                layout.divider()?;
            }
        }

        layout.footer(date)?;

        Ok(LayoutSummary {
            entry_blocks: entries.len(),
            end_y: layout.y,
        })
    }
}

/// Canvas plus the running vertical cursor
struct Layout<'c, C: ?Sized> {
    canvas: &'c mut C,
    config: &'c PdfConfig,
    y: f64,
}

impl<C: Canvas + ?Sized> Layout<'_, C> {
    fn wrap(&mut self, text: &str, max_width: f64) -> Result<Vec<String>> {
        let canvas = &mut *self.canvas;
        try_wrap_text(text, max_width, |s| canvas.text_width(s))
    }

    fn logo(&mut self, data: &[u8]) {
        let cfg = self.config;
        let x = (cfg.page_width - cfg.logo_width) / 2.0;

        match self
            .canvas
            .draw_image(data, x, self.y, cfg.logo_width, cfg.logo_height)
        {
            Ok(()) => self.y += cfg.logo_advance,
            Err(err) => log::warn!("logo not drawn: {err}"),
        }
    }

    fn zone_heading(&mut self, zone: &str) -> Result<()> {
        let cfg = self.config;
        self.canvas.set_font(FontRole::Bold, ZONE_SIZE)?;

        let max_width = cfg.content_width() - 2.0 * cfg.zone_indent;
        for line in self.wrap(zone, max_width)? {
            self.canvas
                .draw_text(&line, cfg.margin_left + cfg.zone_indent, self.y)?;
            self.y += cfg.line_height + cfg.zone_line_gap;
        }

        self.y += cfg.zone_spacing;
        Ok(())
    }

    fn entry_block(&mut self, entry: &DeliveryEntry) -> Result<()> {
        let cfg = self.config;
        let left = cfg.margin_left;

        // name, with the total flush right on the same line
        self.canvas.set_font(FontRole::Bold, NAME_SIZE)?;
        self.canvas.draw_text(&entry.name, left, self.y)?;
        let total = format!("{} {CURRENCY}", pricing::format_amount(entry.total()));
        let total_width = self.canvas.text_width(&total)?;
        self.canvas
            .draw_text(&total, cfg.right_edge() - total_width, self.y)?;
        self.y += cfg.line_height + cfg.header_gap;

        self.canvas.set_font(FontRole::Regular, ID_SIZE)?;
        let id = if entry.id.is_empty() {
            ID_PLACEHOLDER.to_string()
        } else {
            format!("ID: {}", entry.id)
        };
        self.canvas.draw_text(&id, left, self.y)?;
        self.y += cfg.line_height + cfg.name_spacing;

        self.canvas.set_font(FontRole::Regular, BODY_SIZE)?;
        self.address(&entry.address)?;
        self.phone(&entry.phone)?;
        self.items(&entry.items)?;

        if !entry.notes.is_empty() {
            self.notes(&entry.notes)?;
        }

        self.note_box()
    }

    fn address(&mut self, address: &str) -> Result<()> {
        let cfg = self.config;
        let left = cfg.margin_left;

        let lines = self.wrap(address, cfg.content_width() - cfg.address_reserve)?;
        for (index, line) in lines.iter().enumerate() {
            if index == 0 {
                self.canvas.draw_text(ADDRESS_MARKER, left, self.y)?;
                self.canvas
                    .draw_text(line, left + cfg.marker_indent, self.y)?;
            } else {
                self.canvas
                    .draw_text(line, left + cfg.address_indent, self.y)?;
            }
            self.y += cfg.line_height + cfg.wrapped_line_gap;
        }

        self.y += cfg.address_spacing;
        Ok(())
    }

    fn phone(&mut self, phone: &str) -> Result<()> {
        let cfg = self.config;
        let phone = if phone.is_empty() { MISSING_PHONE } else { phone };

        self.canvas.draw_text(PHONE_MARKER, cfg.margin_left, self.y)?;
        self.canvas
            .draw_text(phone, cfg.margin_left + cfg.marker_indent, self.y)?;
        self.y += cfg.line_height + cfg.phone_spacing;
        Ok(())
    }

    fn items(&mut self, items: &str) -> Result<()> {
        let cfg = self.config;

        self.canvas.draw_text(ITEMS_LABEL, cfg.margin_left, self.y)?;
        self.y += cfg.line_height + cfg.item_spacing;

        for row in pricing::parse_items(items).chunks(ITEMS_PER_ROW) {
            for (column, item) in row.iter().enumerate() {
                // unparseable tokens leave their cell empty
                let label = match item {
                    Some(Item::Gift) => GIFT_LABEL.to_string(),
                    Some(Item::Priced(price)) => {
                        format!("{ITEM_BULLET} {}", pricing::format_thousands(*price))
                    }
                    None => continue,
                };
                let x = cfg.margin_left + cfg.item_width * column as f64;
                self.canvas.draw_text(&label, x, self.y)?;
            }
            self.y += cfg.line_height + cfg.item_spacing;
        }

        Ok(())
    }

    fn notes(&mut self, notes: &str) -> Result<()> {
        let cfg = self.config;
        self.y += cfg.section_spacing;

        self.canvas.set_font(FontRole::Bold, BODY_SIZE)?;
        self.canvas.draw_text(NOTES_LABEL, cfg.margin_left, self.y)?;

        self.canvas.set_font(FontRole::Regular, BODY_SIZE)?;
        let lines = self.wrap(notes, cfg.content_width() - cfg.notes_indent)?;
        for line in lines {
            self.canvas
                .draw_text(&line, cfg.margin_left + cfg.notes_indent, self.y)?;
            self.y += cfg.line_height + cfg.wrapped_line_gap;
        }

        Ok(())
    }

    /// Dashed box left blank for the deliverer
    fn note_box(&mut self) -> Result<()> {
        let cfg = self.config;
        self.y += cfg.section_spacing;

        let (left, right) = (cfg.margin_left, cfg.right_edge());
        let (top, bottom) = (self.y, self.y + cfg.note_box_height);
        let width = cfg.note_box_line_width;

        self.canvas
            .draw_line((left, top), (right, top), width, LineStyle::Dashed)?;
        self.canvas
            .draw_line((right, top), (right, bottom), width, LineStyle::Dashed)?;
        self.canvas
            .draw_line((right, bottom), (left, bottom), width, LineStyle::Dashed)?;
        self.canvas
            .draw_line((left, bottom), (left, top), width, LineStyle::Dashed)?;

        self.canvas.set_font(FontRole::Bold, BODY_SIZE)?;
        self.canvas.draw_text(
            DELIVERER_LABEL,
            left + cfg.note_label_inset_x,
            top + cfg.note_label_inset_y,
        )?;

        self.y = bottom;
        Ok(())
    }

    fn divider(&mut self) -> Result<()> {
        let cfg = self.config;
        let half = cfg.entry_spacing / 2.0;

        self.y += half;
        self.canvas.draw_line(
            (cfg.margin_left, self.y),
            (cfg.right_edge(), self.y),
            cfg.divider_line_width,
            LineStyle::Solid,
        )?;
        self.y += half;
        Ok(())
    }

    fn footer(&mut self, date: NaiveDate) -> Result<()> {
        let cfg = self.config;
        self.y += cfg.date_spacing;

        let date = date.format(DATE_FORMAT).to_string();
        self.centered(&date, FontRole::Regular, BODY_SIZE)?;
        self.y += cfg.line_height + cfg.header_gap;

        self.centered(QUOTE, FontRole::Bold, QUOTE_SIZE)?;
        self.y += cfg.line_height + cfg.header_gap;

        self.centered(SLOGAN, FontRole::Regular, SLOGAN_SIZE)?;
        self.y += Unit::Mm.from_points(SLOGAN_SIZE as f64);

        Ok(())
    }

    fn centered(&mut self, text: &str, role: FontRole, size: f32) -> Result<()> {
        self.canvas.set_font(role, size)?;
        let width = self.canvas.text_width(text)?;
        self.canvas
            .draw_text(text, (self.config.page_width - width) / 2.0, self.y)
    }
}

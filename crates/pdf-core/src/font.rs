//! TrueType fonts embedded as Identity-H composite fonts
//!
//! Text is written as 2-byte glyph ids. Every glyph drawn with a font is
//! recorded so that the `/W` widths and the ToUnicode map only list what the
//! page actually uses. The font program itself is embedded whole.

use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use ttf_parser::Face;

/// Glyph-space units of the PDF font dictionaries
const PDF_UNITS: f32 = 1000.0;

/// bfchar blocks may hold at most this many mappings
const BFCHAR_LIMIT: usize = 100;

/// Glyph id and horizontal advance in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    pub advance: u16,
}

/// A parsed TrueType font and the glyphs drawn with it
#[derive(Debug, Clone)]
pub struct FontData {
    name: String,
    ttf_data: Vec<u8>,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    used: BTreeMap<char, Glyph>,
}

impl FontData {
    /// Parse TrueType bytes
    ///
    /// # Arguments
    /// * `name` - Identifier used as the PDF base font name
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let face = Face::parse(ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{name}: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data: ttf_data.to_vec(),
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            used: BTreeMap::new(),
        })
    }

    /// Whether any glyph has been drawn with this font
    pub fn is_used(&self) -> bool {
        !self.used.is_empty()
    }

    /// Look up the glyph for every character, `.notdef` when missing
    fn glyphs(&self, text: &str) -> Vec<(char, Glyph)> {
        let face = Face::parse(&self.ttf_data, 0).ok();
        text.chars().map(|c| (c, lookup(face.as_ref(), c))).collect()
    }

    /// Width of `text` in points at `font_size`
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = self
            .glyphs(text)
            .iter()
            .map(|(_, glyph)| glyph.advance as u32)
            .sum();
        units as f32 / self.units_per_em as f32 * font_size
    }

    /// Distance from the top of a line to its baseline, in points
    pub fn ascent_points(&self, font_size: f32) -> f32 {
        self.ascender as f32 / self.units_per_em as f32 * font_size
    }

    /// Encode `text` as a hex string of glyph ids for `Tj`, recording the
    /// glyphs as used
    pub fn encode(&mut self, text: &str) -> String {
        let glyphs = self.glyphs(text);

        let mut hex = String::with_capacity(glyphs.len() * 4 + 2);
        hex.push('<');
        for (c, glyph) in glyphs {
            let _ = write!(hex, "{:04X}", glyph.id);
            self.used.insert(c, glyph);
        }
        hex.push('>');
        hex
    }

    fn to_pdf_units(&self, value: i32) -> i64 {
        (value as f32 / self.units_per_em as f32 * PDF_UNITS) as i64
    }

    /// Add the font objects to `doc` and return the Type0 font id
    pub fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        let base_font = Object::Name(self.name.clone().into_bytes());

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.ttf_data)?;
        let font_file_id = doc.add_object(
            Stream::new(
                dictionary! {
                    "Length1" => self.ttf_data.len() as i64,
                    "Filter" => "FlateDecode",
                },
                encoder.finish()?,
            )
            .with_compression(false),
        );

        let ascent = self.to_pdf_units(self.ascender as i32);
        let descent = self.to_pdf_units(self.descender as i32);
        let font_bbox = vec![
            Object::Integer(0),
            Object::Integer(descent),
            Object::Integer(1000),
            Object::Integer(ascent),
        ];
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.clone(),
            // symbolic
            "Flags" => 4,
            "FontBBox" => font_bbox,
            "ItalicAngle" => 0,
            "Ascent" => ascent,
            "Descent" => descent,
            "CapHeight" => ascent,
            "StemV" => 80,
            "FontFile2" => font_file_id,
        });

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => base_font.clone(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "CIDToGIDMap" => "Identity",
            "W" => self.widths(),
            "DW" => 1000,
            "FontDescriptor" => descriptor_id,
        });

        let to_unicode_id = doc.add_object(Stream::new(
            Dictionary::new(),
            self.to_unicode_cmap().into_bytes(),
        ));

        Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => base_font,
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        }))
    }

    /// Used glyphs by id, each id once
    fn used_by_id(&self) -> BTreeMap<u16, (char, u16)> {
        let mut by_id = BTreeMap::new();
        for (&c, glyph) in &self.used {
            by_id.entry(glyph.id).or_insert((c, glyph.advance));
        }
        by_id
    }

    /// `/W` array with consecutive glyph ids grouped into one run
    fn widths(&self) -> Vec<Object> {
        let mut runs: Vec<(u16, Vec<Object>)> = Vec::new();

        for (id, (_, advance)) in self.used_by_id() {
            let width = Object::Integer(self.to_pdf_units(advance as i32));
            match runs.last_mut() {
                Some((start, widths)) if *start as usize + widths.len() == id as usize => {
                    widths.push(width)
                }
                _ => runs.push((id, vec![width])),
            }
        }

        runs.into_iter()
            .flat_map(|(start, widths)| [Object::Integer(start as i64), Object::Array(widths)])
            .collect()
    }

    /// ToUnicode CMap mapping each used glyph id back to its character
    fn to_unicode_cmap(&self) -> String {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mappings: Vec<(u16, char)> = self
            .used_by_id()
            .into_iter()
            .map(|(id, (c, _))| (id, c))
            .collect();

        for block in mappings.chunks(BFCHAR_LIMIT) {
            let _ = writeln!(cmap, "{} beginbfchar", block.len());
            for (id, c) in block {
                let _ = writeln!(cmap, "<{id:04X}> <{}>", utf16_hex(*c));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap
    }
}

fn lookup(face: Option<&Face<'_>>, c: char) -> Glyph {
    let Some(face) = face else {
        return Glyph { id: 0, advance: 0 };
    };

    let id = face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0));
    Glyph {
        id: id.0,
        advance: face.glyph_hor_advance(id).unwrap_or(0),
    }
}

/// UTF-16BE hex of a character, surrogate pair for astral code points
fn utf16_hex(c: char) -> String {
    let mut buf = [0u16; 2];
    c.encode_utf16(&mut buf)
        .iter()
        .map(|unit| format!("{unit:04X}"))
        .collect()
}

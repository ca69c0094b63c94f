//! Text showing operators

/// Font resource and size a run of text is shown with
pub struct TextRenderContext {
    /// Resource name in the page's `/Font` dictionary, e.g. "F1"
    pub font_name: String,
    /// Points
    pub font_size: f32,
}

/// Operators showing one run of encoded glyphs in black
///
/// `x`/`y` place the start of the baseline, in points from the bottom-left
/// corner of the page. `text_hex` is a `<...>` string of 2-byte glyph ids.
pub fn generate_text_operators(text_hex: &str, x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    format!(
        "BT\n0 g\n/{} {} Tf\n{} {} Td\n{text_hex} Tj\nET\n",
        ctx.font_name,
        fmt_num(ctx.font_size as f64),
        fmt_num(x),
        fmt_num(y),
    )
    .into_bytes()
}

/// Number for a content stream: at most 3 decimals, no trailing zeros
pub(crate) fn fmt_num(value: f64) -> String {
    let fixed = format!("{value:.3}");
    match fixed.trim_end_matches('0').trim_end_matches('.') {
        "" | "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

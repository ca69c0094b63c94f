//! Vector drawing operators

use crate::text::fmt_num;

/// Stroke pattern for lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    /// Dash pattern operator (`d`) for this style, in points
    fn dash_operator(self) -> &'static str {
        match self {
            LineStyle::Solid => "[] 0 d",
            LineStyle::Dashed => "[3 2] 0 d",
        }
    }
}

/// Generate operators to stroke a straight line
///
/// All values are in points, PDF coordinates (origin bottom-left).
/// The graphics state is saved and restored around the stroke so the
/// line width and dash pattern never leak into later operators.
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    style: LineStyle,
) -> Vec<u8> {
    format!(
        "q\n0 0 0 RG\n{} w\n{}\n{} {} m\n{} {} l\nS\nQ\n",
        fmt_num(width),
        style.dash_operator(),
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_line() {
        let ops = generate_line_operators(10.0, 20.0, 110.0, 20.0, 0.85, LineStyle::Solid);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("q\n"));
        assert!(ops_str.contains("0.85 w"));
        assert!(ops_str.contains("[] 0 d"));
        assert!(ops_str.contains("10 20 m"));
        assert!(ops_str.contains("110 20 l"));
        assert!(ops_str.ends_with("S\nQ\n"));
    }

    #[test]
    fn test_dashed_line() {
        let ops = generate_line_operators(0.0, 0.0, 0.0, 50.0, 0.3, LineStyle::Dashed);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("[3 2] 0 d"));
        assert!(ops_str.contains("0 50 l"));
    }

    #[test]
    fn test_default_style() {
        assert_eq!(LineStyle::default(), LineStyle::Solid);
    }
}

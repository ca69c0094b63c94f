//! Word wrapping against a measured width
//!
//! Words are packed greedily into lines no wider than `max_width`, as
//! reported by a caller-supplied measuring function. Words that cannot fit
//! on a line of their own are split between characters.

use std::convert::Infallible;

/// Wrap text into lines using an infallible measure
///
/// # Example
/// ```
/// let lines = fanatitra::wrap_text("aa bb cc", 5.0, |s| s.chars().count() as f64);
/// assert_eq!(lines, vec!["aa bb", "cc"]);
/// ```
pub fn wrap_text<F>(text: &str, max_width: f64, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f64,
{
    match try_wrap_text(text, max_width, |s| Ok::<f64, Infallible>(measure(s))) {
        Ok(lines) => lines,
        Err(never) => match never {},
    }
}

/// Wrap text into lines, propagating measurement errors
///
/// Rules:
/// - Words are separated by runs of whitespace and rejoined with one space.
/// - A word that does not fit on the current line starts a new one.
/// - A word wider than `max_width` on its own is split at the last
///   character boundary that still fits; every piece, the tail included,
///   is a line of its own.
/// - When even a single character is too wide, the rest of the word is
///   emitted as one oversized line.
///
/// Whitespace-only input yields no lines.
pub fn try_wrap_text<F, E>(text: &str, max_width: f64, mut measure: F) -> Result<Vec<String>, E>
where
    F: FnMut(&str) -> Result<f64, E>,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if measure(&candidate)? <= max_width {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if measure(word)? <= max_width {
            current = word.to_string();
        } else {
            split_word(word, max_width, &mut measure, &mut lines)?;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

/// Push an oversized word as pieces of at most `max_width`, the last piece
/// included, so the next word always starts a fresh line
fn split_word<F, E>(
    word: &str,
    max_width: f64,
    measure: &mut F,
    lines: &mut Vec<String>,
) -> Result<(), E>
where
    F: FnMut(&str) -> Result<f64, E>,
{
    let mut rest = word;

    while !rest.is_empty() {
        let mut split = rest.len();
        for (index, ch) in rest.char_indices() {
            if measure(&rest[..index + ch.len_utf8()])? > max_width {
                split = index;
                break;
            }
        }

        // not even one character fits
        if split == 0 {
            split = rest.len();
        }

        lines.push(rest[..split].to_string());
        rest = &rest[split..];
    }

    Ok(())
}

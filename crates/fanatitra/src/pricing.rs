//! Item prices in the compact "thousands" notation
//!
//! An items string such as `"10+5+0"` lists one price per `+`-separated
//! token, expressed in thousands of currency units. A zero price marks a
//! free gift.

/// Multiplier from the input notation to currency units
pub const UNIT_FACTOR: f64 = 1000.0;

/// Separator between item tokens
pub const ITEM_SEPARATOR: char = '+';

/// A priced item token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item {
    /// Price of zero
    Gift,
    /// Price in currency units
    Priced(f64),
}

/// Parse one item token into currency units
///
/// Surrounding whitespace is ignored and only the leading number counts, so
/// `"10k"` is worth 10. Tokens that do not start with a finite decimal
/// number yield `None`.
pub fn parse_price(token: &str) -> Option<f64> {
    let value: f64 = leading_number(token.trim())?.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value * UNIT_FACTOR)
}

/// Longest prefix of `s` shaped like a decimal number with an optional
/// sign, fraction and exponent
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        end += 1 + fraction;
    }
    if whole + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    Some(&s[..end])
}

/// Classify every token of an items string, keeping their positions
///
/// Unparseable tokens stay in the list as `None` so that the item grid keeps
/// its column layout.
pub fn parse_items(items: &str) -> Vec<Option<Item>> {
    items
        .split(ITEM_SEPARATOR)
        .map(|token| {
            parse_price(token).map(|price| {
                if price == 0.0 {
                    Item::Gift
                } else {
                    Item::Priced(price)
                }
            })
        })
        .collect()
}

/// Sum of all parseable prices in an items string
pub fn total(items: &str) -> f64 {
    items
        .split(ITEM_SEPARATOR)
        .filter_map(|token| {
            let price = parse_price(token);
            if price.is_none() {
                log::debug!("ignoring price token {token:?}");
            }
            price
        })
        .sum()
}

/// Format an amount as a whole number, ties rounding to even
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{amount:.0}");
    if formatted == "-0" {
        return "0".to_string();
    }
    formatted
}

/// Short label for a priced item, e.g. `12500` becomes `"13k"`
pub fn format_thousands(price: f64) -> String {
    format!("{}k", format_amount(price / UNIT_FACTOR))
}

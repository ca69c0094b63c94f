//! Delivery record parsing

use serde::{Deserialize, Serialize};

/// Number of tab-separated fields a record line must carry
const FIELD_COUNT: usize = 5;

/// One delivery record
///
/// Fields are stored trimmed. `id`, `phone` and `notes` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// `+`-separated price tokens in thousands, e.g. "10+5"
    pub items: String,
    #[serde(default)]
    pub notes: String,
}

impl DeliveryEntry {
    /// Parse a single record line
    ///
    /// Returns `None` when the line has fewer than five tab-separated
    /// fields or when the first five are all blank. Fields past the sixth
    /// are ignored.
    pub fn from_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < FIELD_COUNT {
            return None;
        }
        if parts[..FIELD_COUNT].iter().all(|part| part.trim().is_empty()) {
            return None;
        }

        let field = |index: usize| parts.get(index).map(|s| s.trim()).unwrap_or_default();

        Some(Self {
            id: field(0).to_string(),
            name: field(1).to_string(),
            address: field(2).to_string(),
            phone: field(3).to_string(),
            items: field(4).to_string(),
            notes: field(5).to_string(),
        })
    }

    /// Sum of all parseable item prices, in currency units
    pub fn total(&self) -> f64 {
        crate::pricing::total(&self.items)
    }
}

/// Parse raw multi-line text into delivery entries
///
/// Blank lines, lines with fewer than five fields and rows whose first five
/// fields are all blank are skipped. Order of the surviving lines is
/// preserved.
///
/// # Example
/// ```
/// let entries = fanatitra::parse_content("1\tRabe\tLot II\t034\t10+5\tfragile\n\n");
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].notes, "fragile");
/// ```
pub fn parse_content(content: &str) -> Vec<DeliveryEntry> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let entry = DeliveryEntry::from_line(line);
            if entry.is_none() {
                log::debug!(
                    "skipping line {}: expected {} tab-separated fields with content",
                    index + 1,
                    FIELD_COUNT
                );
            }
            entry
        })
        .collect()
}

//! Line item rules.

use tracing::trace;

use crate::models::invoice::LineItem;

use super::patterns::ITEM_ROW;

/// Descriptions must be longer than this many characters.
const MIN_DESCRIPTION_LEN: usize = 3;

/// Summary rows look like item rows; these prefixes rule them out.
const EXCLUDED_PREFIXES: [&str; 3] = ["total", "grand", "bill"];

/// A rule that turns a single line of OCR text into a line item.
pub trait LineRule {
    /// Rule name used in logs.
    fn name(&self) -> &'static str;

    /// Parse one line. `None` means the line is not an item row.
    fn parse_line(&self, line: &str) -> Option<LineItem>;
}

/// Line rules applied by default, in priority order.
pub const DEFAULT_LINE_RULES: &[&dyn LineRule] = &[&ItemRowRule];

/// Whitespace-separated item row:
/// `[item no] description quantity unit_price [amount] total`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemRowRule;

impl LineRule for ItemRowRule {
    fn name(&self) -> &'static str {
        "item_row"
    }

    fn parse_line(&self, line: &str) -> Option<LineItem> {
        let caps = ITEM_ROW.captures(line.trim())?;

        let description = caps.get(1)?.as_str().trim();
        let quantity = caps.get(2)?.as_str();
        let unit_price = caps.get(3)?.as_str();
        let total_amount = caps.get(4)?.as_str();

        if !is_item_description(description) {
            trace!("Rejected item row description {:?}", description);
            return None;
        }

        Some(LineItem {
            description: description.to_string(),
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
            total_amount: total_amount.to_string(),
        })
    }
}

/// Whether a matched description belongs to a real item.
///
/// Rejects short fragments, summary rows and numeric codes that OCR split
/// off from the quantity column.
pub fn is_item_description(description: &str) -> bool {
    let description = description.trim();

    if description.chars().count() <= MIN_DESCRIPTION_LEN {
        return false;
    }

    let lower = description.to_lowercase();
    if EXCLUDED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return false;
    }

    !description.chars().next().is_some_and(|c| c.is_ascii_digit())
}

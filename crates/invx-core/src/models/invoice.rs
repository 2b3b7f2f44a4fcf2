//! Invoice data models.
//!
//! All extracted values are kept as the exact strings found in the OCR text.
//! Typed views (dates, decimals) are computed on demand and never replace the
//! stored text.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date format printed on the supported invoice layout.
pub const INVOICE_DATE_FORMAT: &str = "%d/%m/%Y";

/// A complete invoice: header fields plus the itemized rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice-level fields, flattened into the top-level JSON object.
    #[serde(flatten)]
    pub header: InvoiceHeader,

    /// Line items in order of appearance.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Invoice-level fields. `None` means no rule matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Numeric part of the invoice number.
    pub invoice_number: Option<String>,

    /// Bill date as printed (DD/MM/YYYY).
    pub invoice_date: Option<String>,

    /// Billed customer.
    pub customer_name: Option<String>,

    /// Issuing vendor.
    pub vendor_name: Option<String>,

    /// Grand total as printed.
    pub total_amount: Option<String>,
}

impl InvoiceHeader {
    /// Bill date as a calendar date, if it was found and is a valid date.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        self.invoice_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, INVOICE_DATE_FORMAT).ok())
    }

    /// Grand total as a decimal.
    pub fn total(&self) -> Option<Decimal> {
        self.total_amount.as_deref().and_then(parse_amount)
    }

    /// Names of the fields that were not found.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("invoice_number", &self.invoice_number),
            ("invoice_date", &self.invoice_date),
            ("customer_name", &self.customer_name),
            ("vendor_name", &self.vendor_name),
            ("total_amount", &self.total_amount),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// One itemized row. Only rows with all four values are ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description.
    #[serde(rename = "item_description")]
    pub description: String,

    /// Quantity (integer as printed).
    pub quantity: String,

    /// Unit price as printed.
    pub unit_price: String,

    /// Row total as printed.
    pub total_amount: String,
}

impl LineItem {
    pub fn quantity_value(&self) -> Option<Decimal> {
        parse_amount(&self.quantity)
    }

    pub fn unit_price_value(&self) -> Option<Decimal> {
        parse_amount(&self.unit_price)
    }

    pub fn total_value(&self) -> Option<Decimal> {
        parse_amount(&self.total_amount)
    }
}

impl Invoice {
    /// Create an invoice from its parts.
    pub fn new(header: InvoiceHeader, items: Vec<LineItem>) -> Self {
        Self { header, items }
    }

    /// Sum of the row totals that could be read as numbers.
    ///
    /// `None` when the sum does not fit in a [`Decimal`].
    pub fn items_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .filter_map(LineItem::total_value)
            .try_fold(Decimal::ZERO, |sum, total| sum.checked_add(total))
    }

    /// Consistency checks over the extracted data.
    ///
    /// Extraction never fails on these; they are reported so a caller can
    /// decide whether to trust the result.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.header.invoice_number.is_none() {
            issues.push("Missing invoice number".to_string());
        }

        if self.header.invoice_date.is_some() && self.header.issue_date().is_none() {
            issues.push(format!(
                "Invoice date is not a valid calendar date: {}",
                self.header.invoice_date.as_deref().unwrap_or_default()
            ));
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        for item in &self.items {
            let (Some(qty), Some(price), Some(total)) =
                (item.quantity_value(), item.unit_price_value(), item.total_value())
            else {
                continue;
            };

            // OCR can produce digit runs too long to multiply
            match qty.checked_mul(price).and_then(|expected| expected.checked_sub(total)) {
                Some(diff) if diff.abs() > Decimal::new(1, 2) => issues.push(format!(
                    "Line item '{}': {} x {} does not equal {}",
                    item.description, qty, price, total
                )),
                Some(_) => {}
                None => issues.push(format!(
                    "Line item '{}': {} x {} is too large to check",
                    item.description, qty, price
                )),
            }
        }

        if let Some(total) = self.header.total().filter(|_| !self.items.is_empty()) {
            match self.items_total() {
                Some(calculated) => {
                    let differs = calculated
                        .checked_sub(total)
                        .map_or(true, |diff| diff.abs() > Decimal::new(1, 2));
                    if differs {
                        issues.push(format!(
                            "Line item total ({}) differs from invoice total ({})",
                            calculated, total
                        ));
                    }
                }
                None => issues.push("Line item total is too large to compare".to_string()),
            }
        }

        issues
    }
}

fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim()).ok()
}

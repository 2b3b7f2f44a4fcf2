//! Header field rules.

use regex::{Captures, Regex};

use super::patterns::{CUSTOMER, INVOICE_DATE, INVOICE_NUMBER, TOTAL_AMOUNT, VENDOR};
use super::{ExtractionMatch, FieldExtractor};

/// The five invoice-level fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    InvoiceNumber,
    InvoiceDate,
    CustomerName,
    VendorName,
    TotalAmount,
}

impl HeaderField {
    pub const ALL: [HeaderField; 5] = [
        HeaderField::InvoiceNumber,
        HeaderField::InvoiceDate,
        HeaderField::CustomerName,
        HeaderField::VendorName,
        HeaderField::TotalAmount,
    ];

    /// Field name as it appears in the JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::InvoiceNumber => "invoice_number",
            HeaderField::InvoiceDate => "invoice_date",
            HeaderField::CustomerName => "customer_name",
            HeaderField::VendorName => "vendor_name",
            HeaderField::TotalAmount => "total_amount",
        }
    }

    /// Rules for this field, in priority order.
    pub fn rules(&self) -> Vec<HeaderRule> {
        match self {
            HeaderField::InvoiceNumber => vec![HeaderRule::new("cn3_number", &INVOICE_NUMBER)],
            HeaderField::InvoiceDate => vec![HeaderRule::new("labeled_dmy_date", &INVOICE_DATE)],
            HeaderField::CustomerName => vec![HeaderRule::new("bill_to_customer", &CUSTOMER)],
            HeaderField::VendorName => vec![HeaderRule::new("known_vendor", &VENDOR)],
            HeaderField::TotalAmount => vec![HeaderRule::new("labeled_total", &TOTAL_AMOUNT)],
        }
    }
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named pattern whose first capture group is the field value.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    name: &'static str,
    pattern: &'static Regex,
}

impl HeaderRule {
    pub fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn to_match(&self, caps: &Captures<'_>) -> Option<ExtractionMatch<String>> {
        let full = caps.get(0)?;
        let value = caps.get(1)?.as_str().trim().to_string();
        Some(
            ExtractionMatch::new(value, self.name, full.as_str())
                .with_position(full.start(), full.end()),
        )
    }
}

impl FieldExtractor for HeaderRule {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern.captures(text).and_then(|caps| self.to_match(&caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| self.to_match(&caps))
            .collect()
    }
}

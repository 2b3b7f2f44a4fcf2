//! Rule-based invoice parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{Invoice, InvoiceHeader, LineItem};

use super::rules::{first_match, HeaderField, LineRule, DEFAULT_LINE_RULES};

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: Invoice,
    /// Raw text the invoice was extracted from.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
///
/// Parsing is total: missing fields and unrecognized lines are normal
/// outcomes, never errors.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Extract the five header fields from the full text.
pub fn parse_header(text: &str) -> InvoiceHeader {
    let mut header = InvoiceHeader::default();

    for field in HeaderField::ALL {
        let value = first_match(&field.rules(), text).map(|m| {
            debug!("{} matched by rule {}: {:?}", field, m.rule, m.source);
            m.value
        });

        match field {
            HeaderField::InvoiceNumber => header.invoice_number = value,
            HeaderField::InvoiceDate => header.invoice_date = value,
            HeaderField::CustomerName => header.customer_name = value,
            HeaderField::VendorName => header.vendor_name = value,
            HeaderField::TotalAmount => header.total_amount = value,
        }
    }

    header
}

/// Extract line items, one candidate row per line, in text order.
pub fn parse_items(text: &str) -> Vec<LineItem> {
    parse_items_with(text, DEFAULT_LINE_RULES)
}

/// Extract line items using a custom rule list.
pub fn parse_items_with(text: &str, rules: &[&dyn LineRule]) -> Vec<LineItem> {
    text.split(is_line_break)
        .filter_map(|line| {
            rules.iter().find_map(|rule| {
                let item = rule.parse_line(line)?;
                debug!("Line item matched by rule {}: {}", rule.name(), item.description);
                Some(item)
            })
        })
        .collect()
}

/// Row separators in OCR text: `\n`, `\r` and the other Unicode line
/// boundaries. A `\r\n` pair yields an empty row, which no rule matches.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Parser for the supported layout, built from the default rule set.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedParser {
    config: ExtractionConfig,
}

impl RuleBasedParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from extraction settings.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Record a warning for every missing header field.
    pub fn with_missing_field_warnings(mut self, enabled: bool) -> Self {
        self.config.warn_on_missing_fields = enabled;
        self
    }
}

impl InvoiceParser for RuleBasedParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let header = parse_header(text);
        if self.config.warn_on_missing_fields {
            warnings.extend(
                header
                    .missing_fields()
                    .into_iter()
                    .map(|field| format!("Could not extract {}", field)),
            );
        }

        let items = parse_items(text);
        if items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        debug!(
            "Extracted {} line items, {} warnings",
            items.len(),
            warnings.len()
        );

        ExtractionResult {
            invoice: Invoice::new(header, items),
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::VENDOR_NAME;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "BILL DATE: 01/02/2024\nCN3-002254\nBILL TO: RAJ DATA PROCESSORS\n1 Widget Deluxe 10 5.00 50.00\n";

    const FULL_SCAN: &str = r#"
        RAJ SUPER WHOLESALE BAZAR
        Main Road, Pune
        Invoice No: CN3-004711
        BILL DATE: 12/03/2024
        BILL TO: RAJ DATA PROCESSORS

        Sr Item Description Qty Rate Disc Amount
        1 A4 Paper Rim 5 250.00 1250.00
        2 Stapler (Heavy) 2 180.00 20.00 340.00
        3 Ball Pen Blue 50 10.00 500.00
        4 1234 10 2.00 20.00
        5 Ink 2 30.00 60.00
        TOTAL 3 1.00 3.00

        GRAND TOTAL: 2090.00
    "#;

    #[test]
    fn test_parse_header_sample() {
        let header = parse_header(SAMPLE);

        assert_eq!(header.invoice_date.as_deref(), Some("01/02/2024"));
        assert_eq!(header.invoice_number.as_deref(), Some("002254"));
        assert_eq!(header.customer_name.as_deref(), Some("RAJ DATA PROCESSORS"));
        assert_eq!(header.vendor_name, None);
        assert_eq!(header.total_amount, None);
    }

    #[test]
    fn test_parse_items_sample() {
        let items = parse_items(SAMPLE);

        assert_eq!(
            items,
            vec![LineItem {
                description: "Widget Deluxe".to_string(),
                quantity: "10".to_string(),
                unit_price: "5.00".to_string(),
                total_amount: "50.00".to_string(),
            }]
        );
    }

    #[test]
    fn test_items_split_on_all_line_breaks() {
        let text = "1 Widget Deluxe 10 5.00 50.00\r2 Gadget Pro 2 25.00 50.00\x0c\
                    Ball Pen Blue 3 1.00 3.00\u{2028}Stapler Heavy 1 9.50 9.50\r\n";

        let descriptions: Vec<String> = parse_items(text)
            .into_iter()
            .map(|item| item.description)
            .collect();

        assert_eq!(
            descriptions,
            vec!["Widget Deluxe", "Gadget Pro", "Ball Pen Blue", "Stapler Heavy"]
        );
    }

    #[test]
    fn test_grand_total_only() {
        let header = parse_header("GRAND TOTAL: 123.45");

        assert_eq!(
            header,
            InvoiceHeader {
                total_amount: Some("123.45".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse_header(""), InvoiceHeader::default());
        assert!(parse_items("").is_empty());
    }

    #[test]
    fn test_no_patterns_present() {
        let text = "Thank you for shopping\nVisit again\n";
        assert_eq!(parse_header(text), InvoiceHeader::default());
    }

    #[test]
    fn test_vendor_in_noise() {
        let text = format!("~~ {} ~~ ||| 9O8", VENDOR_NAME);
        assert_eq!(parse_header(&text).vendor_name.as_deref(), Some(VENDOR_NAME));
    }

    #[test]
    fn test_full_scan() {
        let header = parse_header(FULL_SCAN);
        assert_eq!(header.invoice_number.as_deref(), Some("004711"));
        assert_eq!(header.invoice_date.as_deref(), Some("12/03/2024"));
        assert_eq!(header.customer_name.as_deref(), Some("RAJ DATA PROCESSORS"));
        assert_eq!(header.vendor_name.as_deref(), Some(VENDOR_NAME));
        assert_eq!(header.total_amount.as_deref(), Some("2090.00"));

        let items = parse_items(FULL_SCAN);
        let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["A4 Paper Rim", "Stapler (Heavy)", "Ball Pen Blue"]
        );
        assert_eq!(items[1].total_amount, "340.00");
    }

    #[test]
    fn test_parse_items_idempotent() {
        assert_eq!(parse_items(FULL_SCAN), parse_items(FULL_SCAN));
    }

    #[test]
    fn test_custom_line_rules() {
        struct PipeRow;

        impl LineRule for PipeRow {
            fn name(&self) -> &'static str {
                "pipe_row"
            }

            fn parse_line(&self, line: &str) -> Option<LineItem> {
                let parts: Vec<&str> = line.split('|').map(str::trim).collect();
                match parts.as_slice() {
                    [description, quantity, unit_price, total] => Some(LineItem {
                        description: description.to_string(),
                        quantity: quantity.to_string(),
                        unit_price: unit_price.to_string(),
                        total_amount: total.to_string(),
                    }),
                    _ => None,
                }
            }
        }

        let rules: [&dyn LineRule; 1] = [&PipeRow];
        let items = parse_items_with("Glue | 1 | 9.00 | 9.00\nnoise", &rules);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Glue");
    }

    #[test]
    fn test_parser_warnings() {
        let result = RuleBasedParser::new().parse("GRAND TOTAL: 123.45");

        assert_eq!(result.invoice.header.total_amount.as_deref(), Some("123.45"));
        assert_eq!(
            result.warnings,
            vec![
                "Could not extract invoice_number",
                "Could not extract invoice_date",
                "Could not extract customer_name",
                "Could not extract vendor_name",
                "Could not extract line items",
            ]
        );
        assert_eq!(result.raw_text, "GRAND TOTAL: 123.45");
    }

    #[test]
    fn test_parser_without_field_warnings() {
        let result = RuleBasedParser::new()
            .with_missing_field_warnings(false)
            .parse(SAMPLE);

        assert!(result.warnings.is_empty());
        assert_eq!(result.invoice.items.len(), 1);
    }
}

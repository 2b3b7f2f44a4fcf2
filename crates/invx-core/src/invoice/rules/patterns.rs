//! Regex patterns for the supported invoice layout.
//!
//! Header patterns are case-insensitive and searched over the whole text.
//! The item row pattern is matched against one trimmed line at a time.

use lazy_static::lazy_static;
use regex::Regex;

/// Vendor printed on every invoice of this layout.
pub const VENDOR_NAME: &str = "RAJ SUPER WHOLESALE BAZAR";

/// Customer billed on every invoice of this layout.
pub const CUSTOMER_NAME: &str = "RAJ DATA PROCESSORS";

lazy_static! {
    // Invoice number, e.g. "CN3-002254" or "CN3 002254"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)CN3[-\s]?(\d+)"
    ).unwrap();

    // "BILL DATE: 01/02/2024" or "Date 01/02/2024"
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)(?:BILL\s+DATE|DATE)\s*:?\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref CUSTOMER: Regex = Regex::new(
        r"(?i)(?:BILL TO|TO)\s*:?\s*(RAJ DATA PROCESSORS)"
    ).unwrap();

    pub static ref VENDOR: Regex = Regex::new(
        r"(?i)(RAJ SUPER WHOLESALE BAZAR)"
    ).unwrap();

    // OCR regularly drops the decimal point, so it is optional here
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:GRAND\s+TOTAL|TOTAL)\s*:?\s*(\d+\.?\d{2})"
    ).unwrap();

    // [item no] description qty unit_price [intermediate amount] total
    pub static ref ITEM_ROW: Regex = Regex::new(
        r"(?x)
        ^\s*
        (?:\d+\s+)?                      # item number
        ([A-Za-z0-9\s()/.\-]+?)          # description
        \s+
        (\d+)                            # quantity
        \s+
        (\d+(?:\.\d{2})?)                # unit price
        \s+
        (?:\d+(?:\.\d{2})?\s+)?          # discount or tax column
        (\d+(?:\.\d{2})?)                # total
        \s*$
        "
    ).unwrap();
}

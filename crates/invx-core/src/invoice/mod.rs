//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{
    parse_header, parse_items, parse_items_with, ExtractionResult, InvoiceParser, RuleBasedParser,
};

//! Core library for scanned invoice OCR processing.
//!
//! This crate provides:
//! - Text extraction from invoice images via the tesseract executable
//! - Rule-based header and line item parsing of the raw OCR text
//! - An image to invoice pipeline shared by the CLI and the HTTP API
//! - An HTTP API (`api` feature) exposing `POST /process-invoice/`

pub mod error;
pub mod models;
pub mod ocr;
pub mod invoice;
pub mod pipeline;

#[cfg(feature = "api")]
pub mod api;

pub use error::{InvxError, OcrError, Result};
pub use models::config::InvxConfig;
pub use models::invoice::{Invoice, InvoiceHeader, LineItem};
pub use ocr::{TesseractEngine, TextExtractor};
pub use invoice::{parse_header, parse_items, ExtractionResult, InvoiceParser, RuleBasedParser};
pub use pipeline::InvoiceProcessor;

//! Image to text conversion.
//!
//! OCR itself is delegated to an external engine; this module only wraps it
//! behind the [`TextExtractor`] trait.

mod tesseract;

pub use tesseract::TesseractEngine;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::OcrError;

/// Turns an image on disk into raw text.
pub trait TextExtractor: Send + Sync {
    /// Engine name, reported in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Recognize the text of the image at `image_path`.
    ///
    /// Either the full text is returned or an error; never partial text.
    fn extract_text(&self, image_path: &Path) -> Result<String, OcrError>;
}

/// Write the raw OCR text to `path` for inspection, replacing any previous dump.
///
/// Failures are logged and otherwise ignored.
pub fn dump_raw_text(path: &Path, text: &str) {
    match std::fs::write(path, text) {
        Ok(()) => debug!("Wrote OCR output to {}", path.display()),
        Err(e) => warn!("Failed to write OCR output to {}: {}", path.display(), e),
    }
}

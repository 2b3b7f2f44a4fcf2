//! Image to invoice pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::invoice::{ExtractionResult, InvoiceParser, RuleBasedParser};
use crate::models::config::InvxConfig;
use crate::ocr::{TesseractEngine, TextExtractor};

/// Runs OCR on an image and parses the resulting text.
///
/// Holds no per-request state, so one processor can serve concurrent
/// requests.
#[derive(Clone)]
pub struct InvoiceProcessor {
    extractor: Arc<dyn TextExtractor>,
    parser: RuleBasedParser,
}

impl InvoiceProcessor {
    pub fn new(extractor: Arc<dyn TextExtractor>, parser: RuleBasedParser) -> Self {
        Self { extractor, parser }
    }

    /// Build a tesseract-backed processor from configuration.
    pub fn from_config(config: &InvxConfig) -> Self {
        Self::new(
            Arc::new(TesseractEngine::new(config.ocr.clone())),
            RuleBasedParser::with_config(config.extraction.clone()),
        )
    }

    /// Name of the OCR engine in use.
    pub fn engine_name(&self) -> &str {
        self.extractor.name()
    }

    /// Extract an invoice from the image at `image_path`.
    ///
    /// OCR failures abort immediately; parsing itself cannot fail.
    pub fn process(&self, image_path: &Path) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Processing invoice image: {}", image_path.display());

        let text = self.extractor.extract_text(image_path)?;
        debug!("{} returned {} characters", self.extractor.name(), text.len());

        let mut result = self.parser.parse(&text);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        for warning in &result.warnings {
            debug!("{}: {}", image_path.display(), warning);
        }

        Ok(result)
    }
}

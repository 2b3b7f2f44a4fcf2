//! Tesseract command-line engine.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use image::{GenericImageView, ImageFormat, ImageReader};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{dump_raw_text, TextExtractor};

/// OCR engine backed by the `tesseract` executable.
///
/// The executable location comes from [`OcrConfig::tesseract_cmd`]; nothing
/// is read from global state.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    /// Create an engine from OCR settings.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Settings this engine was built with.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn command_name(&self) -> String {
        self.config.tesseract_cmd.display().to_string()
    }

    /// First line of `tesseract --version`.
    pub fn version(&self) -> Result<String, OcrError> {
        let output = Command::new(&self.config.tesseract_cmd)
            .arg("--version")
            .output()
            .map_err(|source| OcrError::Spawn {
                command: self.command_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };

        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    fn run(&self, input: &Path) -> Result<String, OcrError> {
        let mut command = Command::new(&self.config.tesseract_cmd);
        command
            .arg(input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language);

        if let Some(psm) = self.config.psm {
            command.arg("--psm").arg(psm.to_string());
        }

        debug!("Running {:?}", command);

        let output = command.output().map_err(|source| OcrError::Spawn {
            command: self.command_name(),
            source,
        })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| OcrError::InvalidOutput(e.to_string()))
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl TextExtractor for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn extract_text(&self, image_path: &Path) -> Result<String, OcrError> {
        let start = Instant::now();

        // Sniff the format from content; uploads may arrive without an extension
        let image = ImageReader::open(image_path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| image_load_error(image_path, e))?
            .decode()
            .map_err(|e| image_load_error(image_path, e))?;
        let (width, height) = image.dimensions();

        info!("Processing image: {}x{}", width, height);

        // Normalize to PNG so the engine never sees a format it cannot read
        let input = tempfile::Builder::new()
            .prefix("invx-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::TempFile(e.to_string()))?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| OcrError::TempFile(e.to_string()))?;

        let text = self.run(input.path())?;

        if let Some(ref path) = self.config.debug_output {
            dump_raw_text(path, &text);
        }

        info!(
            "OCR complete: {} characters in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

fn image_load_error(path: &Path, err: impl std::fmt::Display) -> OcrError {
    OcrError::ImageLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

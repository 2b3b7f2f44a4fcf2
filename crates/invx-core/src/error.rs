//! Error types for the invx-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the invx library.
#[derive(Error, Debug)]
pub enum InvxError {
    /// OCR processing error.
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an image into text.
///
/// Every variant aborts the pipeline; no partial text is ever returned.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The image could not be opened or decoded.
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// The intermediate file handed to the engine could not be written.
    #[error("failed to prepare image for OCR: {0}")]
    TempFile(String),

    /// The OCR executable could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR executable ran but reported a failure.
    #[error("OCR engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },

    /// The engine produced output that is not valid UTF-8.
    #[error("invalid OCR output: {0}")]
    InvalidOutput(String),
}

/// Result type for the invx library.
pub type Result<T> = std::result::Result<T, InvxError>;

//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::pipeline::InvoiceProcessor;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// API version
    pub version: String,
    /// OCR engine serving requests
    pub ocr_engine: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description
    pub detail: String,
}

/// API server state.
#[derive(Clone)]
pub struct ApiState {
    /// Shared pipeline; it carries no per-request state.
    pub processor: InvoiceProcessor,
}

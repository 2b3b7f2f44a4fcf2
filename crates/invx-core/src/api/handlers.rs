//! API request handlers.

use std::io::Write;
use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::{debug, info};

use crate::models::invoice::Invoice;

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse},
};

/// Multipart field carrying the invoice image.
const FILE_FIELD: &str = "file";

/// Invoice extraction handler.
///
/// POST /process-invoice/
///
/// Accepts multipart form data with a single `file` field holding the
/// invoice image. Other fields are ignored.
///
/// The upload is written to a temporary file which is removed once the
/// request finishes, whether or not extraction succeeded. Any OCR failure
/// is reported as 500 with a `detail` message.
pub async fn process_invoice_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<Invoice>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(e.to_string()))?;

        upload = Some((data, file_name));
    }

    let Some((data, file_name)) = upload else {
        return Err(ApiError::validation("No file provided"));
    };

    info!(
        "Received upload {} ({} bytes)",
        file_name.as_deref().unwrap_or("<unnamed>"),
        data.len()
    );

    let processor = state.processor.clone();
    let result = tokio::task::spawn_blocking(move || {
        let suffix = file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix("invx-upload-")
            .suffix(&suffix)
            .tempfile()?;
        temp.write_all(&data)?;
        temp.flush()?;

        processor.process(temp.path())
    })
    .await
    .map_err(|e| ApiError::internal(format!("Extraction task failed: {e}")))??;

    debug!(
        "Extracted {} line items in {}ms",
        result.invoice.items.len(),
        result.processing_time_ms
    );

    Ok(Json(result.invoice))
}

/// Health check handler.
///
/// GET /health
pub async fn health_handler(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr_engine: state.processor.engine_name().to_string(),
    })
}

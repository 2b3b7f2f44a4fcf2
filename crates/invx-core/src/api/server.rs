//! API server setup.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::error::{InvxError, Result};
use crate::models::config::InvxConfig;
use crate::pipeline::InvoiceProcessor;

use super::{
    handlers::{health_handler, process_invoice_handler},
    types::ApiState,
};

/// Create the API router around a processor.
///
/// Bodies larger than `max_upload_bytes` are rejected with 413 before any
/// handler runs.
pub fn create_router(processor: InvoiceProcessor, max_upload_bytes: usize) -> Router {
    let state = ApiState { processor };

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/process-invoice/", post(process_invoice_handler))
        .route("/process-invoice", post(process_invoice_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until the process is stopped.
///
/// Binds to `config.server.host:config.server.port` and uses a
/// tesseract-backed processor built from `config`.
pub async fn serve(config: &InvxConfig) -> Result<()> {
    let ip: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| InvxError::Config(format!("Invalid host address '{}': {}", config.server.host, e)))?;

    let addr = SocketAddr::new(ip, config.server.port);
    let processor = InvoiceProcessor::from_config(config);
    let app = create_router(processor, config.server.max_upload_bytes);

    tracing::info!("Starting invoice API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! HTTP API for invoice extraction.
//!
//! # Endpoints
//!
//! - `POST /process-invoice/` - Extract an invoice from an uploaded image (multipart field `file`)
//! - `GET /health` - Health check endpoint
//!
//! # cURL Examples
//!
//! ```bash
//! curl -F "file=@invoice.jpg" http://localhost:8000/process-invoice/
//! curl http://localhost:8000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, serve};
pub use types::{ApiState, ErrorResponse, HealthResponse};

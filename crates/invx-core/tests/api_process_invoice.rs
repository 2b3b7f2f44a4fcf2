#![cfg(feature = "api")]
//! Integration tests for the invoice API using multipart uploads.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use invx_core::{
    InvoiceProcessor, OcrError, RuleBasedParser, TextExtractor, api::create_router,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

const INVOICE_TEXT: &str = "\
RAJ SUPER WHOLESALE BAZAR
CN3-002254
BILL DATE: 15/08/2023
BILL TO: RAJ DATA PROCESSORS
1 Widget Deluxe 10 5.00 50.00
2 Gadget Pro 2 25.00 50.00
GRAND TOTAL: 100.00
";

const BOUNDARY: &str = "X-BOUNDARY";

/// Returns fixed text and remembers the file it was asked to read.
struct Recording {
    text: &'static str,
    seen: Mutex<Option<(PathBuf, Vec<u8>)>>,
}

impl Recording {
    fn new(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            text,
            seen: Mutex::new(None),
        })
    }
}

impl TextExtractor for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn extract_text(&self, image_path: &Path) -> Result<String, OcrError> {
        let bytes = std::fs::read(image_path).unwrap_or_default();
        *self.seen.lock().unwrap() = Some((image_path.to_path_buf(), bytes));
        Ok(self.text.to_string())
    }
}

struct Failing;

impl TextExtractor for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn extract_text(&self, _image_path: &Path) -> Result<String, OcrError> {
        Err(OcrError::Engine {
            status: "exit status: 1".to_string(),
            stderr: "Failed loading language 'eng'".to_string(),
        })
    }
}

fn router_with(extractor: Arc<dyn TextExtractor>) -> Router {
    create_router(
        InvoiceProcessor::new(extractor, RuleBasedParser::new()),
        5 * 1024 * 1024,
    )
}

fn multipart_request(uri: &str, field: &str, filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
Content-Type: image/jpeg\r\n\
\r\n\
{content}\r\n\
--{BOUNDARY}--\r\n"
    );
    let body_bytes = body.into_bytes();

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("content-length", body_bytes.len())
        .body(Body::from(body_bytes))
        .expect("Failed to build request")
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1_000_000)
        .await
        .expect("Failed to read body");
    let value = serde_json::from_slice(&bytes).expect("Response JSON parse failed");
    (status, value)
}

#[tokio::test]
async fn test_process_invoice_returns_fields() {
    let extractor = Recording::new(INVOICE_TEXT);
    let request = multipart_request("/process-invoice/", "file", "invoice.jpg", "fake image bytes");

    let (status, value) = send(router_with(extractor), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["invoice_number"], "002254");
    assert_eq!(value["invoice_date"], "15/08/2023");
    assert_eq!(value["customer_name"], "RAJ DATA PROCESSORS");
    assert_eq!(value["vendor_name"], "RAJ SUPER WHOLESALE BAZAR");
    assert_eq!(value["total_amount"], "100.00");

    let items = value["items"].as_array().expect("items should be an array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["item_description"], "Widget Deluxe");
    assert_eq!(items[0]["quantity"], "10");
    assert_eq!(items[0]["unit_price"], "5.00");
    assert_eq!(items[0]["total_amount"], "50.00");
    assert_eq!(items[1]["item_description"], "Gadget Pro");
}

#[tokio::test]
async fn test_missing_fields_are_null() {
    let extractor = Recording::new("nothing recognisable here");
    let request = multipart_request("/process-invoice/", "file", "invoice.jpg", "x");

    let (status, value) = send(router_with(extractor), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["invoice_number"], Value::Null);
    assert_eq!(value["invoice_date"], Value::Null);
    assert_eq!(value["customer_name"], Value::Null);
    assert_eq!(value["vendor_name"], Value::Null);
    assert_eq!(value["total_amount"], Value::Null);
    assert_eq!(value["items"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let extractor = Recording::new(INVOICE_TEXT);
    let request = multipart_request("/process-invoice", "file", "invoice.jpg", "x");

    let (status, value) = send(router_with(extractor), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["invoice_number"], "002254");
}

#[tokio::test]
async fn test_upload_is_temporary() {
    let extractor = Recording::new(INVOICE_TEXT);
    let request = multipart_request("/process-invoice/", "file", "scan.jpg", "fake image bytes");

    let (status, _) = send(router_with(extractor.clone()), request).await;
    assert_eq!(status, StatusCode::OK);

    let (path, bytes) = extractor
        .seen
        .lock()
        .unwrap()
        .clone()
        .expect("extractor should have been called");

    assert_eq!(bytes, b"fake image bytes");
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    assert!(!path.exists(), "upload should be removed after the request");
}

#[tokio::test]
async fn test_missing_file_field() {
    let extractor = Recording::new(INVOICE_TEXT);
    let request = multipart_request("/process-invoice/", "image", "invoice.jpg", "x");

    let (status, value) = send(router_with(extractor.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["detail"], "No file provided");
    assert!(extractor.seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_ocr_failure_is_internal_error() {
    let request = multipart_request("/process-invoice/", "file", "invoice.jpg", "x");

    let (status, value) = send(router_with(Arc::new(Failing)), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = value["detail"].as_str().expect("detail should be a string");
    assert!(detail.contains("OCR failed"));
    assert!(detail.contains("Failed loading language"));
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("Failed to build request");

    let (status, value) = send(router_with(Recording::new("")), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["ocr_engine"], "recording");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let extractor = Recording::new(INVOICE_TEXT);
    let router = create_router(
        InvoiceProcessor::new(extractor.clone(), RuleBasedParser::new()),
        64,
    );
    let request = multipart_request("/process-invoice/", "file", "invoice.jpg", &"x".repeat(1024));

    let response = router.oneshot(request).await.expect("Request failed");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(extractor.seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_truncated_multipart_body() {
    let extractor = Recording::new(INVOICE_TEXT);
    let body = format!(
        "--{BOUNDARY}\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"invoice.jpg\"\r\n\
Content-Type: image/jpeg\r\n\
\r\n\
partial image bytes"
    );
    let body_bytes = body.into_bytes();

    let request = Request::builder()
        .method("POST")
        .uri("/process-invoice/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("content-length", body_bytes.len())
        .body(Body::from(body_bytes))
        .expect("Failed to build request");

    let (status, value) = send(router_with(extractor.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["detail"].is_string());
    assert!(extractor.seen.lock().unwrap().is_none());
}

//! Ingestion adapters
//!
//! Normalizes the three accepted request shapes (multipart file upload, JSON
//! URL reference, raw binary body) into a [`DocumentPayload`]. The ingestion
//! mode is decided exactly once from the `Content-Type` header; there is no
//! fallback between modes within a request.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use serde_json::Value;

use crate::error::ApiError;

const OCTET_STREAM: &str = "application/octet-stream";

/// Content types accepted by the raw-binary adapter.
const BINARY_CONTENT_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Ingestion mode, decided once at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestKind {
    /// `multipart/form-data`: first uploaded file part.
    Multipart,
    /// JSON body with a `url` field referencing the document.
    JsonReference,
    /// Request body is the document bytes.
    RawBinary,
}

impl IngestKind {
    /// Select the ingestion mode from the declared content type.
    ///
    /// Substring matches are tried in order: multipart form data, JSON, then
    /// the known binary document types. Anything else is a 415.
    pub fn from_content_type(value: &str) -> Result<Self, ApiError> {
        let content_type = value.to_ascii_lowercase();

        if content_type.contains("multipart/form-data") {
            Ok(Self::Multipart)
        } else if content_type.contains("json") {
            Ok(Self::JsonReference)
        } else if BINARY_CONTENT_TYPES
            .iter()
            .any(|known| content_type.contains(known))
        {
            Ok(Self::RawBinary)
        } else {
            Err(ApiError::UnsupportedMediaType(value.to_string()))
        }
    }
}

/// Normalized document payload handed to the analysis orchestrator
#[derive(Debug, Clone)]
pub enum DocumentPayload {
    /// Document bytes, submitted with the given content type.
    Bytes { content_type: String, data: Bytes },
    /// Publicly fetchable document URL, submitted as `{"urlSource": url}`.
    UrlSource { url: String },
}

/// Multipart adapter: capture the first uploaded file part.
///
/// The field name is ignored; the first part carrying a filename wins. The
/// bytes are forwarded as `application/octet-stream` regardless of the part's
/// declared type.
pub async fn first_file_part(request: Request) -> Result<DocumentPayload, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::Internal(format!("multipart parse failed: {e}")))?;

    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Internal(format!("multipart parse failed: {e}")))?;

        match field {
            Some(field) if field.file_name().is_some() => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Internal(format!("failed to read file part: {e}")))?;
                return Ok(DocumentPayload::Bytes {
                    content_type: OCTET_STREAM.to_string(),
                    data,
                });
            }
            // Non-file field, keep looking.
            Some(_) => continue,
            None => return Err(ApiError::Validation("expected file field".to_string())),
        }
    }
}

/// JSON adapter: extract the `url` string field.
pub async fn url_reference(request: Request) -> Result<DocumentPayload, ApiError> {
    let body = Bytes::from_request(request, &())
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read request body: {e}")))?;

    let parsed: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("invalid JSON body: {e}")))?;

    match parsed.get("url").and_then(Value::as_str) {
        Some(url) => Ok(DocumentPayload::UrlSource {
            url: url.to_string(),
        }),
        None => Err(ApiError::Validation(
            "missing \"url\" field in JSON body".to_string(),
        )),
    }
}

/// Raw-binary adapter: pass the body through unchanged.
pub async fn raw_binary(request: Request) -> Result<DocumentPayload, ApiError> {
    let data = Bytes::from_request(request, &())
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read request body: {e}")))?;

    Ok(DocumentPayload::Bytes {
        content_type: OCTET_STREAM.to_string(),
        data,
    })
}

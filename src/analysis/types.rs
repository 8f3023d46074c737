//! Analysis types
//!
//! Request and result shapes for the upstream document-analysis service.
//! Paragraphs and tables are opaque pass-throughs of the vendor schema and
//! are not redefined locally.

use serde::Serialize;
use serde_json::Value;

use crate::ingest::DocumentPayload;

/// Analysis model variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisModel {
    /// OCR only.
    Read,
    /// OCR plus structural layout (paragraphs, tables).
    Layout,
}

impl AnalysisModel {
    /// Select the model from the `model` query parameter. Only the exact
    /// value `layout` selects [`Self::Layout`]; anything else defaults to
    /// [`Self::Read`].
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("layout") => Self::Layout,
            _ => Self::Read,
        }
    }

    /// Vendor model identifier.
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Read => "prebuilt-read",
            Self::Layout => "prebuilt-layout",
        }
    }
}

/// One analysis request, built per inbound HTTP request and then discarded
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub model: AnalysisModel,
    pub payload: DocumentPayload,
}

/// Simplified analysis result returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub text: String,
    pub paragraphs: Vec<Value>,
    pub tables: Vec<Value>,
}

impl AnalysisOutput {
    /// Extract `content`, `paragraphs` and `tables` from the vendor result
    /// envelope, defaulting each to empty when absent.
    pub fn from_envelope(envelope: &Value) -> Self {
        let text = envelope
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let paragraphs = envelope
            .get("paragraphs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let tables = envelope
            .get("tables")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Self {
            text,
            paragraphs,
            tables,
        }
    }
}

/// Handle for a long-running analysis operation (the vendor's poll URL)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle(pub String);

/// Upstream API surface generation
///
/// Newer service instances expose the `documentintelligence` paths; older
/// ones only expose `formrecognizer`. The paths are compatible but distinct,
/// and submission falls back from [`Self::Current`] to [`Self::Legacy`] when
/// the newer surface is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGeneration {
    Current,
    Legacy,
}

impl ApiGeneration {
    pub fn path_root(&self) -> &'static str {
        match self {
            Self::Current => "documentintelligence",
            Self::Legacy => "formrecognizer",
        }
    }

    pub fn api_version(&self) -> &'static str {
        match self {
            Self::Current => "2024-11-30",
            Self::Legacy => "2023-07-31",
        }
    }
}

/// Outcome of a submission attempt
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The service accepted the job and returned an operation handle.
    Accepted(OperationHandle),
    /// The service does not expose the attempted API surface (404).
    UnsupportedVersion,
    /// The service refused the job; `details` is the raw vendor error body.
    Rejected { status: u16, details: Value },
}

/// Outcome of one poll of a long-running operation
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The operation has not reached a terminal state yet.
    Pending,
    /// Terminal success; the value is the vendor's result envelope.
    Succeeded(Value),
    /// Terminal failure; `details` is the raw vendor error body.
    Failed { details: Value },
}

//! Document analysis route
//!
//! `POST /analyze` accepts a document as a multipart file upload, a JSON URL
//! reference, or a raw binary body; forwards it to the upstream analysis
//! service; and returns the extracted text, paragraphs and tables.

use axum::extract::{Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::analysis::{self, AnalysisModel, AnalysisOutput, AnalysisRequest};
use crate::error::ApiError;
use crate::ingest::{self, IngestKind};
use crate::state::AppState;

/// Query parameters for `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    /// `layout` selects the layout model; anything else defaults to read.
    pub model: Option<String>,
}

/// Preflight response; CORS headers are added by the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
    request: Request,
) -> Result<Json<AnalysisOutput>, ApiError> {
    // Configuration is checked before the body is touched; a misconfigured
    // server fails fast without contacting anything.
    let context = state.analysis().ok_or_else(|| {
        ApiError::Configuration("AZURE_DI_ENDPOINT and AZURE_DI_KEY must be set".to_string())
    })?;

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let kind = IngestKind::from_content_type(&content_type)?;
    let model = AnalysisModel::from_query(query.model.as_deref());

    tracing::info!(model = model.model_id(), kind = ?kind, "analysis request");

    let payload = match kind {
        IngestKind::Multipart => ingest::first_file_part(request).await?,
        IngestKind::JsonReference => ingest::url_reference(request).await?,
        IngestKind::RawBinary => ingest::raw_binary(request).await?,
    };

    let request = AnalysisRequest { model, payload };
    let output = analysis::run(context.backend.as_ref(), &request, context.poll_interval).await?;
    Ok(Json(output))
}

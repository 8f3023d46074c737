//! API error types
//!
//! One error enum covers the whole request path: validation failures detected
//! before the upstream service is contacted, upstream failures reported by the
//! service (which always carry the vendor's raw error body for diagnosis),
//! and everything unexpected.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Unified request error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server-side configuration is missing (upstream credentials).
    #[error("service not configured: {0}")]
    Configuration(String),

    /// The request body failed validation (missing file part, missing `url`).
    #[error("{0}")]
    Validation(String),

    /// The declared content type matches no ingestion mode.
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),

    /// The upstream service refused to start the analysis.
    #[error("analysis submission rejected by upstream service (status {status})")]
    UpstreamSubmit { status: u16, details: Value },

    /// The upstream service started the analysis but reported failure.
    #[error("analysis failed in upstream service")]
    UpstreamAnalysis { details: Value },

    /// Transport failures, parser failures, anything uncaught.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::UpstreamSubmit { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamAnalysis { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Vendor error body, passed through unmodified for upstream failures.
    fn details(&self) -> Option<&Value> {
        match self {
            Self::UpstreamSubmit { details, .. } | Self::UpstreamAnalysis { details } => {
                Some(details)
            }
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            details: self.details().cloned(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        assert_eq!(
            ApiError::Configuration("missing".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Validation("missing url".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UnsupportedMediaType("text/plain".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::UpstreamSubmit {
                status: 503,
                details: json!({}),
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_errors_carry_vendor_details() {
        let details = json!({"code": "InvalidRequest", "message": "bad model"});
        let err = ApiError::UpstreamSubmit {
            status: 400,
            details: details.clone(),
        };
        assert_eq!(err.details(), Some(&details));
        assert!(ApiError::Validation("nope".into()).details().is_none());
    }
}

//! Analysis orchestration
//!
//! Drives one analysis request through the upstream service:
//!
//! ```text
//! Submitted(current) -> [404] -> Submitted(legacy) -> Accepted
//!     -> Polling -> { Succeeded | Failed }
//! ```
//!
//! The only retry is the single version fallback at submission time. There
//! is no local timeout; the hosting platform's request timeout governs.

use std::time::Duration;

use serde_json::Value;

use super::backend::AnalysisBackend;
use super::types::{
    AnalysisOutput, AnalysisRequest, ApiGeneration, OperationHandle, PollOutcome, SubmitOutcome,
};
use crate::error::ApiError;

/// Run one analysis request to completion.
pub async fn run(
    backend: &dyn AnalysisBackend,
    request: &AnalysisRequest,
    poll_interval: Duration,
) -> Result<AnalysisOutput, ApiError> {
    let operation = submit_with_fallback(backend, request).await?;
    let envelope = await_completion(backend, &operation, poll_interval).await?;

    let output = AnalysisOutput::from_envelope(&envelope);
    tracing::info!(
        model = request.model.model_id(),
        text_len = output.text.len(),
        paragraphs = output.paragraphs.len(),
        tables = output.tables.len(),
        "analysis complete"
    );
    Ok(output)
}

/// Submit against the current API surface, falling back once to the legacy
/// surface when the service instance does not expose it.
async fn submit_with_fallback(
    backend: &dyn AnalysisBackend,
    request: &AnalysisRequest,
) -> Result<OperationHandle, ApiError> {
    match backend.submit(ApiGeneration::Current, request).await? {
        SubmitOutcome::Accepted(operation) => Ok(operation),
        SubmitOutcome::UnsupportedVersion => {
            tracing::debug!("current analysis API not found upstream, retrying on legacy surface");
            match backend.submit(ApiGeneration::Legacy, request).await? {
                SubmitOutcome::Accepted(operation) => Ok(operation),
                SubmitOutcome::UnsupportedVersion => Err(ApiError::UpstreamSubmit {
                    status: 404,
                    details: serde_json::json!({
                        "message": "analysis endpoint not found on either API surface"
                    }),
                }),
                SubmitOutcome::Rejected { status, details } => {
                    Err(ApiError::UpstreamSubmit { status, details })
                }
            }
        }
        SubmitOutcome::Rejected { status, details } => {
            Err(ApiError::UpstreamSubmit { status, details })
        }
    }
}

/// Poll the operation until it reaches a terminal state, suspending between
/// polls rather than busy-waiting.
async fn await_completion(
    backend: &dyn AnalysisBackend,
    operation: &OperationHandle,
    poll_interval: Duration,
) -> Result<Value, ApiError> {
    loop {
        match backend.poll(operation).await? {
            PollOutcome::Pending => {
                tracing::trace!(operation = %operation.0, "analysis still running");
                tokio::time::sleep(poll_interval).await;
            }
            PollOutcome::Succeeded(envelope) => return Ok(envelope),
            PollOutcome::Failed { details } => return Err(ApiError::UpstreamAnalysis { details }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ScriptedBackend;
    use crate::analysis::types::AnalysisModel;
    use crate::ingest::DocumentPayload;
    use serde_json::json;

    const POLL: Duration = Duration::from_millis(1);

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            model: AnalysisModel::Read,
            payload: DocumentPayload::UrlSource {
                url: "https://example.com/doc.pdf".to_string(),
            },
        }
    }

    fn accepted() -> SubmitOutcome {
        SubmitOutcome::Accepted(OperationHandle("op://test".to_string()))
    }

    #[tokio::test]
    async fn accepted_submission_polls_to_success() {
        let backend = ScriptedBackend::new(
            accepted(),
            accepted(),
            vec![
                PollOutcome::Pending,
                PollOutcome::Pending,
                PollOutcome::Succeeded(json!({"content": "hello", "paragraphs": [], "tables": []})),
            ],
        );

        let output = run(&backend, &request(), POLL).await.unwrap();
        assert_eq!(output.text, "hello");
        assert!(output.paragraphs.is_empty());
        assert!(output.tables.is_empty());
        // No fallback when the current surface accepts.
        assert_eq!(backend.submit_calls(), vec![ApiGeneration::Current]);
    }

    #[tokio::test]
    async fn missing_current_surface_falls_back_exactly_once() {
        let backend = ScriptedBackend::new(
            SubmitOutcome::UnsupportedVersion,
            accepted(),
            vec![PollOutcome::Succeeded(json!({"content": "ok"}))],
        );

        let output = run(&backend, &request(), POLL).await.unwrap();
        assert_eq!(output.text, "ok");
        assert_eq!(
            backend.submit_calls(),
            vec![ApiGeneration::Current, ApiGeneration::Legacy]
        );
    }

    #[tokio::test]
    async fn missing_both_surfaces_is_an_upstream_error() {
        let backend = ScriptedBackend::new(
            SubmitOutcome::UnsupportedVersion,
            SubmitOutcome::UnsupportedVersion,
            vec![],
        );

        let err = run(&backend, &request(), POLL).await.unwrap_err();
        match err {
            ApiError::UpstreamSubmit { status, .. } => assert_eq!(status, 404),
            other => panic!("expected UpstreamSubmit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_submission_carries_vendor_details() {
        let details = json!({"code": "InvalidRequest", "message": "unsupported document"});
        let backend = ScriptedBackend::new(
            SubmitOutcome::Rejected {
                status: 422,
                details: details.clone(),
            },
            accepted(),
            vec![],
        );

        let err = run(&backend, &request(), POLL).await.unwrap_err();
        match err {
            ApiError::UpstreamSubmit {
                status,
                details: got,
            } => {
                assert_eq!(status, 422);
                assert_eq!(got, details);
            }
            other => panic!("expected UpstreamSubmit, got {other:?}"),
        }
        // A refusal is not a version mismatch; no fallback happens.
        assert_eq!(backend.submit_calls(), vec![ApiGeneration::Current]);
    }

    #[tokio::test]
    async fn failed_operation_carries_vendor_details() {
        let details = json!({"code": "InternalServerError", "message": "analysis crashed"});
        let backend = ScriptedBackend::new(
            accepted(),
            accepted(),
            vec![
                PollOutcome::Pending,
                PollOutcome::Failed {
                    details: details.clone(),
                },
            ],
        );

        let err = run(&backend, &request(), POLL).await.unwrap_err();
        match err {
            ApiError::UpstreamAnalysis { details: got } => assert_eq!(got, details),
            other => panic!("expected UpstreamAnalysis, got {other:?}"),
        }
    }
}

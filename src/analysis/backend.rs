//! Analysis backends
//!
//! Defines the backend trait over the upstream service's submit/poll
//! operations and the production Azure Document Intelligence implementation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;

use super::types::{AnalysisRequest, ApiGeneration, OperationHandle, PollOutcome, SubmitOutcome};
use crate::config::AnalysisConfig;
use crate::error::ApiError;
use crate::ingest::DocumentPayload;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Upstream analysis service interface
///
/// `submit` starts an analysis job against one API generation; `poll` checks
/// a long-running operation once. Transport failures are `Err`; everything
/// the service itself said, including refusals, is an `Ok` outcome so the
/// orchestrator can decide how to react.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn submit(
        &self,
        generation: ApiGeneration,
        request: &AnalysisRequest,
    ) -> Result<SubmitOutcome, ApiError>;

    async fn poll(&self, operation: &OperationHandle) -> Result<PollOutcome, ApiError>;
}

/// Azure Document Intelligence backend
pub struct AzureBackend {
    http: reqwest::Client,
    endpoint: String,
    key: String,
}

impl AzureBackend {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key: config.key.clone(),
        }
    }

    fn analyze_url(&self, generation: ApiGeneration, model_id: &str) -> String {
        format!(
            "{}/{}/documentModels/{}:analyze?api-version={}",
            self.endpoint,
            generation.path_root(),
            model_id,
            generation.api_version()
        )
    }
}

#[async_trait]
impl AnalysisBackend for AzureBackend {
    async fn submit(
        &self,
        generation: ApiGeneration,
        request: &AnalysisRequest,
    ) -> Result<SubmitOutcome, ApiError> {
        let url = self.analyze_url(generation, request.model.model_id());
        tracing::debug!(%url, generation = ?generation, "submitting analysis job");

        let builder = self.http.post(&url).header(KEY_HEADER, &self.key);
        let builder = match &request.payload {
            DocumentPayload::Bytes { content_type, data } => builder
                .header(CONTENT_TYPE, content_type)
                .body(data.clone()),
            DocumentPayload::UrlSource { url } => {
                builder.json(&serde_json::json!({ "urlSource": url }))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Internal(format!("analysis submission failed: {e}")))?;

        match response.status() {
            StatusCode::ACCEPTED => {
                let location = response
                    .headers()
                    .get("operation-location")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ApiError::Internal(
                            "upstream accepted the job without an operation-location header"
                                .to_string(),
                        )
                    })?;
                Ok(SubmitOutcome::Accepted(OperationHandle(location)))
            }
            StatusCode::NOT_FOUND => Ok(SubmitOutcome::UnsupportedVersion),
            status => Ok(SubmitOutcome::Rejected {
                status: status.as_u16(),
                details: error_details(response).await,
            }),
        }
    }

    async fn poll(&self, operation: &OperationHandle) -> Result<PollOutcome, ApiError> {
        let response = self
            .http
            .get(&operation.0)
            .header(KEY_HEADER, &self.key)
            .send()
            .await
            .map_err(|e| ApiError::Internal(format!("operation status request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Internal(format!(
                "operation status request returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("invalid operation status body: {e}")))?;

        match body.get("status").and_then(Value::as_str) {
            Some("succeeded") => Ok(PollOutcome::Succeeded(
                body.get("analyzeResult").cloned().unwrap_or(Value::Null),
            )),
            Some("failed") => Ok(PollOutcome::Failed {
                details: body.get("error").cloned().unwrap_or(Value::Null),
            }),
            // notStarted / running / anything unrecognized: keep polling.
            _ => Ok(PollOutcome::Pending),
        }
    }
}

/// Read the vendor's error body, keeping it opaque. Non-JSON bodies are
/// wrapped so the caller still sees what the service said.
async fn error_details(response: reqwest::Response) -> Value {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "message": text }))
}

/// Scripted backend for tests: fixed submit outcomes per API generation and
/// a queue of poll outcomes, with a log of submit calls.
#[cfg(test)]
pub struct ScriptedBackend {
    pub current: SubmitOutcome,
    pub legacy: SubmitOutcome,
    pub polls: std::sync::Mutex<std::collections::VecDeque<PollOutcome>>,
    pub submit_calls: std::sync::Mutex<Vec<ApiGeneration>>,
}

#[cfg(test)]
impl ScriptedBackend {
    pub fn new(current: SubmitOutcome, legacy: SubmitOutcome, polls: Vec<PollOutcome>) -> Self {
        Self {
            current,
            legacy,
            polls: std::sync::Mutex::new(polls.into()),
            submit_calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Backend that accepts immediately and succeeds with the given envelope.
    pub fn succeeding(envelope: Value) -> Self {
        let accepted = SubmitOutcome::Accepted(OperationHandle("op://test".to_string()));
        Self::new(
            accepted.clone(),
            accepted,
            vec![PollOutcome::Succeeded(envelope)],
        )
    }

    pub fn submit_calls(&self) -> Vec<ApiGeneration> {
        self.submit_calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn submit(
        &self,
        generation: ApiGeneration,
        _request: &AnalysisRequest,
    ) -> Result<SubmitOutcome, ApiError> {
        self.submit_calls.lock().unwrap().push(generation);
        Ok(match generation {
            ApiGeneration::Current => self.current.clone(),
            ApiGeneration::Legacy => self.legacy.clone(),
        })
    }

    async fn poll(&self, _operation: &OperationHandle) -> Result<PollOutcome, ApiError> {
        Ok(self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PollOutcome::Pending))
    }
}

//! Document analysis
//!
//! Submits normalized documents to the external analysis service and drives
//! the resulting long-running operation to completion.
//!
//! The service is reached through the [`AnalysisBackend`] trait so the
//! orchestration state machine can be exercised against a scripted fake.
//! [`AzureBackend`] is the production implementation, speaking the Azure
//! Document Intelligence wire protocol across two API generations.

mod backend;
mod orchestrator;
mod types;

pub use backend::{AnalysisBackend, AzureBackend};
pub use orchestrator::run;
pub use types::{
    AnalysisModel, AnalysisOutput, AnalysisRequest, ApiGeneration, OperationHandle, PollOutcome,
    SubmitOutcome,
};

#[cfg(test)]
pub use backend::ScriptedBackend;

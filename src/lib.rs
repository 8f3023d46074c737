//! Docrelay
//!
//! HTTP gateway in front of a cloud document-analysis service. Accepts a
//! document as a multipart file upload, a JSON URL reference, or a raw
//! binary body; submits it to the upstream service; polls the long-running
//! analysis operation to completion; and returns the extracted text,
//! paragraphs and tables as JSON.
//!
//! # Modules
//!
//! - `ingest`: normalizes the three request shapes into one payload type
//! - `analysis`: backend trait, Azure implementation, and the orchestrator
//! - `routes`: HTTP surface and response shaping

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod routes;
pub mod state;

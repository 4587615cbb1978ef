//! Shared types used by the extraction backend client.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors returned while interacting with the extraction backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Backend responded with an unexpected status code.
    #[error("Unexpected backend response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the backend.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response body was missing expected fields or had the wrong shape.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Raw extraction payload returned by the upload endpoint.
///
/// The backend returns two parallel collections of 3-element string tuples
/// `[dataUrl, renderUrl, description]`. Entries are kept as raw JSON values
/// here so that tuple-shape violations are detected during normalization
/// rather than rejecting the whole response at decode time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionPayload {
    /// Tabular artifacts. Absent or empty arrays are valid.
    #[serde(default)]
    pub csvs: Vec<Value>,
    /// Chart artifacts. Absent or empty arrays are valid.
    #[serde(default)]
    pub images: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchUploadResponse {
    #[serde(default)]
    pub(crate) documents: Vec<ExtractionPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskResponse {
    pub(crate) answer: String,
}

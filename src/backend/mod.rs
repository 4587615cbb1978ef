//! Extraction backend integration.

pub mod http;
pub mod types;

use async_trait::async_trait;

pub use http::HttpBackend;
pub use types::{BackendError, ExtractionPayload};

/// Interface implemented by extraction backends.
///
/// The session managers talk to the backend exclusively through this trait so
/// that tests can substitute scripted implementations for the HTTP client.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Upload a single document and return its raw extraction payload.
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionPayload, BackendError>;

    /// Upload several documents in one request, returning one payload per
    /// document in request order.
    async fn upload_batch(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<ExtractionPayload>, BackendError>;

    /// Ask a free-text question about previously ingested content.
    async fn ask(&self, question: &str) -> Result<String, BackendError>;
}

//! HTTP client wrapper for the extraction backend.

use crate::backend::types::{AskResponse, BackendError, BatchUploadResponse, ExtractionPayload};
use crate::backend::ExtractionBackend;
use crate::config::Config;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Lightweight HTTP client for the extraction backend endpoints.
pub struct HttpBackend {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl HttpBackend {
    /// Construct a new client from the supplied configuration.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let mut builder = Client::builder().user_agent("doculens/0.1");
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url =
            normalize_base_url(&config.backend_url).map_err(BackendError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            timeout = ?config.request_timeout,
            "Initialized extraction backend client"
        );

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &'static str,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = BackendError::UnexpectedStatus { status, body };
            tracing::error!(context, error = %error, "Backend request failed");
            return Err(error);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            let error = BackendError::MalformedResponse(format!("{context}: {err}"));
            tracing::error!(context, error = %error, "Backend response failed to decode");
            error
        })
    }
}

#[async_trait]
impl ExtractionBackend for HttpBackend {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionPayload, BackendError> {
        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        tracing::debug!(file = file_name, size, "Uploading document");
        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        Self::decode(response, "upload").await
    }

    async fn upload_batch(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<ExtractionPayload>, BackendError> {
        let count = files.len();
        let mut form = Form::new();
        for (file_name, bytes) in files {
            form = form.part("files", Part::bytes(bytes).file_name(file_name));
        }

        tracing::debug!(files = count, "Uploading document batch");
        let response = self
            .client
            .post(self.endpoint("upload-multiple"))
            .multipart(form)
            .send()
            .await?;

        let payload: BatchUploadResponse = Self::decode(response, "upload-multiple").await?;
        Ok(payload.documents)
    }

    async fn ask(&self, question: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.endpoint("ask"))
            .json(&json!({ "question": question }))
            .send()
            .await?;

        let payload: AskResponse = Self::decode(response, "ask").await?;
        Ok(payload.answer)
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

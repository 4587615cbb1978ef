//! Ingestion session: owns the set of uploaded documents and drives each one
//! through its upload lifecycle.

use crate::backend::{BackendError, ExtractionBackend, ExtractionPayload};
use crate::metrics::{IngestionMetrics, IngestionMetricsSnapshot};
use crate::session::artifacts::normalize_extraction;
use crate::session::preview::{PreviewHandle, PreviewProvider};
use crate::session::types::{
    DocumentId, DocumentSnapshot, DocumentSource, DocumentState, ExtractedArtifact,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct DocumentEntry {
    id: DocumentId,
    file_name: String,
    preview: Option<Box<dyn PreviewHandle>>,
    state: DocumentState,
}

/// Owns the documents of one user session and their upload lifecycle
/// (`pending → uploading → {ready | failed}`).
///
/// Construct one per session and share it through an `Arc` when submissions
/// run concurrently. All backend failures are absorbed into document state;
/// submission never returns an error to the caller.
pub struct IngestionSession {
    backend: Arc<dyn ExtractionBackend>,
    previews: Box<dyn PreviewProvider>,
    metrics: IngestionMetrics,
    documents: Mutex<Vec<DocumentEntry>>,
}

impl IngestionSession {
    /// Build a session over the given backend and preview provider.
    pub fn new(backend: Arc<dyn ExtractionBackend>, previews: Box<dyn PreviewProvider>) -> Self {
        Self {
            backend,
            previews,
            metrics: IngestionMetrics::new(),
            documents: Mutex::new(Vec::new()),
        }
    }

    /// Submit one document: register it, derive a preview, and upload it.
    ///
    /// Resolves once the upload settles; the returned id can be used with
    /// [`IngestionSession::document`] to observe the final state. If the
    /// document was discarded while the upload was in flight, the late result
    /// is suppressed and the document set is left unchanged.
    pub async fn submit(&self, source: DocumentSource) -> DocumentId {
        let id = self.register(&source);
        self.mark_uploading(id);
        let DocumentSource { file_name, bytes } = source;
        let result = self.backend.upload(&file_name, bytes).await;
        self.apply_upload_result(id, result);
        id
    }

    /// Submit several documents as one backend request.
    ///
    /// Each document progresses through its own lifecycle; the backend
    /// responds with one payload per file in request order. Unmatched
    /// documents are marked failed rather than left in limbo. An empty batch
    /// is a no-op.
    pub async fn submit_batch(&self, sources: Vec<DocumentSource>) -> Vec<DocumentId> {
        if sources.is_empty() {
            tracing::debug!("Ignoring empty batch submission");
            return Vec::new();
        }

        let ids: Vec<DocumentId> = sources
            .iter()
            .map(|source| {
                let id = self.register(source);
                self.mark_uploading(id);
                id
            })
            .collect();
        let files = sources
            .into_iter()
            .map(|source| (source.file_name, source.bytes))
            .collect();

        match self.backend.upload_batch(files).await {
            Ok(payloads) => {
                if payloads.len() > ids.len() {
                    tracing::warn!(
                        expected = ids.len(),
                        received = payloads.len(),
                        "Batch response has extra entries; ignoring the surplus"
                    );
                }
                let mut payloads = payloads.into_iter();
                for (index, id) in ids.iter().copied().enumerate() {
                    match payloads.next() {
                        Some(payload) => self.apply_upload_result(id, Ok(payload)),
                        None => self.apply_upload_result(
                            id,
                            Err(BackendError::MalformedResponse(format!(
                                "batch response missing entry {index}"
                            ))),
                        ),
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = %err, documents = ids.len(), "Batch upload failed");
                let reason = err.to_string();
                for id in ids.iter().copied() {
                    self.apply_failure(id, reason.clone());
                }
            }
        }

        ids
    }

    /// Remove a document from the session, releasing its preview handle.
    ///
    /// Safe to call in any status, including mid-upload: a discard always
    /// wins over an in-flight result, which is dropped on arrival. Returns
    /// whether a document was actually removed.
    pub fn discard(&self, id: DocumentId) -> bool {
        let entry = {
            let mut documents = self.lock();
            let Some(position) = documents.iter().position(|entry| entry.id == id) else {
                tracing::debug!(document = %id, "Discard for unknown document ignored");
                return false;
            };
            documents.remove(position)
        };

        if let Some(preview) = entry.preview {
            preview.revoke();
        }
        tracing::debug!(document = %id, "Document discarded");
        true
    }

    /// Snapshot every document in submission order.
    pub fn documents(&self) -> Vec<DocumentSnapshot> {
        self.lock().iter().map(snapshot_entry).collect()
    }

    /// Snapshot a single document, if it is still part of the session.
    pub fn document(&self, id: DocumentId) -> Option<DocumentSnapshot> {
        self.lock()
            .iter()
            .find(|entry| entry.id == id)
            .map(snapshot_entry)
    }

    /// Return the current upload metrics snapshot.
    pub fn metrics_snapshot(&self) -> IngestionMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn register(&self, source: &DocumentSource) -> DocumentId {
        let id = DocumentId::new();
        let preview = match self.previews.create(source) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(document = %id, error = %err, "Failed to derive preview");
                None
            }
        };

        self.lock().push(DocumentEntry {
            id,
            file_name: source.file_name.clone(),
            preview,
            state: DocumentState::Pending,
        });
        tracing::info!(document = %id, file = %source.file_name, "Document selected");
        id
    }

    fn mark_uploading(&self, id: DocumentId) {
        let mut documents = self.lock();
        if let Some(entry) = documents.iter_mut().find(|entry| entry.id == id) {
            entry.state = DocumentState::Uploading;
            self.metrics.record_submitted();
            tracing::debug!(document = %id, "Upload started");
        }
    }

    fn apply_upload_result(
        &self,
        id: DocumentId,
        result: Result<ExtractionPayload, BackendError>,
    ) {
        match result {
            Ok(payload) => match normalize_extraction(&payload) {
                Ok(artifacts) => self.apply_ready(id, artifacts),
                Err(err) => {
                    tracing::error!(document = %id, error = %err, "Extraction payload malformed");
                    self.apply_failure(id, err.to_string());
                }
            },
            Err(err) => {
                tracing::error!(document = %id, error = %err, "Document upload failed");
                self.apply_failure(id, err.to_string());
            }
        }
    }

    fn apply_ready(&self, id: DocumentId, artifacts: Vec<ExtractedArtifact>) {
        let mut documents = self.lock();
        let Some(entry) = documents.iter_mut().find(|entry| entry.id == id) else {
            tracing::debug!(document = %id, "Result for discarded document suppressed");
            return;
        };
        self.metrics.record_ready(artifacts.len() as u64);
        tracing::info!(document = %id, artifacts = artifacts.len(), "Document ready");
        entry.state = DocumentState::Ready(artifacts);
    }

    fn apply_failure(&self, id: DocumentId, reason: String) {
        let mut documents = self.lock();
        let Some(entry) = documents.iter_mut().find(|entry| entry.id == id) else {
            tracing::debug!(document = %id, "Result for discarded document suppressed");
            return;
        };
        self.metrics.record_failed();
        entry.state = DocumentState::Failed(reason);
    }

    // The lock is never held across an await; recovery from poisoning keeps a
    // panicking sibling task from wedging the whole session.
    fn lock(&self) -> MutexGuard<'_, Vec<DocumentEntry>> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn snapshot_entry(entry: &DocumentEntry) -> DocumentSnapshot {
    let (artifacts, failure) = match &entry.state {
        DocumentState::Ready(artifacts) => (artifacts.clone(), None),
        DocumentState::Failed(reason) => (Vec::new(), Some(reason.clone())),
        DocumentState::Pending | DocumentState::Uploading => (Vec::new(), None),
    };
    DocumentSnapshot {
        id: entry.id,
        file_name: entry.file_name.clone(),
        status: entry.state.status(),
        artifacts,
        failure,
        preview_path: entry
            .preview
            .as_ref()
            .map(|preview| preview.location().to_path_buf()),
    }
}

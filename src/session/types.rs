//! Core data types for the ingestion and chat sessions.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Opaque identifier assigned to an uploaded document, stable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw local file selected for upload.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    /// File name as presented by the user, forwarded to the backend.
    pub file_name: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
}

/// Kind of structured artifact extracted from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Tabular data, typically exported as CSV.
    Table,
    /// Chart or figure rendered as an image.
    Chart,
}

/// A structured extraction result derived from an uploaded document.
///
/// Both resource references are optional; an artifact with neither is still
/// valid and renders caption-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedArtifact {
    /// Which collection the artifact came from.
    pub kind: ArtifactKind,
    /// Downloadable resource reference (e.g. a CSV export), if any.
    pub data_url: Option<String>,
    /// Image resource reference for visual preview, if any.
    pub render_url: Option<String>,
    /// Human-readable caption; may be empty.
    pub description: String,
}

/// Upload lifecycle position of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Created from a file selection; upload not yet started.
    Pending,
    /// Upload request in flight.
    Uploading,
    /// Extraction completed; artifacts populated.
    Ready,
    /// Upload or normalization failed; a failure reason is recorded.
    Failed,
}

/// Internal document state. Artifacts are representable only in `Ready`, so a
/// failed or in-flight document can never expose a partial artifact list.
#[derive(Debug)]
pub(crate) enum DocumentState {
    Pending,
    Uploading,
    Ready(Vec<ExtractedArtifact>),
    Failed(String),
}

impl DocumentState {
    pub(crate) fn status(&self) -> DocumentStatus {
        match self {
            Self::Pending => DocumentStatus::Pending,
            Self::Uploading => DocumentStatus::Uploading,
            Self::Ready(_) => DocumentStatus::Ready,
            Self::Failed(_) => DocumentStatus::Failed,
        }
    }
}

/// Point-in-time view of one uploaded document, suitable for rendering.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// Identifier assigned at submission time.
    pub id: DocumentId,
    /// File name supplied with the original selection.
    pub file_name: String,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// Extracted artifacts; empty unless `status` is [`DocumentStatus::Ready`].
    pub artifacts: Vec<ExtractedArtifact>,
    /// Human-readable failure reason when `status` is [`DocumentStatus::Failed`].
    pub failure: Option<String>,
    /// Local preview location, when a preview could be derived.
    pub preview_path: Option<PathBuf>,
}

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Question typed by the user.
    User,
    /// Answer (or error notice) produced on the backend's behalf.
    Assistant,
}

/// One entry in the append-only chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    /// Who authored the turn.
    pub role: TurnRole,
    /// Turn content. Non-empty for user turns; assistant turns carry the
    /// answer text or an error notice when the backend call failed.
    pub text: String,
    /// Monotonically increasing position in the transcript.
    pub sequence: u64,
}

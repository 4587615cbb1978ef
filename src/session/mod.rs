//! Session managers: document ingestion lifecycle and chat transcript.

pub mod artifacts;
pub mod chat;
pub mod ingest;
pub mod preview;
pub mod types;

pub use artifacts::{NormalizeError, normalize_extraction};
pub use chat::{AskOutcome, ChatSession};
pub use ingest::IngestionSession;
pub use preview::{PreviewHandle, PreviewProvider, TempFilePreview};
pub use types::{
    ArtifactKind, ChatTurn, DocumentId, DocumentSnapshot, DocumentSource, DocumentStatus,
    ExtractedArtifact, TurnRole,
};

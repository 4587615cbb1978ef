use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing upload activity within one session.
#[derive(Default)]
pub struct IngestionMetrics {
    documents_submitted: AtomicU64,
    documents_ready: AtomicU64,
    documents_failed: AtomicU64,
    artifacts_extracted: AtomicU64,
}

impl IngestionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document handed to the backend for extraction.
    pub fn record_submitted(&self) {
        self.documents_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document that reached `ready` and the artifacts extracted from it.
    pub fn record_ready(&self, artifact_count: u64) {
        self.documents_ready.fetch_add(1, Ordering::Relaxed);
        self.artifacts_extracted
            .fetch_add(artifact_count, Ordering::Relaxed);
    }

    /// Record a document that reached `failed`.
    pub fn record_failed(&self) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> IngestionMetricsSnapshot {
        IngestionMetricsSnapshot {
            documents_submitted: self.documents_submitted.load(Ordering::Relaxed),
            documents_ready: self.documents_ready.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
            artifacts_extracted: self.artifacts_extracted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of upload counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct IngestionMetricsSnapshot {
    /// Number of documents submitted since the session started.
    pub documents_submitted: u64,
    /// Number of documents that completed extraction.
    pub documents_ready: u64,
    /// Number of documents that failed to upload or normalize.
    pub documents_failed: u64,
    /// Total artifact count across all ready documents.
    pub artifacts_extracted: u64,
}

/// Thread-safe counters describing chat activity within one session.
#[derive(Default)]
pub struct ChatMetrics {
    questions_asked: AtomicU64,
    answers_failed: AtomicU64,
}

impl ChatMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a question sent to the backend.
    pub fn record_question(&self) {
        self.questions_asked.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a question whose answer could not be obtained.
    pub fn record_answer_failure(&self) {
        self.answers_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> ChatMetricsSnapshot {
        ChatMetricsSnapshot {
            questions_asked: self.questions_asked.load(Ordering::Relaxed),
            answers_failed: self.answers_failed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of chat counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ChatMetricsSnapshot {
    /// Number of questions sent since the session started.
    pub questions_asked: u64,
    /// Number of questions that produced an error turn instead of an answer.
    pub answers_failed: u64,
}

//! Chat session: owns the append-only transcript and mediates each
//! question/answer round with the backend.

use crate::backend::ExtractionBackend;
use crate::metrics::{ChatMetrics, ChatMetricsSnapshot};
use crate::session::types::{ChatTurn, TurnRole};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of one [`ChatSession::ask`] round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// The backend answered; an assistant turn carries the answer text.
    Answered,
    /// The backend call failed; an assistant turn carries an error notice.
    Failed,
    /// The question was empty or whitespace-only; nothing was appended and
    /// no request was issued.
    RejectedEmpty,
}

struct TranscriptState {
    turns: Vec<ChatTurn>,
    next_sequence: u64,
}

/// Owns one chat transcript and serializes questions into backend queries.
///
/// The transcript is an append-only log: user turns are appended before the
/// request is issued and are never dropped, even when the answer cannot be
/// obtained. Concurrent asks are permitted; assistant turns land in response
/// arrival order, which may differ from issuance order.
pub struct ChatSession {
    backend: Arc<dyn ExtractionBackend>,
    metrics: ChatMetrics,
    transcript: Mutex<TranscriptState>,
}

impl ChatSession {
    /// Build a session over the given backend.
    pub fn new(backend: Arc<dyn ExtractionBackend>) -> Self {
        Self {
            backend,
            metrics: ChatMetrics::new(),
            transcript: Mutex::new(TranscriptState {
                turns: Vec::new(),
                next_sequence: 0,
            }),
        }
    }

    /// Ask a question about the ingested material.
    ///
    /// Blank questions are rejected with no state change. Otherwise the user
    /// turn is appended immediately and the matching assistant turn is
    /// appended when the response (or failure) arrives. The transcript keeps
    /// the question exactly as asked; trimming applies only to the blank
    /// check and the outgoing request.
    pub async fn ask(&self, question: &str) -> AskOutcome {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring blank question");
            return AskOutcome::RejectedEmpty;
        }

        self.append(TurnRole::User, question.to_string());
        self.metrics.record_question();
        tracing::debug!(chars = trimmed.len(), "Question sent");

        match self.backend.ask(trimmed).await {
            Ok(answer) => {
                self.append(TurnRole::Assistant, answer);
                AskOutcome::Answered
            }
            Err(err) => {
                tracing::error!(error = %err, "Ask request failed");
                self.metrics.record_answer_failure();
                self.append(
                    TurnRole::Assistant,
                    format!("The assistant could not answer: {err}"),
                );
                AskOutcome::Failed
            }
        }
    }

    /// Snapshot the transcript in append order.
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.lock().turns.clone()
    }

    /// Return the current chat metrics snapshot.
    pub fn metrics_snapshot(&self) -> ChatMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn append(&self, role: TurnRole, text: String) {
        let mut state = self.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.turns.push(ChatTurn {
            role,
            text,
            sequence,
        });
    }

    fn lock(&self) -> MutexGuard<'_, TranscriptState> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

//! Engine and store error types.
//!
//! `StoreError` is defined here so the engine can downcast and classify
//! collaborator failures without string matching.

use thiserror::Error;
use uuid::Uuid;

use crate::model::Language;

/// Errors surfaced by the public engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested target language is not configured.
    #[error("language '{0}' is not supported")]
    UnsupportedLanguage(Language),

    /// The user already has the maximum number of active sessions.
    #[error("you have reached the limit of {limit} open sessions; finish one before starting another")]
    TooManySessions { limit: usize },

    /// Wrong id or wrong owner; the two cases are deliberately
    /// indistinguishable to the caller.
    #[error("no session of yours corresponds to the id provided")]
    SessionNotFound,

    /// Answers were submitted to a completed session.
    #[error("session has ended; please play an active session")]
    SessionCompleted,

    /// A collaborator failure, propagated unmodified. The engine performs
    /// no retries, since grading must not be applied twice.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The session's round counter moved between read and commit; a
    /// concurrent submission won the race and the whole call was rolled
    /// back.
    #[error("session {0} was modified concurrently; no answers were applied")]
    Conflict(Uuid),

    /// A referenced session does not exist.
    #[error("unknown session id: {0}")]
    UnknownSession(Uuid),

    /// A referenced word does not exist in the vocabulary.
    #[error("unknown word id: {0}")]
    UnknownWord(Uuid),
}

impl EngineError {
    /// Returns `true` if this error is caused by the caller rather than by
    /// a collaborator failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EngineError::Store(_))
    }
}

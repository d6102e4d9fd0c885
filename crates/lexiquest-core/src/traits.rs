//! Repository trait definitions for the engine's collaborators.
//!
//! These async traits are implemented by the `lexiquest-store` crate; tests
//! may substitute their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Language, Session, Stat, Word};

// ---------------------------------------------------------------------------
// Vocabulary store trait (read-only graph accessor)
// ---------------------------------------------------------------------------

/// A translation link with both endpoint words resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLink {
    /// Source word of the edge.
    pub word: Word,
    /// The word it translates into.
    pub translation: Word,
    /// Frequency rank of the source word; lower means more common.
    pub frequency: u32,
}

/// Read-only queries over the word/translation graph.
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// The `limit` lowest-frequency (most common) links whose source word
    /// belongs to `language`, ordered by ascending frequency.
    async fn links_by_frequency(
        &self,
        language: &Language,
        limit: usize,
    ) -> anyhow::Result<Vec<ResolvedLink>>;

    /// Words reachable via outgoing links from `word_id`.
    async fn translations_of(&self, word_id: Uuid) -> anyhow::Result<Vec<Word>>;

    /// Source words of incoming links, i.e. the words that translate *into*
    /// `word_id`.
    async fn reverse_translations_of(&self, word_id: Uuid) -> anyhow::Result<Vec<Word>>;
}

// ---------------------------------------------------------------------------
// Session store trait (transactional persistence)
// ---------------------------------------------------------------------------

/// One graded question inside a round commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedWord {
    pub word_id: Uuid,
    pub correct: bool,
}

/// The unit of work for one answer submission.
///
/// Everything in here must be applied atomically: remaining-word removals,
/// stat upserts, and the session counter update either all commit or none
/// do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundCommit {
    pub session_id: Uuid,
    pub user_id: Uuid,
    /// Target language recorded on newly created stat rows.
    pub language: Language,
    /// The session's `round` value observed when grading started. The store
    /// must reject the commit with [`StoreError::Conflict`] if it no longer
    /// matches.
    ///
    /// [`StoreError::Conflict`]: crate::error::StoreError::Conflict
    pub expected_round: u32,
    pub graded: Vec<GradedWord>,
    /// Whether this commit empties the remaining-word set.
    pub complete: bool,
}

/// Transactional persistence for sessions, remaining words, and stats.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session together with its remaining-word entries, as
    /// one transaction.
    async fn insert_session(&self, session: &Session, words: &[Word]) -> anyhow::Result<()>;

    /// Number of sessions the user currently has in the active state.
    async fn count_active_sessions(&self, user_id: Uuid) -> anyhow::Result<usize>;

    /// All sessions owned by the user, optionally only active ones.
    async fn sessions_for_user(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> anyhow::Result<Vec<Session>>;

    /// The session with the given id, if it exists *and* belongs to the
    /// user. Wrong id and wrong owner are indistinguishable to callers.
    async fn session_for_user(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> anyhow::Result<Option<Session>>;

    /// The still-unanswered words of a session.
    async fn remaining_words(&self, session_id: Uuid) -> anyhow::Result<Vec<Word>>;

    /// The user's stat rows with their words resolved, optionally filtered
    /// to stats recorded for one target language.
    async fn stats_with_words(
        &self,
        user_id: Uuid,
        language: Option<&Language>,
    ) -> anyhow::Result<Vec<(Stat, Word)>>;

    /// Apply one graded round atomically: remove each graded word from the
    /// remaining set, upsert its stat row, bump the session's correct count
    /// and round counter, and deactivate the session if `complete`.
    async fn commit_round(&self, commit: RoundCommit) -> anyhow::Result<Session>;
}

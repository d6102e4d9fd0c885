//! The game session engine.
//!
//! Public operation surface (create / list / detail / submit / stats) and
//! the session state machine: remaining-word bookkeeping, bidirectional
//! grading, and one-way termination.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::{
    Direction, Language, RoundAnswers, RoundOutcome, Session, SessionDetail, SessionRequest,
    SessionSummary, User, Word,
};
use crate::score::percentage;
use crate::selection;
use crate::stats::{self, StatRow};
use crate::traits::{GradedWord, RoundCommit, SessionStore, VocabularyStore};

/// Configuration for the game engine.
///
/// Passed to the constructor rather than held as module constants so tests
/// can vary the limits.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum simultaneously active sessions per user.
    pub max_active_sessions: usize,
    /// Hard mode keeps stat rows with a score at or below this percentage.
    pub hard_max_score: f64,
    /// Recap mode keeps stat rows with a score at or above this percentage.
    pub recap_min_score: f64,
    /// The learner's base language.
    pub user_language: Language,
    /// Target languages sessions may be created for.
    pub supported_languages: Vec<Language>,
    /// Fixed RNG seed for deterministic selection; `None` seeds from
    /// entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_active_sessions: 10,
            hard_max_score: 50.0,
            recap_min_score: 50.0,
            user_language: Language::new("english"),
            supported_languages: vec![Language::new("german"), Language::new("italian")],
            rng_seed: None,
        }
    }
}

/// The central game engine.
///
/// Every public operation is one logically-atomic transaction against the
/// stores; operations from different sessions or users may interleave
/// freely. Concurrent submissions to the *same* session are resolved by the
/// store's optimistic round check.
pub struct GameEngine {
    vocab: Arc<dyn VocabularyStore>,
    sessions: Arc<dyn SessionStore>,
    config: EngineConfig,
    rng: Mutex<StdRng>,
}

impl GameEngine {
    pub fn new(
        vocab: Arc<dyn VocabularyStore>,
        sessions: Arc<dyn SessionStore>,
        config: EngineConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            vocab,
            sessions,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a new session for the user.
    ///
    /// Fails with [`EngineError::UnsupportedLanguage`] for an unconfigured
    /// target language and [`EngineError::TooManySessions`] when the active
    /// quota is reached. Oversized word counts degrade gracefully; the
    /// returned detail carries the realized counts.
    pub async fn create_session(
        &self,
        user: &User,
        request: &SessionRequest,
    ) -> Result<SessionDetail, EngineError> {
        if !self.config.supported_languages.contains(&request.language) {
            return Err(EngineError::UnsupportedLanguage(request.language.clone()));
        }
        let active = self.sessions.count_active_sessions(user.id).await?;
        if active >= self.config.max_active_sessions {
            return Err(EngineError::TooManySessions {
                limit: self.config.max_active_sessions,
            });
        }

        let mut rng = self.rng.lock().await;
        let selection = selection::select_words(
            self.vocab.as_ref(),
            self.sessions.as_ref(),
            user.id,
            request,
            &self.config,
            &mut rng,
        )
        .await?;
        drop(rng);

        // An empty selection is a session that is already complete.
        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            language: request.language.clone(),
            n_vocabulary: selection.n_vocabulary,
            n_words_to_guess: selection.n_words_to_guess,
            n_correct_answers: 0,
            is_active: !selection.words.is_empty(),
            round: 0,
            created_at: Utc::now(),
        };
        self.sessions
            .insert_session(&session, &selection.words)
            .await?;

        tracing::info!(
            session = %session.id,
            user = %user.username,
            language = %session.language,
            mode = %request.mode,
            words = session.n_words_to_guess,
            "created session"
        );

        Ok(SessionDetail::build(&session, &selection.words))
    }

    /// The user's sessions, newest first.
    pub async fn list_sessions(
        &self,
        user: &User,
        active_only: bool,
    ) -> Result<Vec<SessionSummary>, EngineError> {
        let mut sessions = self.sessions.sessions_for_user(user.id, active_only).await?;
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions.iter().map(SessionSummary::from).collect())
    }

    /// Full view of one session.
    pub async fn session_detail(
        &self,
        user: &User,
        session_id: Uuid,
    ) -> Result<SessionDetail, EngineError> {
        let session = self
            .sessions
            .session_for_user(user.id, session_id)
            .await?
            .ok_or(EngineError::SessionNotFound)?;
        let remaining = self.sessions.remaining_words(session_id).await?;
        Ok(SessionDetail::build(&session, &remaining))
    }

    /// Grade one round of answers against a session.
    ///
    /// Questions that are not currently pending in their direction are
    /// ignored silently: stale and duplicate submissions are tolerated, not
    /// errors. All mutations of the call commit atomically or not at all.
    pub async fn submit_answers(
        &self,
        user: &User,
        session_id: Uuid,
        answers: &RoundAnswers,
    ) -> Result<(SessionDetail, RoundOutcome), EngineError> {
        let session = self
            .sessions
            .session_for_user(user.id, session_id)
            .await?
            .ok_or(EngineError::SessionNotFound)?;
        if !session.is_active {
            return Err(EngineError::SessionCompleted);
        }

        let remaining = self.sessions.remaining_words(session_id).await?;
        let mut pending_target: HashMap<String, Word> = HashMap::new();
        let mut pending_user: HashMap<String, Word> = HashMap::new();
        for word in remaining {
            let key = word.text.to_lowercase();
            match session.direction_of(&word) {
                Direction::FromTarget => pending_target.insert(key, word),
                Direction::FromUser => pending_user.insert(key, word),
            };
        }

        let mut graded: Vec<GradedWord> = Vec::new();
        let (valid_target, correct_target) = self
            .grade_direction(
                Direction::FromTarget,
                &session.language,
                &answers.from_target,
                &mut pending_target,
                &mut graded,
            )
            .await?;
        let (valid_user, correct_user) = self
            .grade_direction(
                Direction::FromUser,
                &session.language,
                &answers.from_user_language,
                &mut pending_user,
                &mut graded,
            )
            .await?;

        let n_valid = valid_target + valid_user;
        let n_correct = correct_target + correct_user;
        let complete = pending_target.is_empty() && pending_user.is_empty();

        // A round with no valid attempts changes nothing; skip the commit so
        // the call is a true no-op.
        let session = if graded.is_empty() {
            session
        } else {
            self.sessions
                .commit_round(RoundCommit {
                    session_id,
                    user_id: user.id,
                    language: session.language.clone(),
                    expected_round: session.round,
                    graded,
                    complete,
                })
                .await?
        };

        tracing::info!(
            session = %session.id,
            valid = n_valid,
            correct = n_correct,
            complete = !session.is_active,
            "graded answer round"
        );

        let remaining_after: Vec<Word> = pending_target
            .into_values()
            .chain(pending_user.into_values())
            .collect();
        let outcome = RoundOutcome {
            n_valid_attempts: n_valid,
            n_correct_answers: n_correct,
            round_score_percentage: percentage(n_correct, n_valid),
        };
        Ok((SessionDetail::build(&session, &remaining_after), outcome))
    }

    /// The user's per-word statistics, weakest words first.
    pub async fn list_stats(
        &self,
        user: &User,
        language: Option<&Language>,
    ) -> Result<Vec<StatRow>, EngineError> {
        let rows = self.sessions.stats_with_words(user.id, language).await?;
        let rows = stats::build_stat_rows(
            self.vocab.as_ref(),
            rows,
            &self.config.user_language,
            language,
        )
        .await?;
        Ok(rows)
    }

    /// Grade one direction's answer map against its pending questions.
    ///
    /// Matched entries are removed from `pending` and appended to `graded`;
    /// returns `(valid_attempts, correct_answers)`.
    async fn grade_direction(
        &self,
        direction: Direction,
        target_language: &Language,
        answers: &HashMap<String, String>,
        pending: &mut HashMap<String, Word>,
        graded: &mut Vec<GradedWord>,
    ) -> Result<(u32, u32), EngineError> {
        let mut n_valid = 0u32;
        let mut n_correct = 0u32;
        for (question, candidate) in answers {
            let question = question.to_lowercase();
            let candidate = candidate.to_lowercase();
            let Some(word) = pending.remove(&question) else {
                // Not pending in this direction: stale, duplicate, or junk.
                continue;
            };
            n_valid += 1;
            let correct = match direction {
                Direction::FromTarget => {
                    let translations = self.vocab.translations_of(word.id).await?;
                    translations.iter().any(|t| {
                        t.language == self.config.user_language
                            && t.text.to_lowercase() == candidate
                    })
                }
                Direction::FromUser => {
                    let sources = self.vocab.reverse_translations_of(word.id).await?;
                    sources.iter().any(|s| {
                        s.language == *target_language && s.text.to_lowercase() == candidate
                    })
                }
            };
            if correct {
                n_correct += 1;
            }
            graded.push(GradedWord {
                word_id: word.id,
                correct,
            });
        }
        Ok((n_valid, n_correct))
    }
}

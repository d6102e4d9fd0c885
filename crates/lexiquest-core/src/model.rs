//! Core data model types for lexiquest.
//!
//! These are the fundamental types that the entire lexiquest system uses to
//! represent vocabulary, sessions, and per-word statistics.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A lowercase language tag (e.g. "german", "english").
///
/// Any non-empty tag is a valid `Language`; whether it is *supported* is
/// decided by the engine configuration, not by the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub fn new(tag: &str) -> Self {
        Self(tag.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.is_empty() {
            return Err("empty language tag".to_string());
        }
        Ok(Language::new(tag))
    }
}

/// A single vocabulary word. Immutable after import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Unique identifier.
    pub id: Uuid,
    /// The word text.
    pub text: String,
    /// Language this word belongs to. The same text in two languages is a
    /// distinct `Word`.
    pub language: Language,
}

/// A directed edge of the word/translation graph.
///
/// Links a source word to one of its translations. Multiple links may share
/// either endpoint (synonyms and polysemy). A link never connects a word to
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationLink {
    pub word_id: Uuid,
    pub translation_id: Uuid,
    /// Frequency rank of the source word; lower means more common. Positive.
    pub frequency: u32,
}

/// An authenticated user, supplied by the identity collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// Which way a question is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Translate a target-language word into the user's language.
    FromTarget,
    /// Translate a user's-language word into the target language.
    FromUser,
}

/// Difficulty mode for word selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Random,
    Hard,
    Recap,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Random => write!(f, "random"),
            GameMode::Hard => write!(f, "hard"),
            GameMode::Recap => write!(f, "recap"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(GameMode::Random),
            "hard" => Ok(GameMode::Hard),
            "recap" => Ok(GameMode::Recap),
            other => Err(format!("unknown game mode: {other}")),
        }
    }
}

/// A game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The target language being learned.
    pub language: Language,
    /// Candidate pool size actually realized (≤ requested).
    pub n_vocabulary: u32,
    /// Session size actually realized (≤ `n_vocabulary`).
    pub n_words_to_guess: u32,
    /// Monotonically increasing count of correct answers.
    pub n_correct_answers: u32,
    /// One-way true → false.
    pub is_active: bool,
    /// Number of committed submission rounds; the optimistic concurrency
    /// token for `commit_round`.
    pub round: u32,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// The direction a word is asked in, derived from its language.
    pub fn direction_of(&self, word: &Word) -> Direction {
        if word.language == self.language {
            Direction::FromTarget
        } else {
            Direction::FromUser
        }
    }
}

/// Per-user, per-word rolling correctness counters.
///
/// Created on the first graded answer for the pair, incremented on every
/// subsequent one. Never decremented or deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stat {
    pub user_id: Uuid,
    pub word_id: Uuid,
    /// Target language of the session the word was first graded in.
    pub language: Language,
    pub n_appearances: u32,
    pub n_correct_answers: u32,
}

/// Parameters for creating a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub language: Language,
    pub n_words_to_guess: usize,
    pub n_vocabulary: usize,
    pub mode: GameMode,
    /// Percentage of questions asked from the user's language, 0..=100.
    pub direction_ratio: u8,
}

/// A user's view of one session, without the question lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub language: Language,
    pub n_words_to_guess: u32,
    pub n_vocabulary: u32,
    pub n_correct_answers: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            language: session.language.clone(),
            n_words_to_guess: session.n_words_to_guess,
            n_vocabulary: session.n_vocabulary,
            n_correct_answers: session.n_correct_answers,
            is_active: session.is_active,
            created_at: session.created_at,
        }
    }
}

/// Full session view: summary plus the pending question lists split by the
/// direction each word is asked in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: Uuid,
    pub language: Language,
    pub n_words_to_guess: u32,
    pub n_vocabulary: u32,
    pub n_correct_answers: u32,
    pub is_active: bool,
    pub n_remaining_words: u32,
    pub remaining_from_target: Vec<String>,
    pub remaining_from_user_language: Vec<String>,
    /// `None` until at least one word has been graded.
    pub session_score_percentage: Option<f64>,
}

impl SessionDetail {
    /// Build the detail view from a session row and its remaining words.
    pub fn build(session: &Session, remaining: &[Word]) -> Self {
        let mut from_target = Vec::new();
        let mut from_user = Vec::new();
        for word in remaining {
            match session.direction_of(word) {
                Direction::FromTarget => from_target.push(word.text.clone()),
                Direction::FromUser => from_user.push(word.text.clone()),
            }
        }
        let n_remaining = remaining.len() as u32;
        let n_answered = session.n_words_to_guess - n_remaining;
        Self {
            id: session.id,
            language: session.language.clone(),
            n_words_to_guess: session.n_words_to_guess,
            n_vocabulary: session.n_vocabulary,
            n_correct_answers: session.n_correct_answers,
            is_active: session.is_active,
            n_remaining_words: n_remaining,
            remaining_from_target: from_target,
            remaining_from_user_language: from_user,
            session_score_percentage: crate::score::percentage(
                session.n_correct_answers,
                n_answered,
            ),
        }
    }
}

/// One round of candidate translations, keyed by question text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundAnswers {
    /// Answers to "translate this target-language word".
    #[serde(default)]
    pub from_target: std::collections::HashMap<String, String>,
    /// Answers to "translate this word into the target language".
    #[serde(default)]
    pub from_user_language: std::collections::HashMap<String, String>,
}

/// Grading result of one submission round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Answers that matched a pending question (junk answers excluded).
    pub n_valid_attempts: u32,
    pub n_correct_answers: u32,
    /// `None` when the round contained no valid attempts.
    pub round_score_percentage: Option<f64>,
}

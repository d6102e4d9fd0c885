//! In-memory store with JSON snapshot persistence.
//!
//! All state lives behind one `RwLock`; every write method is one critical
//! section, which gives each store call the transactional behavior the
//! engine requires. `commit_round` additionally enforces an optimistic
//! round check so a concurrent submission to the same session fails as a
//! whole instead of double-grading.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexiquest_core::error::StoreError;
use lexiquest_core::model::{Language, Session, Stat, TranslationLink, Word};
use lexiquest_core::traits::{ResolvedLink, RoundCommit, SessionStore, VocabularyStore};

/// The serializable world state: everything the store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WorldState {
    pub words: HashMap<Uuid, Word>,
    pub links: Vec<TranslationLink>,
    pub sessions: HashMap<Uuid, Session>,
    /// Remaining-word entries per session. Entry exists for the session's
    /// lifetime; an empty set means the session is complete.
    pub remaining: HashMap<Uuid, HashSet<Uuid>>,
    /// Stats keyed user → word.
    pub stats: HashMap<Uuid, HashMap<Uuid, Stat>>,
}

/// Runtime edge indexes, rebuilt from the world state rather than
/// serialized: positions into `WorldState::links` per endpoint, plus a
/// (language, text) word lookup used by pack import.
#[derive(Debug, Default)]
struct Indexes {
    outgoing: HashMap<Uuid, Vec<usize>>,
    incoming: HashMap<Uuid, Vec<usize>>,
    by_text: HashMap<(Language, String), Uuid>,
}

impl Indexes {
    fn rebuild(state: &WorldState) -> Self {
        let mut indexes = Self::default();
        for word in state.words.values() {
            indexes
                .by_text
                .insert((word.language.clone(), word.text.clone()), word.id);
        }
        for (pos, link) in state.links.iter().enumerate() {
            indexes.outgoing.entry(link.word_id).or_default().push(pos);
            indexes
                .incoming
                .entry(link.translation_id)
                .or_default()
                .push(pos);
        }
        indexes
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: WorldState,
    indexes: Indexes,
}

/// In-memory implementation of both repository traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vocabulary word. Idempotent on (language, text): inserting
    /// an existing pair returns the existing word's id.
    pub fn insert_word(&self, text: &str, language: Language) -> Result<Uuid> {
        let text = text.trim().to_lowercase();
        anyhow::ensure!(!text.is_empty(), "word text must not be empty");
        let mut inner = self.inner.write().expect("store lock poisoned");
        let key = (language.clone(), text.clone());
        if let Some(id) = inner.indexes.by_text.get(&key) {
            return Ok(*id);
        }
        let word = Word {
            id: Uuid::new_v4(),
            text,
            language,
        };
        inner.indexes.by_text.insert(key, word.id);
        inner.state.words.insert(word.id, word.clone());
        Ok(word.id)
    }

    /// Insert a translation link between two existing words.
    pub fn insert_link(&self, word_id: Uuid, translation_id: Uuid, frequency: u32) -> Result<()> {
        anyhow::ensure!(
            word_id != translation_id,
            "a link must not connect a word to itself"
        );
        anyhow::ensure!(frequency > 0, "frequency must be a positive integer");
        let mut inner = self.inner.write().expect("store lock poisoned");
        if !inner.state.words.contains_key(&word_id) {
            return Err(StoreError::UnknownWord(word_id).into());
        }
        if !inner.state.words.contains_key(&translation_id) {
            return Err(StoreError::UnknownWord(translation_id).into());
        }
        let pos = inner.state.links.len();
        inner.state.links.push(TranslationLink {
            word_id,
            translation_id,
            frequency,
        });
        inner.indexes.outgoing.entry(word_id).or_default().push(pos);
        inner
            .indexes
            .incoming
            .entry(translation_id)
            .or_default()
            .push(pos);
        Ok(())
    }

    /// Number of words currently in the vocabulary.
    pub fn word_count(&self) -> usize {
        self.inner
            .read()
            .expect("store lock poisoned")
            .state
            .words
            .len()
    }

    /// Save the whole world state as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let inner = self.inner.read().expect("store lock poisoned");
        let json = serde_json::to_string_pretty(&inner.state)
            .context("failed to serialize store state")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write store state to {}", path.display()))?;
        Ok(())
    }

    /// Load a store from a JSON snapshot, rebuilding the edge indexes.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read store state from {}", path.display()))?;
        let state: WorldState =
            serde_json::from_str(&content).context("failed to parse store state JSON")?;
        let indexes = Indexes::rebuild(&state);
        Ok(Self {
            inner: RwLock::new(Inner { state, indexes }),
        })
    }

    pub(crate) fn lookup_word(&self, language: &Language, text: &str) -> Option<Uuid> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .indexes
            .by_text
            .get(&(language.clone(), text.to_lowercase()))
            .copied()
    }
}

#[async_trait]
impl VocabularyStore for MemoryStore {
    async fn links_by_frequency(
        &self,
        language: &Language,
        limit: usize,
    ) -> Result<Vec<ResolvedLink>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut resolved: Vec<ResolvedLink> = inner
            .state
            .links
            .iter()
            .filter_map(|link| {
                let word = inner.state.words.get(&link.word_id)?;
                if word.language != *language {
                    return None;
                }
                let translation = inner.state.words.get(&link.translation_id)?;
                Some(ResolvedLink {
                    word: word.clone(),
                    translation: translation.clone(),
                    frequency: link.frequency,
                })
            })
            .collect();
        resolved.sort_by_key(|link| link.frequency);
        resolved.truncate(limit);
        Ok(resolved)
    }

    async fn translations_of(&self, word_id: Uuid) -> Result<Vec<Word>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let positions = inner.indexes.outgoing.get(&word_id);
        Ok(positions
            .into_iter()
            .flatten()
            .filter_map(|&pos| {
                let link = &inner.state.links[pos];
                inner.state.words.get(&link.translation_id).cloned()
            })
            .collect())
    }

    async fn reverse_translations_of(&self, word_id: Uuid) -> Result<Vec<Word>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let positions = inner.indexes.incoming.get(&word_id);
        Ok(positions
            .into_iter()
            .flatten()
            .filter_map(|&pos| {
                let link = &inner.state.links[pos];
                inner.state.words.get(&link.word_id).cloned()
            })
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: &Session, words: &[Word]) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        for word in words {
            if !inner.state.words.contains_key(&word.id) {
                return Err(StoreError::UnknownWord(word.id).into());
            }
        }
        let entries: HashSet<Uuid> = words.iter().map(|w| w.id).collect();
        inner.state.remaining.insert(session.id, entries);
        inner.state.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn count_active_sessions(&self, user_id: Uuid) -> Result<usize> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active)
            .count())
    }

    async fn sessions_for_user(&self, user_id: Uuid, active_only: bool) -> Result<Vec<Session>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && (!active_only || s.is_active))
            .cloned()
            .collect())
    }

    async fn session_for_user(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<Session>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .state
            .sessions
            .get(&session_id)
            .filter(|s| s.user_id == user_id)
            .cloned())
    }

    async fn remaining_words(&self, session_id: Uuid) -> Result<Vec<Word>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let Some(entries) = inner.state.remaining.get(&session_id) else {
            return Err(StoreError::UnknownSession(session_id).into());
        };
        Ok(entries
            .iter()
            .filter_map(|id| inner.state.words.get(id).cloned())
            .collect())
    }

    async fn stats_with_words(
        &self,
        user_id: Uuid,
        language: Option<&Language>,
    ) -> Result<Vec<(Stat, Word)>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let Some(user_stats) = inner.state.stats.get(&user_id) else {
            return Ok(Vec::new());
        };
        Ok(user_stats
            .values()
            .filter(|stat| language.map_or(true, |l| stat.language == *l))
            .filter_map(|stat| {
                let word = inner.state.words.get(&stat.word_id)?;
                Some((stat.clone(), word.clone()))
            })
            .collect())
    }

    async fn commit_round(&self, commit: RoundCommit) -> Result<Session> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let inner = &mut *inner;

        let Some(session) = inner.state.sessions.get_mut(&commit.session_id) else {
            return Err(StoreError::UnknownSession(commit.session_id).into());
        };
        if session.round != commit.expected_round {
            return Err(StoreError::Conflict(commit.session_id).into());
        }

        let remaining = inner
            .state
            .remaining
            .entry(commit.session_id)
            .or_default();
        let user_stats = inner.state.stats.entry(commit.user_id).or_default();
        let mut n_correct = 0u32;
        for graded in &commit.graded {
            remaining.remove(&graded.word_id);
            if graded.correct {
                n_correct += 1;
            }
            user_stats
                .entry(graded.word_id)
                .and_modify(|stat| {
                    stat.n_appearances += 1;
                    stat.n_correct_answers += u32::from(graded.correct);
                })
                .or_insert_with(|| Stat {
                    user_id: commit.user_id,
                    word_id: graded.word_id,
                    language: commit.language.clone(),
                    n_appearances: 1,
                    n_correct_answers: u32::from(graded.correct),
                });
        }

        session.n_correct_answers += n_correct;
        session.round += 1;
        if commit.complete {
            session.is_active = false;
        }
        tracing::debug!(
            session = %session.id,
            round = session.round,
            correct = n_correct,
            active = session.is_active,
            "committed round"
        );
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lexiquest_core::traits::GradedWord;

    fn store_with_pair() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::new();
        let hund = store.insert_word("hund", Language::new("german")).unwrap();
        let dog = store.insert_word("dog", Language::new("english")).unwrap();
        store.insert_link(hund, dog, 1).unwrap();
        (store, hund, dog)
    }

    fn session_for(user_id: Uuid, n_words: u32) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id,
            language: Language::new("german"),
            n_vocabulary: n_words,
            n_words_to_guess: n_words,
            n_correct_answers: 0,
            is_active: true,
            round: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_word_is_idempotent_per_language() {
        let store = MemoryStore::new();
        let a = store.insert_word("Hund", Language::new("german")).unwrap();
        let b = store.insert_word("hund ", Language::new("german")).unwrap();
        let c = store.insert_word("hund", Language::new("italian")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.word_count(), 2);
    }

    #[test]
    fn self_link_and_zero_frequency_are_rejected() {
        let store = MemoryStore::new();
        let hund = store.insert_word("hund", Language::new("german")).unwrap();
        let dog = store.insert_word("dog", Language::new("english")).unwrap();
        assert!(store.insert_link(hund, hund, 1).is_err());
        assert!(store.insert_link(hund, dog, 0).is_err());
        assert!(store.insert_link(hund, Uuid::new_v4(), 1).is_err());
    }

    #[tokio::test]
    async fn graph_queries_resolve_both_directions() {
        let (store, hund, dog) = store_with_pair();
        let out = store.translations_of(hund).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "dog");
        let back = store.reverse_translations_of(dog).await.unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].text, "hund");
    }

    #[tokio::test]
    async fn links_by_frequency_orders_and_limits() {
        let store = MemoryStore::new();
        let german = Language::new("german");
        let english = Language::new("english");
        for (text, translation, freq) in [("drei", "three", 3), ("eins", "one", 1), ("zwei", "two", 2)]
        {
            let w = store.insert_word(text, german.clone()).unwrap();
            let t = store.insert_word(translation, english.clone()).unwrap();
            store.insert_link(w, t, freq).unwrap();
        }
        let links = store.links_by_frequency(&german, 2).await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].word.text, "eins");
        assert_eq!(links[1].word.text, "zwei");
    }

    #[tokio::test]
    async fn commit_round_rejects_stale_round() {
        let (store, hund, _) = store_with_pair();
        let user_id = Uuid::new_v4();
        let session = session_for(user_id, 1);
        let word = Word {
            id: hund,
            text: "hund".into(),
            language: Language::new("german"),
        };
        store.insert_session(&session, &[word]).await.unwrap();

        let commit = RoundCommit {
            session_id: session.id,
            user_id,
            language: session.language.clone(),
            expected_round: 0,
            graded: vec![GradedWord {
                word_id: hund,
                correct: true,
            }],
            complete: true,
        };
        store.commit_round(commit.clone()).await.unwrap();

        // Same expected round again: the optimistic check must fail.
        let err = store.commit_round(commit).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn commit_round_upserts_stats_and_completes() {
        let (store, hund, _) = store_with_pair();
        let user_id = Uuid::new_v4();
        let session = session_for(user_id, 1);
        let word = Word {
            id: hund,
            text: "hund".into(),
            language: Language::new("german"),
        };
        store.insert_session(&session, &[word]).await.unwrap();

        let updated = store
            .commit_round(RoundCommit {
                session_id: session.id,
                user_id,
                language: session.language.clone(),
                expected_round: 0,
                graded: vec![GradedWord {
                    word_id: hund,
                    correct: true,
                }],
                complete: true,
            })
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.n_correct_answers, 1);
        assert_eq!(updated.round, 1);

        let stats = store.stats_with_words(user_id, None).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].0.n_appearances, 1);
        assert_eq!(stats[0].0.n_correct_answers, 1);
        assert!(store
            .remaining_words(session.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn snapshot_roundtrip_preserves_state() {
        let (store, hund, _) = store_with_pair();
        let user_id = Uuid::new_v4();
        let session = session_for(user_id, 1);
        let word = Word {
            id: hund,
            text: "hund".into(),
            language: Language::new("german"),
        };
        store.insert_session(&session, &[word]).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        store.save_json(&path).unwrap();

        let restored = MemoryStore::load_json(&path).unwrap();
        assert_eq!(restored.word_count(), 2);
        let found = restored
            .session_for_user(user_id, session.id)
            .await
            .unwrap();
        assert!(found.is_some());
        let out = restored.translations_of(hund).await.unwrap();
        assert_eq!(out.len(), 1);
    }
}

//! Word selection for new sessions.
//!
//! Builds the concrete word set for a session under a difficulty mode and a
//! direction ratio. Requests larger than the available vocabulary or stat
//! history never fail; the realized counts are reported back instead.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::engine::EngineConfig;
use crate::model::{GameMode, SessionRequest, Stat, Word};
use crate::traits::{SessionStore, VocabularyStore};

/// The outcome of word selection: the session's word set and the realized
/// counts.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected words, already shuffled. Contains no duplicates.
    pub words: Vec<Word>,
    /// Candidate pool size actually realized.
    pub n_vocabulary: u32,
    /// Word count actually realized, ≤ `n_vocabulary`.
    pub n_words_to_guess: u32,
}

/// Split a request into per-direction counts.
///
/// `ratio` is the percentage of questions asked from the user's language;
/// values above 100 are clamped. Returns `(n_from_user, n_from_target)`.
pub fn split_directions(n_requested: usize, ratio: u8) -> (usize, usize) {
    let ratio = f64::from(ratio.min(100));
    let n_from_user = (n_requested as f64 * ratio / 100.0).round() as usize;
    (n_from_user, n_requested - n_from_user)
}

/// Whether a stat row is eligible for the given difficulty mode.
///
/// Compares the unrounded score against the thresholds; display rounding
/// must not widen the eligible set.
pub fn mode_accepts(mode: GameMode, stat: &Stat, config: &EngineConfig) -> bool {
    if stat.n_appearances == 0 {
        return false;
    }
    let score = 100.0 * f64::from(stat.n_correct_answers) / f64::from(stat.n_appearances);
    match mode {
        GameMode::Random => true,
        GameMode::Hard => score <= config.hard_max_score,
        GameMode::Recap => score >= config.recap_min_score,
    }
}

/// Select the words for a new session.
pub async fn select_words(
    vocab: &dyn VocabularyStore,
    sessions: &dyn SessionStore,
    user_id: Uuid,
    request: &SessionRequest,
    config: &EngineConfig,
    rng: &mut StdRng,
) -> anyhow::Result<Selection> {
    let n_requested = request.n_words_to_guess.min(request.n_vocabulary);
    let (mut n_from_user, mut n_from_target) =
        split_directions(n_requested, request.direction_ratio);

    let mut chosen: Vec<Word> = Vec::with_capacity(n_requested);
    let mut chosen_ids: HashSet<Uuid> = HashSet::new();

    // Hard and recap draw from the user's history first, per direction.
    if matches!(request.mode, GameMode::Hard | GameMode::Recap) {
        let stats = sessions
            .stats_with_words(user_id, Some(&request.language))
            .await?;
        let mut target_pool = Vec::new();
        let mut user_pool = Vec::new();
        for (stat, word) in stats {
            if !mode_accepts(request.mode, &stat, config) {
                continue;
            }
            if word.language == request.language {
                target_pool.push(word);
            } else {
                user_pool.push(word);
            }
        }
        user_pool.shuffle(rng);
        for word in user_pool {
            if n_from_user == 0 {
                break;
            }
            if chosen_ids.insert(word.id) {
                chosen.push(word);
                n_from_user -= 1;
            }
        }
        target_pool.shuffle(rng);
        for word in target_pool {
            if n_from_target == 0 {
                break;
            }
            if chosen_ids.insert(word.id) {
                chosen.push(word);
                n_from_target -= 1;
            }
        }
    }

    // Top up any under-supplied direction from the most common links of the
    // target language. The pool size is what the realized vocabulary count
    // reports.
    let mut pool_size = 0usize;
    if n_from_target + n_from_user > 0 {
        let links = vocab
            .links_by_frequency(&request.language, request.n_vocabulary)
            .await?;
        pool_size = links.len();

        if n_from_target > 0 {
            let mut candidates: Vec<Word> = links.iter().map(|l| l.word.clone()).collect();
            candidates.shuffle(rng);
            for word in candidates {
                if n_from_target == 0 {
                    break;
                }
                if chosen_ids.insert(word.id) {
                    chosen.push(word);
                    n_from_target -= 1;
                }
            }
        }
        if n_from_user > 0 {
            let mut candidates: Vec<Word> = links.iter().map(|l| l.translation.clone()).collect();
            candidates.shuffle(rng);
            for word in candidates {
                if n_from_user == 0 {
                    break;
                }
                if chosen_ids.insert(word.id) {
                    chosen.push(word);
                    n_from_user -= 1;
                }
            }
        }
    }

    let n_words_to_guess = chosen.len();
    let n_vocabulary = pool_size.max(n_words_to_guess);
    chosen.shuffle(rng);

    tracing::debug!(
        mode = %request.mode,
        requested = n_requested,
        realized = n_words_to_guess,
        pool = n_vocabulary,
        "selected words for new session"
    );

    Ok(Selection {
        words: chosen,
        n_vocabulary: n_vocabulary as u32,
        n_words_to_guess: n_words_to_guess as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    fn stat(correct: u32, appearances: u32) -> Stat {
        Stat {
            user_id: Uuid::new_v4(),
            word_id: Uuid::new_v4(),
            language: Language::new("german"),
            n_appearances: appearances,
            n_correct_answers: correct,
        }
    }

    #[test]
    fn split_rounds_the_user_share() {
        assert_eq!(split_directions(10, 0), (0, 10));
        assert_eq!(split_directions(10, 100), (10, 0));
        assert_eq!(split_directions(10, 50), (5, 5));
        // 15 * 33% = 4.95 → rounds to 5
        assert_eq!(split_directions(15, 33), (5, 10));
        assert_eq!(split_directions(0, 50), (0, 0));
    }

    #[test]
    fn split_clamps_ratio_above_100() {
        assert_eq!(split_directions(10, 250), (10, 0));
    }

    #[test]
    fn hard_accepts_at_most_half_score() {
        let config = EngineConfig::default();
        assert!(mode_accepts(GameMode::Hard, &stat(1, 2), &config));
        assert!(mode_accepts(GameMode::Hard, &stat(0, 4), &config));
        assert!(!mode_accepts(GameMode::Hard, &stat(3, 4), &config));
    }

    #[test]
    fn recap_accepts_at_least_half_score() {
        let config = EngineConfig::default();
        assert!(mode_accepts(GameMode::Recap, &stat(1, 2), &config));
        assert!(mode_accepts(GameMode::Recap, &stat(4, 4), &config));
        assert!(!mode_accepts(GameMode::Recap, &stat(1, 4), &config));
    }

    #[test]
    fn thresholds_compare_unrounded_scores() {
        let config = EngineConfig::default();
        // 5000/9999 is 50.005%; two-decimal rounding would display 50.0,
        // but the word is above the hard threshold.
        assert!(!mode_accepts(GameMode::Hard, &stat(5000, 9999), &config));
        assert!(mode_accepts(GameMode::Recap, &stat(5000, 9999), &config));
        // 4999/9999 is 49.995%, below the threshold.
        assert!(mode_accepts(GameMode::Hard, &stat(4999, 9999), &config));
        assert!(!mode_accepts(GameMode::Recap, &stat(4999, 9999), &config));
    }

    #[test]
    fn stats_with_no_appearances_are_never_eligible() {
        let config = EngineConfig::default();
        assert!(!mode_accepts(GameMode::Hard, &stat(0, 0), &config));
        assert!(!mode_accepts(GameMode::Recap, &stat(0, 0), &config));
    }
}

//! Stat reporting views.
//!
//! Turns raw (stat, word) pairs into rows with their reachable translations
//! resolved, ordered so the weakest known words surface first.

use serde::{Deserialize, Serialize};

use crate::model::{Direction, Language, Stat, Word};
use crate::score::percentage;
use crate::traits::VocabularyStore;

/// One row of the per-user statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatRow {
    pub word_text: String,
    /// Language the word itself belongs to.
    pub language: Language,
    /// The language on the other side of the word's links.
    pub counterpart_language: Language,
    /// Which way this word is asked in sessions.
    pub direction: Direction,
    /// Accepted translation texts for the word.
    pub reachable_translations: Vec<String>,
    pub n_appearances: u32,
    pub n_correct_answers: u32,
    pub score_percentage: Option<f64>,
}

/// Resolve stat pairs into report rows and order them.
///
/// With a language filter the order is: from-target rows first, then
/// ascending score, then alphabetical word text. Without a filter rows are
/// ordered by ascending score, then descending appearances.
pub async fn build_stat_rows(
    vocab: &dyn VocabularyStore,
    stats: Vec<(Stat, Word)>,
    user_language: &Language,
    language_filter: Option<&Language>,
) -> anyhow::Result<Vec<StatRow>> {
    let mut rows = Vec::with_capacity(stats.len());
    for (stat, word) in stats {
        let direction = if word.language == stat.language {
            Direction::FromTarget
        } else {
            Direction::FromUser
        };
        let (counterpart, reachable) = match direction {
            Direction::FromTarget => {
                let translations = vocab.translations_of(stat.word_id).await?;
                let texts = translations
                    .into_iter()
                    .filter(|w| w.language == *user_language)
                    .map(|w| w.text)
                    .collect();
                (user_language.clone(), texts)
            }
            Direction::FromUser => {
                let sources = vocab.reverse_translations_of(stat.word_id).await?;
                let texts = sources
                    .into_iter()
                    .filter(|w| w.language == stat.language)
                    .map(|w| w.text)
                    .collect();
                (stat.language.clone(), texts)
            }
        };
        rows.push(StatRow {
            word_text: word.text,
            language: word.language,
            counterpart_language: counterpart,
            direction,
            reachable_translations: reachable,
            n_appearances: stat.n_appearances,
            n_correct_answers: stat.n_correct_answers,
            score_percentage: percentage(stat.n_correct_answers, stat.n_appearances),
        });
    }

    let score_key = |row: &StatRow| row.score_percentage.unwrap_or(f64::INFINITY);
    if language_filter.is_some() {
        rows.sort_by(|a, b| {
            direction_rank(a.direction)
                .cmp(&direction_rank(b.direction))
                .then_with(|| score_key(a).total_cmp(&score_key(b)))
                .then_with(|| a.word_text.cmp(&b.word_text))
        });
    } else {
        rows.sort_by(|a, b| {
            score_key(a)
                .total_cmp(&score_key(b))
                .then_with(|| b.n_appearances.cmp(&a.n_appearances))
        });
    }
    Ok(rows)
}

fn direction_rank(direction: Direction) -> u8 {
    match direction {
        Direction::FromTarget => 0,
        Direction::FromUser => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use uuid::Uuid;

    /// Fixture vocabulary: explicit adjacency maps, no ordering logic.
    struct FixtureVocab {
        outgoing: HashMap<Uuid, Vec<Word>>,
        incoming: HashMap<Uuid, Vec<Word>>,
    }

    #[async_trait]
    impl VocabularyStore for FixtureVocab {
        async fn links_by_frequency(
            &self,
            _language: &Language,
            _limit: usize,
        ) -> anyhow::Result<Vec<crate::traits::ResolvedLink>> {
            Ok(Vec::new())
        }

        async fn translations_of(&self, word_id: Uuid) -> anyhow::Result<Vec<Word>> {
            Ok(self.outgoing.get(&word_id).cloned().unwrap_or_default())
        }

        async fn reverse_translations_of(&self, word_id: Uuid) -> anyhow::Result<Vec<Word>> {
            Ok(self.incoming.get(&word_id).cloned().unwrap_or_default())
        }
    }

    fn word(text: &str, language: &str) -> Word {
        Word {
            id: Uuid::new_v4(),
            text: text.into(),
            language: Language::new(language),
        }
    }

    fn stat_for(word: &Word, language: &str, correct: u32, appearances: u32) -> Stat {
        Stat {
            user_id: Uuid::new_v4(),
            word_id: word.id,
            language: Language::new(language),
            n_appearances: appearances,
            n_correct_answers: correct,
        }
    }

    #[tokio::test]
    async fn filtered_rows_order_direction_then_score_then_text() {
        let hund = word("hund", "german");
        let katze = word("katze", "german");
        let dog = word("dog", "english");
        let vocab = FixtureVocab {
            outgoing: HashMap::from([
                (hund.id, vec![word("dog", "english")]),
                (katze.id, vec![word("cat", "english")]),
            ]),
            incoming: HashMap::from([(dog.id, vec![word("hund", "german")])]),
        };

        let german = Language::new("german");
        let english = Language::new("english");
        let stats = vec![
            (stat_for(&dog, "german", 0, 2), dog.clone()),
            (stat_for(&katze, "german", 1, 2), katze.clone()),
            (stat_for(&hund, "german", 1, 4), hund.clone()),
        ];
        let rows = build_stat_rows(&vocab, stats, &english, Some(&german))
            .await
            .unwrap();

        // From-target rows first (hund 25% before katze 50%), then the
        // from-user row.
        let texts: Vec<&str> = rows.iter().map(|r| r.word_text.as_str()).collect();
        assert_eq!(texts, vec!["hund", "katze", "dog"]);
        assert_eq!(rows[0].direction, Direction::FromTarget);
        assert_eq!(rows[2].direction, Direction::FromUser);
        assert_eq!(rows[0].reachable_translations, vec!["dog".to_string()]);
        assert_eq!(rows[2].reachable_translations, vec!["hund".to_string()]);
        assert_eq!(rows[2].counterpart_language, german);
    }

    #[tokio::test]
    async fn unfiltered_rows_order_score_then_appearances() {
        let hund = word("hund", "german");
        let katze = word("katze", "german");
        let vocab = FixtureVocab {
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        };
        let english = Language::new("english");
        let stats = vec![
            (stat_for(&katze, "german", 2, 4), katze.clone()),
            (stat_for(&hund, "german", 1, 8), hund.clone()),
        ];
        let rows = build_stat_rows(&vocab, stats, &english, None).await.unwrap();
        assert_eq!(rows[0].word_text, "hund"); // 12.5% before 50%
        assert_eq!(rows[0].score_percentage, Some(12.5));
    }
}

//! TOML vocabulary pack parser and import.
//!
//! A pack carries the words of one target language together with their
//! translations into the learner's language and a frequency rank per word.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use lexiquest_core::model::Language;

use crate::memory::MemoryStore;

/// Intermediate TOML structure for parsing pack files.
#[derive(Debug, Deserialize)]
struct TomlPackFile {
    pack: TomlPackHeader,
    #[serde(default)]
    words: Vec<TomlPackWord>,
}

#[derive(Debug, Deserialize)]
struct TomlPackHeader {
    name: String,
    language: String,
    #[serde(default = "default_translation_language")]
    translation_language: String,
}

fn default_translation_language() -> String {
    "english".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlPackWord {
    text: String,
    frequency: u32,
    translations: Vec<String>,
}

/// A validated vocabulary pack.
#[derive(Debug, Clone)]
pub struct VocabularyPack {
    pub name: String,
    /// The target language the pack teaches.
    pub language: Language,
    /// The learner's language of the translation texts.
    pub translation_language: Language,
    pub words: Vec<PackWord>,
}

#[derive(Debug, Clone)]
pub struct PackWord {
    pub text: String,
    pub frequency: u32,
    pub translations: Vec<String>,
}

/// Counts reported back after importing a pack.
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub n_words: usize,
    pub n_links: usize,
}

/// Parse a single TOML file into a `VocabularyPack`.
pub fn parse_pack(path: &Path) -> Result<VocabularyPack> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary pack: {}", path.display()))?;
    parse_pack_str(&content, path)
}

/// Parse a TOML string into a `VocabularyPack` (useful for testing).
pub fn parse_pack_str(content: &str, source_path: &Path) -> Result<VocabularyPack> {
    let parsed: TomlPackFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let language: Language = parsed
        .pack
        .language
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;
    let translation_language: Language = parsed
        .pack
        .translation_language
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;
    anyhow::ensure!(
        language != translation_language,
        "pack language and translation language must differ"
    );

    let mut seen = HashSet::new();
    let mut words = Vec::with_capacity(parsed.words.len());
    for entry in parsed.words {
        let text = entry.text.trim().to_lowercase();
        anyhow::ensure!(!text.is_empty(), "pack contains a word with empty text");
        anyhow::ensure!(
            entry.frequency > 0,
            "word '{text}' has a non-positive frequency"
        );
        anyhow::ensure!(
            seen.insert(text.clone()),
            "duplicate word '{text}' in pack"
        );
        anyhow::ensure!(
            !entry.translations.is_empty(),
            "word '{text}' has no translations"
        );
        let translations: Vec<String> = entry
            .translations
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        anyhow::ensure!(
            !translations.is_empty(),
            "word '{text}' has only empty translations"
        );
        words.push(PackWord {
            text,
            frequency: entry.frequency,
            translations,
        });
    }

    Ok(VocabularyPack {
        name: parsed.pack.name,
        language,
        translation_language,
        words,
    })
}

impl MemoryStore {
    /// Import a pack: one word per entry, one shared word per distinct
    /// translation text, and a link per (word, translation) pair.
    pub fn import_pack(&self, pack: &VocabularyPack) -> Result<ImportSummary> {
        let mut n_links = 0usize;
        for entry in &pack.words {
            let word_id = self.insert_word(&entry.text, pack.language.clone())?;
            for translation in &entry.translations {
                let translation_id =
                    self.insert_word(translation, pack.translation_language.clone())?;
                self.insert_link(word_id, translation_id, entry.frequency)
                    .with_context(|| format!("importing word '{}'", entry.text))?;
                n_links += 1;
            }
        }
        let summary = ImportSummary {
            n_words: pack.words.len(),
            n_links,
        };
        tracing::info!(
            pack = %pack.name,
            language = %pack.language,
            words = summary.n_words,
            links = summary.n_links,
            "imported vocabulary pack"
        );
        Ok(summary)
    }
}

//! The `lexiquest stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexiquest_core::model::Language;

use crate::config;

pub async fn execute(language: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let cli_config = config::load_config_from(config_path.as_deref())?;
    let store = config::open_store(&cli_config)?;
    let engine = config::build_engine(&cli_config, store, None);
    let user = cli_config.user();

    let language = language.map(|l| Language::new(&l));
    let rows = engine.list_stats(&user, language.as_ref()).await?;
    if rows.is_empty() {
        println!("No stats yet. Play a session first.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Word",
        "Language",
        "Translations",
        "Seen",
        "Correct",
        "Score",
    ]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(&row.word_text),
            Cell::new(&row.language),
            Cell::new(row.reachable_translations.join(", ")),
            Cell::new(row.n_appearances),
            Cell::new(row.n_correct_answers),
            Cell::new(
                row.score_percentage
                    .map(|s| format!("{s:.2}%"))
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}

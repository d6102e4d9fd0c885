//! The `lexiquest sessions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::config;

pub async fn execute(active_only: bool, config_path: Option<PathBuf>) -> Result<()> {
    let cli_config = config::load_config_from(config_path.as_deref())?;
    let store = config::open_store(&cli_config)?;
    let engine = config::build_engine(&cli_config, store, None);
    let user = cli_config.user();

    let sessions = engine.list_sessions(&user, active_only).await?;
    if sessions.is_empty() {
        println!("No sessions yet. Run `lexiquest play` to start one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Language", "Words", "Correct", "Active", "Created"]);
    for session in &sessions {
        table.add_row(vec![
            Cell::new(session.id),
            Cell::new(&session.language),
            Cell::new(format!(
                "{} / {}",
                session.n_words_to_guess, session.n_vocabulary
            )),
            Cell::new(session.n_correct_answers),
            Cell::new(if session.is_active { "yes" } else { "no" }),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
    Ok(())
}

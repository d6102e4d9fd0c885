//! The `lexiquest import` command.

use std::path::PathBuf;

use anyhow::Result;

use crate::config;

pub fn execute(pack_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let cli_config = config::load_config_from(config_path.as_deref())?;
    let store = config::open_store(&cli_config)?;

    let pack = lexiquest_store::parse_pack(&pack_path)?;
    let summary = store.import_pack(&pack)?;
    store.save_json(&cli_config.state_file)?;

    println!(
        "Imported '{}': {} words, {} links ({} words in store)",
        pack.name,
        summary.n_words,
        summary.n_links,
        store.word_count()
    );
    Ok(())
}

//! The `lexiquest validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(pack_path: PathBuf) -> Result<()> {
    let pack = lexiquest_store::parse_pack(&pack_path)?;

    let n_links: usize = pack.words.iter().map(|w| w.translations.len()).sum();
    println!(
        "Pack: {} — {} → {} ({} words, {} translations)",
        pack.name, pack.language, pack.translation_language, pack.words.len(), n_links
    );
    println!("Pack is valid.");

    Ok(())
}

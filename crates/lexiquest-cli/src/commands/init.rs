//! The `lexiquest init` command.

use anyhow::Result;
use uuid::Uuid;

use crate::config::DEFAULT_CONFIG_FILE;

pub fn execute() -> Result<()> {
    if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
        println!("{DEFAULT_CONFIG_FILE} already exists, skipping.");
    } else {
        let config = SAMPLE_CONFIG.replace("{user_id}", &Uuid::new_v4().to_string());
        std::fs::write(DEFAULT_CONFIG_FILE, config)?;
        println!("Created {DEFAULT_CONFIG_FILE}");
    }

    std::fs::create_dir_all("packs")?;
    let example_path = std::path::Path::new("packs/german-starter.toml");
    if example_path.exists() {
        println!("packs/german-starter.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PACK)?;
        println!("Created packs/german-starter.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit {DEFAULT_CONFIG_FILE} with your username and languages");
    println!("  2. Run: lexiquest validate --pack packs/german-starter.toml");
    println!("  3. Run: lexiquest import --pack packs/german-starter.toml");
    println!("  4. Run: lexiquest play --language german");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lexiquest configuration

username = "learner"
user_id = "{user_id}"
state_file = "lexiquest-state.json"
user_language = "english"
supported_languages = ["german", "italian"]
max_active_sessions = 10
"#;

const EXAMPLE_PACK: &str = r#"[pack]
name = "German Starter"
language = "german"
translation_language = "english"

[[words]]
text = "hund"
frequency = 1
translations = ["dog", "hound"]

[[words]]
text = "katze"
frequency = 2
translations = ["cat"]

[[words]]
text = "haus"
frequency = 3
translations = ["house"]

[[words]]
text = "wasser"
frequency = 4
translations = ["water"]

[[words]]
text = "brot"
frequency = 5
translations = ["bread"]

[[words]]
text = "schloss"
frequency = 6
translations = ["castle", "lock"]

[[words]]
text = "burg"
frequency = 7
translations = ["castle"]

[[words]]
text = "baum"
frequency = 8
translations = ["tree"]
"#;

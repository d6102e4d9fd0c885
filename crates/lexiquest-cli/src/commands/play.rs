//! The `lexiquest play` command: one interactive answer round.

use std::io::{self, BufRead, Lines, StdinLock, Write};
use std::path::PathBuf;

use anyhow::Result;
use uuid::Uuid;

use lexiquest_core::model::{GameMode, Language, RoundAnswers, SessionRequest};

use crate::config;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    language: String,
    mode: String,
    words: usize,
    vocabulary: usize,
    ratio: u8,
    seed: Option<u64>,
    session: Option<Uuid>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let cli_config = config::load_config_from(config_path.as_deref())?;
    let store = config::open_store(&cli_config)?;
    let engine = config::build_engine(&cli_config, store.clone(), seed);
    let user = cli_config.user();

    let detail = match session {
        Some(id) => {
            let detail = engine.session_detail(&user, id).await?;
            // The original mode is not stored, so the banner omits it.
            println!(
                "Session {} — {}, {} of {} words",
                detail.id, detail.language, detail.n_words_to_guess, detail.n_vocabulary
            );
            detail
        }
        None => {
            let mode: GameMode = mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let request = SessionRequest {
                language: Language::new(&language),
                n_words_to_guess: words,
                n_vocabulary: vocabulary,
                mode,
                direction_ratio: ratio,
            };
            let detail = engine.create_session(&user, &request).await?;
            store.save_json(&cli_config.state_file)?;
            println!(
                "Session {} — {} ({}), {} of {} words",
                detail.id, detail.language, mode, detail.n_words_to_guess, detail.n_vocabulary
            );
            detail
        }
    };
    if detail.n_remaining_words == 0 {
        println!("No words available; the session is already complete.");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut answers = RoundAnswers::default();

    if !detail.remaining_from_target.is_empty() {
        println!("\nTranslate into {}:", cli_config.user_language);
        for word in &detail.remaining_from_target {
            if let Some(answer) = prompt(&mut lines, word)? {
                answers.from_target.insert(word.clone(), answer);
            }
        }
    }
    if !detail.remaining_from_user_language.is_empty() {
        println!("\nTranslate into {}:", detail.language);
        for word in &detail.remaining_from_user_language {
            if let Some(answer) = prompt(&mut lines, word)? {
                answers.from_user_language.insert(word.clone(), answer);
            }
        }
    }

    let (after, outcome) = engine.submit_answers(&user, detail.id, &answers).await?;
    store.save_json(&cli_config.state_file)?;

    println!(
        "\nRound score: {} ({} of {} correct)",
        fmt_score(outcome.round_score_percentage),
        outcome.n_correct_answers,
        outcome.n_valid_attempts
    );
    println!(
        "Session score: {} ({} words remaining)",
        fmt_score(after.session_score_percentage),
        after.n_remaining_words
    );
    if !after.is_active {
        println!("Session complete!");
    } else {
        println!("Skipped words stay pending; session {} remains active.", short_id(after.id));
    }
    Ok(())
}

/// Ask for one translation. An empty line skips the word, leaving it
/// pending.
fn prompt(lines: &mut Lines<StdinLock<'_>>, word: &str) -> Result<Option<String>> {
    print!("  {word} = ");
    io::stdout().flush()?;
    let answer = match lines.next() {
        Some(line) => line?.trim().to_string(),
        None => String::new(),
    };
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer))
    }
}

fn fmt_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{s:.2}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

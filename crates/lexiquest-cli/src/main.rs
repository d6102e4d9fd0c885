//! lexiquest CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "lexiquest", version, about = "Vocabulary-learning game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and an example vocabulary pack
    Init,

    /// Validate a vocabulary pack TOML file
    Validate {
        /// Path to the pack file
        #[arg(long)]
        pack: PathBuf,
    },

    /// Import a vocabulary pack into the local state
    Import {
        /// Path to the pack file
        #[arg(long)]
        pack: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play one session interactively
    Play {
        /// Target language (e.g. "german")
        #[arg(long)]
        language: String,

        /// Difficulty mode: random, hard, recap
        #[arg(long, default_value = "random")]
        mode: String,

        /// Number of words to guess
        #[arg(long, default_value = "10")]
        words: usize,

        /// Candidate pool size
        #[arg(long, default_value = "50")]
        vocabulary: usize,

        /// Percentage of questions asked from your language (0-100)
        #[arg(long, default_value = "0")]
        ratio: u8,

        /// Fixed RNG seed for reproducible word selection
        #[arg(long)]
        seed: Option<u64>,

        /// Resume an existing session instead of creating one
        #[arg(long)]
        session: Option<uuid::Uuid>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List your sessions
    Sessions {
        /// Only show active sessions
        #[arg(long)]
        active: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show your per-word statistics
    Stats {
        /// Filter to one target language
        #[arg(long)]
        language: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexiquest=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { pack } => commands::validate::execute(pack),
        Commands::Import { pack, config } => commands::import::execute(pack, config),
        Commands::Play {
            language,
            mode,
            words,
            vocabulary,
            ratio,
            seed,
            session,
            config,
        } => {
            commands::play::execute(language, mode, words, vocabulary, ratio, seed, session, config)
                .await
        }
        Commands::Sessions { active, config } => commands::sessions::execute(active, config).await,
        Commands::Stats { language, config } => commands::stats::execute(language, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

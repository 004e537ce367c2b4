use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "abiturbot")]
#[command(author, version, about = "Telegram bot for university applicants", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (defaults to ./abiturbot.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Load universities and specialties from JSON files
    Load {
        /// File with a top-level "university" array
        #[arg(short, long, default_value = "university.json")]
        universities: PathBuf,

        /// File with a top-level "spec" array
        #[arg(short, long, default_value = "spec.json")]
        specialties: PathBuf,
    },

    /// Print every stored university and specialty
    Show,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

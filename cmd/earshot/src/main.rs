//! earshot - a voice assistant that knows who is talking.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod app;
mod commands;
mod config;
mod session;

/// Voice assistant that recognizes who is speaking.
///
/// Utterances are matched against enrolled voiceprints: recognized
/// speakers get personalized, mood-aware replies, and voices nobody
/// recognizes are archived so they can be enrolled later.
///
/// Configuration is stored in ~/.earshot/config.yaml.
#[derive(Parser)]
#[command(name = "earshot")]
#[command(about = "Voice assistant that recognizes who is speaking")]
#[command(version)]
struct Cli {
    /// Config file (default is ~/.earshot/config.yaml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Data directory (default is ~/.earshot)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an assistant session over WAV utterances
    Run {
        /// Utterance WAV files, processed in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for synthesized replies (no synthesis when unset)
        #[arg(long)]
        speak_dir: Option<PathBuf>,

        /// Never prompt; treat every question as declined
        #[arg(long)]
        no_prompt: bool,
    },
    /// Enroll a user from a WAV sample
    Enroll { user_id: String, wav: PathBuf },
    /// Identify the speaker in a WAV file
    Identify { wav: PathBuf },
    /// List enrolled users
    Users,
    /// Delete an enrolled user
    Delete { user_id: String },
    /// List archived unknown-speaker clips
    Unknowns,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let cfg = config::load_config(cli.config.as_deref())?;
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(config::default_data_dir)
        .ok_or_else(|| anyhow::anyhow!("cannot determine data directory"))?;
    std::fs::create_dir_all(&data_dir)?;

    match cli.command {
        Commands::Run {
            inputs,
            speak_dir,
            no_prompt,
        } => commands::run(&cfg, &data_dir, inputs, speak_dir, no_prompt),
        Commands::Enroll { user_id, wav } => commands::enroll(&cfg, &data_dir, &user_id, &wav),
        Commands::Identify { wav } => commands::identify(&cfg, &data_dir, &wav),
        Commands::Users => commands::users(&cfg, &data_dir),
        Commands::Delete { user_id } => commands::delete(&cfg, &data_dir, &user_id),
        Commands::Unknowns => commands::unknowns(&cfg, &data_dir),
    }
}

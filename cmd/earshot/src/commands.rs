//! Subcommand implementations.

use std::path::{Path, PathBuf};

use earshot_audio::wav;
use earshot_speakerid::Identification;
use earshot_speech::WavFileSource;

use crate::app;
use crate::config::AppConfig;
use crate::session::Session;

pub fn run(
    cfg: &AppConfig,
    data_dir: &Path,
    inputs: Vec<PathBuf>,
    speak_dir: Option<PathBuf>,
    no_prompt: bool,
) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, data_dir, speak_dir, no_prompt)?;
    let mut source = WavFileSource::new(inputs);
    session.run(&mut source)
}

pub fn enroll(
    cfg: &AppConfig,
    data_dir: &Path,
    user_id: &str,
    wav_path: &Path,
) -> anyhow::Result<()> {
    let registry = app::open_registry(cfg, data_dir)?;
    let clip = wav::read_file(wav_path)?;
    registry.enroll(user_id, &clip)?;
    println!("enrolled {user_id}");
    Ok(())
}

pub fn identify(cfg: &AppConfig, data_dir: &Path, wav_path: &Path) -> anyhow::Result<()> {
    let registry = app::open_registry(cfg, data_dir)?;
    let clip = wav::read_file(wav_path)?;
    match registry.identify(&clip)? {
        Identification::Accepted { user_id, distance } => {
            println!("{user_id} (distance {distance:.3})");
        }
        Identification::Tentative { user_id, distance } => {
            println!("maybe {user_id} (distance {distance:.3})");
        }
        Identification::Rejected { distance } => {
            println!("unknown speaker (distance {distance:.3})");
        }
        Identification::NoEnrolledUsers => println!("no users enrolled"),
        Identification::EmbeddingFailure { reason } => {
            anyhow::bail!("could not extract a voiceprint: {reason}");
        }
    }
    Ok(())
}

pub fn users(cfg: &AppConfig, data_dir: &Path) -> anyhow::Result<()> {
    let registry = app::open_registry(cfg, data_dir)?;
    let history = app::open_history(data_dir)?;
    let users = registry.list_users()?;
    if users.is_empty() {
        println!("no users enrolled");
        return Ok(());
    }
    for user in users {
        let turns = history.count(&user)?;
        println!("{user}  ({turns} turns)");
    }
    Ok(())
}

pub fn delete(cfg: &AppConfig, data_dir: &Path, user_id: &str) -> anyhow::Result<()> {
    let registry = app::open_registry(cfg, data_dir)?;
    registry.delete_user(user_id)?;
    println!("deleted {user_id}");
    Ok(())
}

pub fn unknowns(cfg: &AppConfig, data_dir: &Path) -> anyhow::Result<()> {
    let registry = app::open_registry(cfg, data_dir)?;
    let clips = registry.archive().list()?;
    if clips.is_empty() {
        println!("no archived clips");
        return Ok(());
    }
    for path in clips {
        println!("{}", path.display());
    }
    Ok(())
}

//! Configuration for the earshot CLI.
//!
//! Stored in ~/.earshot/config.yaml. A missing file is created with
//! defaults on first use, so the assistant runs out of the box against
//! local speech servers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default base directory name under the home directory.
pub const DEFAULT_BASE_DIR: &str = ".earshot";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Speaker identification settings.
    #[serde(default)]
    pub speaker: SpeakerSection,

    /// Speech-to-text server settings.
    #[serde(default)]
    pub stt: SttSection,

    /// Text-to-speech server settings.
    #[serde(default)]
    pub tts: TtsSection,

    /// Chat model settings.
    #[serde(default)]
    pub chat: ChatSection,

    /// Weather lookup settings; disabled while `api_key` is empty.
    #[serde(default)]
    pub weather: WeatherSection,

    /// Session loop settings.
    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerSection {
    /// Voiceprint store backend: `files` or `redb`.
    #[serde(default = "default_store")]
    pub store: String,
    /// Voiceprint dimension; must be even (two stats per mel band).
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default = "default_accept_distance")]
    pub accept_distance: f32,
    #[serde(default = "default_review_distance")]
    pub review_distance: f32,
    #[serde(default = "default_consolidate_after")]
    pub consolidate_after: u32,
}

impl Default for SpeakerSection {
    fn default() -> Self {
        Self {
            store: default_store(),
            dimension: default_dimension(),
            accept_distance: default_accept_distance(),
            review_distance: default_review_distance(),
            consolidate_after: default_consolidate_after(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttSection {
    #[serde(default = "default_stt_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SttSection {
    fn default() -> Self {
        Self {
            base_url: default_stt_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSection {
    #[serde(default = "default_tts_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tts_model")]
    pub model: String,
    #[serde(default = "default_tts_voice")]
    pub voice: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TtsSection {
    fn default() -> Self {
        Self {
            base_url: default_tts_url(),
            api_key: String::new(),
            model: default_tts_model(),
            voice: default_tts_voice(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSection {
    #[serde(default = "default_chat_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Name the assistant goes by in its system prompt.
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            base_url: default_chat_url(),
            api_key: String::new(),
            model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            persona: default_persona(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSection {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_city")]
    pub default_city: String,
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_city: default_city(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    /// RMS threshold below which an utterance is treated as silence.
    #[serde(default = "default_energy_threshold")]
    pub energy_threshold: f32,
    /// Words that end the session when heard.
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
    /// Turns of history woven into the prompt.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            energy_threshold: default_energy_threshold(),
            stop_words: default_stop_words(),
            history_turns: default_history_turns(),
        }
    }
}

fn default_store() -> String {
    "files".to_string()
}

fn default_dimension() -> usize {
    256
}

fn default_accept_distance() -> f32 {
    0.6
}

fn default_review_distance() -> f32 {
    0.9
}

fn default_consolidate_after() -> u32 {
    5
}

fn default_stt_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_tts_url() -> String {
    "http://127.0.0.1:8880".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_tts_voice() -> String {
    "alloy".to_string()
}

fn default_chat_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    60
}

fn default_persona() -> String {
    "Earshot".to_string()
}

fn default_city() -> String {
    "Chandigarh".to_string()
}

fn default_energy_threshold() -> f32 {
    0.01
}

fn default_stop_words() -> Vec<String> {
    ["stop", "exit", "goodbye", "shut down", "terminate"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_history_turns() -> usize {
    6
}

fn default_timeout() -> u64 {
    30
}

/// Gets the default data directory (~/.earshot).
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR))
}

/// Loads configuration from the given path, or ~/.earshot/config.yaml.
///
/// A missing file is written out with defaults so there is something to
/// edit afterwards.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<AppConfig> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => default_data_dir()
            .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        Ok(serde_yaml::from_str(&content)?)
    } else {
        let cfg = AppConfig::default();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.speaker.dimension, 256);
        assert_eq!(cfg.speaker.accept_distance, 0.6);
        assert_eq!(cfg.speaker.review_distance, 0.9);
        assert_eq!(cfg.speaker.consolidate_after, 5);
        assert_eq!(cfg.speaker.store, "files");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let cfg: AppConfig =
            serde_yaml::from_str("speaker:\n  accept_distance: 0.5\n").unwrap();
        assert_eq!(cfg.speaker.accept_distance, 0.5);
        // Everything not mentioned keeps its default.
        assert_eq!(cfg.speaker.review_distance, 0.9);
        assert_eq!(cfg.stt.base_url, "http://127.0.0.1:8080");
        assert!(cfg.session.stop_words.contains(&"goodbye".to_string()));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let cfg = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.speaker.dimension, 256);
        assert!(path.exists());

        // Second load reads the file it just wrote.
        let again = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(again.chat.model, cfg.chat.model);
    }
}

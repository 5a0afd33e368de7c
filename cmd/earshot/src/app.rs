//! Builds the assistant's components from configuration.

use std::path::Path;

use earshot_chat::{Assistant, ChatConfig, ChatModel, WeatherClient, WeatherConfig};
use earshot_history::HistoryLog;
use earshot_profile::{DirProfiles, ProfileStore, RedbProfiles};
use earshot_speakerid::{SpeakerConfig, SpeakerRegistry, UnknownArchive};
use earshot_speech::{AsrConfig, HttpSynthesizer, HttpTranscriber, TtsConfig};
use earshot_voiceprint::{SpectralConfig, SpectralExtractor};

use crate::config::AppConfig;

/// Opens the speaker registry over the configured voiceprint store.
pub fn open_registry(cfg: &AppConfig, data_dir: &Path) -> anyhow::Result<SpeakerRegistry> {
    let speaker = &cfg.speaker;
    if speaker.dimension == 0 || speaker.dimension % 2 != 0 {
        anyhow::bail!(
            "speaker.dimension must be even and non-zero, got {}",
            speaker.dimension
        );
    }

    let profiles: Box<dyn ProfileStore> = match speaker.store.as_str() {
        "files" => Box::new(DirProfiles::open(
            data_dir.join("voiceprints"),
            speaker.dimension,
        )?),
        "redb" => Box::new(RedbProfiles::open(
            data_dir.join("voiceprints.redb"),
            speaker.dimension,
        )?),
        other => anyhow::bail!("unknown speaker store backend {other:?} (expected files or redb)"),
    };
    let extractor = Box::new(SpectralExtractor::new(SpectralConfig {
        mel_bands: speaker.dimension / 2,
        ..SpectralConfig::default()
    }));
    let archive = UnknownArchive::open(&data_dir.join("unknown"))?;

    let registry = SpeakerRegistry::open(
        SpeakerConfig {
            dimension: speaker.dimension,
            accept_distance: speaker.accept_distance,
            review_distance: speaker.review_distance,
            consolidate_after: speaker.consolidate_after,
        },
        profiles,
        extractor,
        archive,
        Some(data_dir.join("index.snapshot")),
    )?;
    Ok(registry)
}

/// Opens the conversation log.
pub fn open_history(data_dir: &Path) -> anyhow::Result<HistoryLog> {
    Ok(HistoryLog::open(data_dir.join("history.redb"))?)
}

/// Builds the reply stack: chat model plus optional weather lookups.
pub fn build_assistant(cfg: &AppConfig) -> Assistant {
    let chat = ChatModel::new(ChatConfig {
        base_url: cfg.chat.base_url.clone(),
        api_key: cfg.chat.api_key.clone(),
        model: cfg.chat.model.clone(),
        temperature: cfg.chat.temperature,
        max_tokens: cfg.chat.max_tokens,
        persona: cfg.chat.persona.clone(),
        timeout_secs: cfg.chat.timeout_secs,
        ..ChatConfig::default()
    });

    let mut assistant = Assistant::new(Box::new(chat));
    if !cfg.weather.api_key.is_empty() {
        assistant = assistant.with_weather(WeatherClient::new(WeatherConfig {
            api_key: cfg.weather.api_key.clone(),
            default_city: cfg.weather.default_city.clone(),
            ..WeatherConfig::default()
        }));
    }
    assistant
}

pub fn build_transcriber(cfg: &AppConfig) -> HttpTranscriber {
    HttpTranscriber::new(AsrConfig {
        base_url: cfg.stt.base_url.clone(),
        timeout_secs: cfg.stt.timeout_secs,
    })
}

pub fn build_synthesizer(cfg: &AppConfig) -> HttpSynthesizer {
    HttpSynthesizer::new(TtsConfig {
        base_url: cfg.tts.base_url.clone(),
        api_key: cfg.tts.api_key.clone(),
        model: cfg.tts.model.clone(),
        voice: cfg.tts.voice.clone(),
        timeout_secs: cfg.tts.timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use earshot_audio::AudioClip;
    use std::f32::consts::PI;

    fn tone(hz: f32) -> AudioClip {
        let rate = 16000u32;
        let samples: Vec<f32> = (0..16000)
            .map(|i| (2.0 * PI * hz * i as f32 / rate as f32).sin() * 0.4)
            .collect();
        AudioClip::new(samples, rate)
    }

    fn small_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.speaker.dimension = 32;
        cfg
    }

    #[test]
    fn test_registry_round_trip_on_files_backend() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = small_config();

        let registry = open_registry(&cfg, dir.path()).unwrap();
        registry.enroll("alice", &tone(440.0)).unwrap();
        drop(registry);

        let registry = open_registry(&cfg, dir.path()).unwrap();
        assert_eq!(registry.list_users().unwrap(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_registry_on_redb_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = small_config();
        cfg.speaker.store = "redb".to_string();

        let registry = open_registry(&cfg, dir.path()).unwrap();
        registry.enroll("bob", &tone(330.0)).unwrap();
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = small_config();
        cfg.speaker.store = "postgres".to_string();
        assert!(open_registry(&cfg, dir.path()).is_err());
    }

    #[test]
    fn test_odd_dimension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = AppConfig::default();
        cfg.speaker.dimension = 33;
        assert!(open_registry(&cfg, dir.path()).is_err());
    }
}

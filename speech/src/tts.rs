//! Text-to-speech synthesis.

use std::time::Duration;

use earshot_audio::{AudioClip, wav};
use serde::Serialize;
use tracing::debug;
use ureq::Agent;

/// Error type for speech synthesis.
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("tts: nothing to synthesize")]
    EmptyText,
    #[error("tts: request failed: {0}")]
    Http(String),
    #[error("tts: bad audio in response: {0}")]
    BadAudio(String),
}

/// Interface for a text-to-speech synthesizer.
pub trait Synthesizer: Send + Sync {
    /// Synthesizes the text into an audio clip.
    fn synthesize(&self, text: &str) -> Result<AudioClip, TtsError>;
}

/// Configuration for [`HttpSynthesizer`].
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// Base URL of the server, e.g. `http://127.0.0.1:8880`.
    pub base_url: String,
    /// Bearer token, sent only when non-empty.
    pub api_key: String,
    pub model: String,
    pub voice: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8880".to_string(),
            api_key: String::new(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Synthesizer backed by an OpenAI-compatible `/v1/audio/speech` endpoint.
///
/// Replies are requested as WAV and decoded into an [`AudioClip`]. Text
/// is stripped of emoji before the request; if nothing pronounceable is
/// left the request is skipped with [`TtsError::EmptyText`].
pub struct HttpSynthesizer {
    cfg: TtsConfig,
    agent: Agent,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

impl HttpSynthesizer {
    pub fn new(cfg: TtsConfig) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();
        Self {
            cfg,
            agent: config.into(),
        }
    }
}

impl Synthesizer for HttpSynthesizer {
    fn synthesize(&self, text: &str) -> Result<AudioClip, TtsError> {
        let cleaned = clean_for_speech(text);
        if cleaned.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let url = format!("{}/v1/audio/speech", self.cfg.base_url.trim_end_matches('/'));
        let request = SpeechRequest {
            model: &self.cfg.model,
            input: &cleaned,
            voice: &self.cfg.voice,
            response_format: "wav",
        };

        let mut builder = self.agent.post(&url);
        let auth = format!("Bearer {}", self.cfg.api_key);
        if !self.cfg.api_key.is_empty() {
            builder = builder.header("Authorization", auth.as_str());
        }

        let mut res = builder
            .send_json(&request)
            .map_err(|e| TtsError::Http(e.to_string()))?;
        let bytes = res
            .body_mut()
            .read_to_vec()
            .map_err(|e| TtsError::Http(e.to_string()))?;

        let clip =
            wav::read(&mut bytes.as_slice()).map_err(|e| TtsError::BadAudio(e.to_string()))?;
        debug!(
            "synthesized {} samples at {} Hz for {:?}",
            clip.len(),
            clip.sample_rate,
            cleaned
        );
        Ok(clip)
    }
}

/// Strips emoji and other symbols the voice cannot pronounce, then trims.
pub fn clean_for_speech(text: &str) -> String {
    text.chars()
        .filter(|c| !is_unspeakable(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_unspeakable(c: char) -> bool {
    matches!(
        c as u32,
        // Emoji and pictograph blocks, misc symbols and dingbats,
        // variation selectors, ZWJ, combining keycap.
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0xFE00..=0xFE0F | 0x200D | 0x20E3
    )
}

#[cfg(test)]
mod tts_tests {
    use super::*;
    use crate::testserver::{ok_response, serve_once};

    #[test]
    fn test_clean_for_speech() {
        assert_eq!(clean_for_speech("Good morning! \u{1F604}"), "Good morning!");
        assert_eq!(clean_for_speech("\u{1F642}\u{FE0F} hi"), "hi");
        assert_eq!(clean_for_speech("\u{1F389}\u{2728}"), "");
        assert_eq!(clean_for_speech("  plain text "), "plain text");
    }

    #[test]
    fn test_empty_text_skips_request() {
        // Unroutable base URL: the error must come from cleaning, not I/O.
        let synth = HttpSynthesizer::new(TtsConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        });
        let err = synth.synthesize("\u{1F604}").unwrap_err();
        assert!(matches!(err, TtsError::EmptyText));
    }

    #[test]
    fn test_http_synthesizer_round_trip() {
        let spoken = AudioClip::new(vec![0.5; 160], 16000);
        let mut wav_bytes = Vec::new();
        wav::write(&mut wav_bytes, &spoken).unwrap();
        let (base_url, server) = serve_once(ok_response("audio/wav", &wav_bytes));

        let synth = HttpSynthesizer::new(TtsConfig {
            base_url,
            api_key: "secret".to_string(),
            timeout_secs: 5,
            ..Default::default()
        });
        let clip = synth.synthesize("Good morning! \u{1F604}").unwrap();
        assert_eq!(clip.len(), 160);
        assert_eq!(clip.sample_rate, 16000);

        let request = server.join().unwrap();
        let head = String::from_utf8_lossy(&request).to_lowercase();
        assert!(head.contains("post /v1/audio/speech"));
        assert!(head.contains("authorization: bearer secret"));
        assert!(head.contains("\"response_format\":\"wav\""));
        assert!(head.contains("\"input\":\"good morning!\""));
    }

    #[test]
    fn test_http_synthesizer_bad_audio() {
        let (base_url, server) = serve_once(ok_response("audio/wav", b"not a wav"));
        let synth = HttpSynthesizer::new(TtsConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        });
        let err = synth.synthesize("hello").unwrap_err();
        assert!(matches!(err, TtsError::BadAudio(_)));
        server.join().unwrap();
    }

    #[test]
    fn test_tts_error_display() {
        let err = TtsError::Http("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}

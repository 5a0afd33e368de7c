//! Speech to text over a whisper-compatible HTTP server.

use std::time::Duration;

use earshot_audio::{AudioClip, wav};
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;
use uuid::Uuid;

/// Error type for speech recognition.
#[derive(Debug, thiserror::Error)]
pub enum AsrError {
    #[error("asr: encode: {0}")]
    Encode(String),
    #[error("asr: request failed: {0}")]
    Http(String),
    #[error("asr: bad response: {0}")]
    BadResponse(String),
}

/// Interface for complete speech recognition.
pub trait Transcriber: Send + Sync {
    /// Transcribes an entire utterance.
    fn transcribe(&self, clip: &AudioClip) -> Result<String, AsrError>;
}

/// Configuration for [`HttpTranscriber`].
#[derive(Debug, Clone)]
pub struct AsrConfig {
    /// Base URL of the server, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Transcriber backed by a whisper.cpp-compatible server.
///
/// The utterance is uploaded as a WAV file in a multipart form to
/// `POST /inference`; the server answers with JSON whose `text` field
/// carries the transcript.
pub struct HttpTranscriber {
    cfg: AsrConfig,
    agent: Agent,
}

#[derive(Deserialize)]
struct InferenceResponse {
    text: String,
}

impl HttpTranscriber {
    pub fn new(cfg: AsrConfig) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();
        Self {
            cfg,
            agent: config.into(),
        }
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, AsrError> {
        let mut wav_bytes = Vec::new();
        wav::write(&mut wav_bytes, clip).map_err(|e| AsrError::Encode(e.to_string()))?;

        let boundary = format!("earshot-{}", Uuid::new_v4().simple());
        let body = multipart_wav(&boundary, &wav_bytes);
        let content_type = format!("multipart/form-data; boundary={boundary}");

        let url = format!("{}/inference", self.cfg.base_url.trim_end_matches('/'));
        debug!("asr request to {url} ({} bytes)", body.len());

        let mut res = self
            .agent
            .post(&url)
            .header("Content-Type", content_type.as_str())
            .send(&body[..])
            .map_err(|e| AsrError::Http(e.to_string()))?;

        let parsed: InferenceResponse = res
            .body_mut()
            .read_json()
            .map_err(|e| AsrError::BadResponse(e.to_string()))?;
        Ok(parsed.text.trim().to_string())
    }
}

/// Builds the two-field form body: the WAV file plus `response_format=json`.
fn multipart_wav(boundary: &str, wav_bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(wav_bytes.len() + 512);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"utterance.wav\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(wav_bytes);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"response_format\"\r\n\r\n");
    body.extend_from_slice(b"json");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

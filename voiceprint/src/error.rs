use thiserror::Error;

/// Errors returned by voiceprint operations.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    #[error("voiceprint: audio too short: need at least {need} samples, got {got}")]
    TooShort { need: usize, got: usize },

    #[error("voiceprint: dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    #[error("voiceprint: extraction failed: {0}")]
    Extraction(String),
}

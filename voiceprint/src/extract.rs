use earshot_audio::AudioClip;

use crate::error::VoiceprintError;
use crate::voiceprint::Voiceprint;

/// Extracts speaker embeddings from audio clips.
///
/// Implementations must be deterministic (the same clip always yields the
/// same voiceprint) and safe for concurrent use.
pub trait VoiceprintExtractor: Send + Sync {
    /// Computes a voiceprint from a mono clip.
    fn extract(&self, clip: &AudioClip) -> Result<Voiceprint, VoiceprintError>;

    /// Returns the dimension of every voiceprint this extractor produces.
    fn dimension(&self) -> usize;
}

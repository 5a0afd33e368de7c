//! Voiceprint vectors and embedding extraction.
//!
//! A [`Voiceprint`] is a fixed-dimension f32 vector summarizing a speaker's
//! vocal characteristics from one utterance. Similarity between voiceprints
//! is Euclidean distance: 0 means identical, larger means less similar.
//!
//! Extraction is behind the [`VoiceprintExtractor`] trait so the acoustic
//! front-end can be swapped. The built-in [`SpectralExtractor`] is a
//! deterministic DSP summary:
//!
//! 1. 25ms frames, 10ms hop, DC removal, pre-emphasis 0.97
//! 2. Hamming window + FFT -> power spectrum
//! 3. Triangular mel filterbank -> log energies
//! 4. Per-band mean and standard deviation across frames
//! 5. L2 normalization
//!
//! The output dimension is twice the mel band count (default 128 bands,
//! 256 components).

mod distance;
mod error;
mod extract;
mod spectral;
mod voiceprint;

pub use distance::euclidean_distance;
pub use error::VoiceprintError;
pub use extract::VoiceprintExtractor;
pub use spectral::{SpectralConfig, SpectralExtractor};
pub use voiceprint::Voiceprint;

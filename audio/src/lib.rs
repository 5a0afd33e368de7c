//! Audio model and processing primitives.
//!
//! This crate provides the pieces of audio handling shared across the
//! pipeline:
//!
//! - [`AudioClip`]: mono f32 samples plus a sample rate
//! - [`wav`]: WAV container read/write (PCM16 and IEEE float in, PCM16 out)
//! - [`dsp`]: framing, FFT, windowing, mel filterbank, energy features
//!
//! # Example
//!
//! ```rust
//! use earshot_audio::AudioClip;
//! use earshot_audio::dsp;
//!
//! // 100ms of silence at 16kHz
//! let clip = AudioClip::new(vec![0.0; 1600], 16000);
//!
//! // 25ms frames with a 10ms hop
//! let n = dsp::frames(&clip.samples, 400, 160).count();
//! assert_eq!(n, 8);
//! ```

pub mod clip;
pub mod dsp;
pub mod error;
pub mod wav;

pub use clip::AudioClip;
pub use error::AudioError;

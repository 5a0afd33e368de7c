//! Speech boundaries for the assistant.
//!
//! This crate provides:
//! - [`Transcriber`]: complete-utterance speech recognition, with
//!   [`HttpTranscriber`] talking to a whisper-compatible server
//! - [`Synthesizer`]: text-to-speech, with [`HttpSynthesizer`] talking
//!   to an OpenAI-compatible `/v1/audio/speech` endpoint
//! - [`UtteranceSource`]: where utterances come from, with
//!   [`WavFileSource`] draining a list of WAV files
//! - [`EnergyGate`]: a cheap loudness check that filters out silence
//!   before it reaches the transcriber

mod asr;
mod capture;
mod tts;
mod wake;

#[cfg(test)]
mod testserver;

pub use asr::*;
pub use capture::*;
pub use tts::*;
pub use wake::*;

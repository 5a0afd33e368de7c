//! Voice-based speaker identification.
//!
//! A [`SpeakerRegistry`] compares the voiceprint of a live utterance with
//! every enrolled user and classifies the attempt by Euclidean distance:
//! close enough is accepted, an intermediate band is tentative (the caller
//! decides what to do with it), and anything further is rejected and the
//! audio kept in an [`UnknownArchive`] for later review. Five consecutive
//! accepts of the same user consolidate their stored voiceprint toward
//! the latest sample.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use earshot_profile::MemoryProfiles;
//! use earshot_speakerid::{Identification, SpeakerConfig, SpeakerRegistry, UnknownArchive};
//! use earshot_voiceprint::SpectralExtractor;
//!
//! let registry = SpeakerRegistry::open(
//!     SpeakerConfig::default(),
//!     Box::new(MemoryProfiles::new(256)),
//!     Box::new(SpectralExtractor::default()),
//!     UnknownArchive::open(std::path::Path::new("unknown"))?,
//!     None,
//! )?;
//!
//! let clip = earshot_audio::wav::read_file("hello.wav")?;
//! match registry.identify(&clip)? {
//!     Identification::Accepted { user_id, .. } => println!("hello, {}", user_id),
//!     other => println!("{:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod registry;

pub use archive::UnknownArchive;
pub use config::SpeakerConfig;
pub use error::SpeakerIdError;
pub use registry::{Identification, SpeakerRegistry};

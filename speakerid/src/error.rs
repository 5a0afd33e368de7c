use earshot_profile::ProfileError;
use earshot_simindex::SimIndexError;
use earshot_voiceprint::VoiceprintError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeakerIdError {
    #[error("speakerid: invalid config: {0}")]
    Config(String),

    #[error("speakerid: extraction failed: {0}")]
    Voiceprint(#[from] VoiceprintError),

    #[error("speakerid: profile store: {0}")]
    Profile(#[from] ProfileError),

    #[error("speakerid: index: {0}")]
    Index(#[from] SimIndexError),

    #[error("speakerid: {0}")]
    Io(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio: {0}")]
    Io(String),

    #[error("audio: invalid wav: {0}")]
    InvalidWav(String),

    #[error("audio: unsupported encoding: format tag {format_tag}, {bits} bits")]
    Unsupported { format_tag: u16, bits: u16 },
}

impl From<std::io::Error> for AudioError {
    fn from(e: std::io::Error) -> Self {
        AudioError::Io(e.to_string())
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimIndexError {
    #[error("simindex: empty index")]
    EmptyIndex,

    #[error("simindex: dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    #[error("simindex: {0}")]
    Io(String),

    #[error("simindex: invalid format: {0}")]
    InvalidFormat(String),
}

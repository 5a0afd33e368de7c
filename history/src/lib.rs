//! Per-user conversation history on an embedded key-value store.
//!
//! Each identified exchange (what the user said, what the assistant
//! replied) is one msgpack record keyed by user id and a monotonic
//! nanosecond timestamp, so a prefix scan returns one user's turns in
//! chronological order.

mod keys;
mod log;
mod types;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history: storage: {0}")]
    Storage(String),

    #[error("history: serialization: {0}")]
    Serialization(String),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

pub use log::HistoryLog;
pub use types::{Turn, now_nano};

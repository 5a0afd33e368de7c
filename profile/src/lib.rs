//! Voiceprint profile storage.
//!
//! A profile store is the durable source of truth mapping a user id to
//! exactly one voiceprint. Three implementations are provided: an
//! in-memory map for tests, a flat-file directory (one file per user),
//! and a redb-backed single-file database.
//!
//! Contract notes:
//!
//! - `put` overwrites any prior voiceprint for the id.
//! - `get` returns `None` for unknown ids, never an error.
//! - `delete` succeeds on absent ids.
//! - `list_ids` has no ordering guarantee.
//! - Every stored voiceprint has the store's configured dimension.

mod codec;
pub mod dir;
pub mod memory;
pub mod redb;

use thiserror::Error;

use earshot_voiceprint::Voiceprint;

/// Errors from profile store operations.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile: invalid user id {0:?}")]
    InvalidUserId(String),

    #[error("profile: dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    #[error("profile: storage error: {0}")]
    Storage(String),

    #[error("profile: corrupt record for {user_id:?}: {reason}")]
    Corrupt { user_id: String, reason: String },
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Durable user id -> voiceprint mapping.
///
/// Implementations must be safe for concurrent use.
pub trait ProfileStore: Send + Sync {
    /// Persists one voiceprint for the user, overwriting any prior value.
    fn put(&self, user_id: &str, print: &Voiceprint) -> ProfileResult<()>;

    /// Returns the stored voiceprint, or `None` if the user is unknown.
    fn get(&self, user_id: &str) -> ProfileResult<Option<Voiceprint>>;

    /// Removes the user's voiceprint. Succeeds if already absent.
    fn delete(&self, user_id: &str) -> ProfileResult<()>;

    /// Returns all known user ids in implementation-defined order.
    fn list_ids(&self) -> ProfileResult<Vec<String>>;

    /// The dimension every stored voiceprint must have.
    fn dimension(&self) -> usize;
}

/// Maximum accepted user id length in bytes.
pub const MAX_USER_ID_LEN: usize = 64;

/// Checks that a user id is usable as a storage key and file name.
///
/// Valid ids are non-empty, at most [`MAX_USER_ID_LEN`] bytes, built from
/// ASCII letters, digits, `.`, `_`, `-` and spaces, and do not start with
/// a dot.
pub fn validate_user_id(id: &str) -> ProfileResult<()> {
    if id.is_empty() || id.len() > MAX_USER_ID_LEN || id.starts_with('.') {
        return Err(ProfileError::InvalidUserId(id.to_string()));
    }
    let ok = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' '));
    if !ok {
        return Err(ProfileError::InvalidUserId(id.to_string()));
    }
    Ok(())
}

pub use dir::DirProfiles;
pub use memory::MemoryProfiles;
pub use redb::RedbProfiles;

/// Error type for reply generation.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat: request failed: {0}")]
    Http(String),
    #[error("chat: bad response: {0}")]
    BadResponse(String),
    #[error("chat: template: {0}")]
    Template(String),
}

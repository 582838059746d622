use thiserror::Error;

/// Errors from repository operations (used by trait definitions in
/// confab-core).
///
/// The in-memory store only ever reports absence through `Option`/`bool`
/// return values, but the trait keeps a fallible shape so that alternative
/// backends share the same seam.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors related to chat operations, as surfaced by the service layer.
///
/// Exactly two kinds reach the request boundary: not-found and validation.
/// Everything else is wrapped as an opaque repository failure.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("user not found")]
    UserNotFound,

    #[error("conversation not found")]
    ConversationNotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Failure talking to the Notion API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Errors raised by the mapping engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The post record lacks a field required to build a page.
    #[error("post is missing required field: {0}")]
    MissingField(&'static str),

    /// Fetching the children of a block failed during traversal.
    #[error("failed to retrieve children of block {block_id}: {source}")]
    Retrieval {
        block_id: String,
        #[source]
        source: ApiError,
    },

    /// Creating an anchored comment failed.
    #[error("failed to attach comment to block {block_id}: {source}")]
    CommentAttachment {
        block_id: String,
        #[source]
        source: ApiError,
    },

    #[error("no database registered for source: {0}")]
    UnknownSource(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

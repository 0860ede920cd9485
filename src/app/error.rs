use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostdeckError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Detail reads are cache-only; an absent id is an expected condition.
    #[error("not found")]
    ItemNotFound(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl PostdeckError {
    /// True for faults raised while talking to the remote source.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            PostdeckError::Http(_) | PostdeckError::Status { .. } | PostdeckError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PostdeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(PostdeckError::ItemNotFound(42).to_string(), "not found");
    }

    #[test]
    fn test_status_is_remote() {
        let err = PostdeckError::Status {
            status: 503,
            url: "https://example.com/photos".into(),
        };
        assert!(err.is_remote());
        assert_eq!(
            err.to_string(),
            "Server returned 503 for https://example.com/photos"
        );
        assert!(!PostdeckError::ItemNotFound(1).is_remote());
    }
}

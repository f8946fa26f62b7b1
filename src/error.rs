use std::io;

use thiserror::Error;

/// Crate-wide error type.
///
/// Maps the failure taxonomy of the matching/authoring core:
/// validation failures are caller errors and never retried; provider
/// failures surface only after the retry/fallback policy has given up;
/// search failures always propagate because there is no meaningful
/// fallback to "no search". Partial batch-index failure is not an error
/// at all -- see [`crate::search::IndexReport`].
#[derive(Error, Debug)]
pub enum RmError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    Provider(String),

    #[error("Search service error: {0}")]
    Search(String),

    #[error("Role authoring failed: {0}")]
    Authoring(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Role not found: {0}")]
    RoleNotFound(String),
}

pub type Result<T> = std::result::Result<T, RmError>;

impl RmError {
    /// Whether this error is worth retrying against the remote service.
    ///
    /// Validation and config errors are caller mistakes; retrying them
    /// only burns the attempt budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, RmError::Provider(_) | RmError::Search(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_not_transient() {
        assert!(!RmError::Validation("empty text".to_string()).is_transient());
        assert!(!RmError::Config("bad endpoint".to_string()).is_transient());
    }

    #[test]
    fn provider_and_search_are_transient() {
        assert!(RmError::Provider("503".to_string()).is_transient());
        assert!(RmError::Search("timeout".to_string()).is_transient());
    }

    #[test]
    fn error_messages_are_stable() {
        let err = RmError::Authoring("store rejected insert".to_string());
        assert_eq!(err.to_string(), "Role authoring failed: store rejected insert");
    }
}

//! Domain-level error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which post mutation was denied; only used to word the `Forbidden` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Edit,
    Delete,
}

impl fmt::Display for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostAction::Edit => f.write_str("edit"),
            PostAction::Delete => f.write_str("delete"),
        }
    }
}

/// Stable, serializable classification of a [`PostError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostErrorKind {
    Unauthorized,
    Validation,
    NotFound,
    Forbidden,
    CreationFailed,
    FetchFailed,
    UpdateFailed,
    DeletionFailed,
}

impl PostErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostErrorKind::Unauthorized => "unauthorized",
            PostErrorKind::Validation => "validation",
            PostErrorKind::NotFound => "not_found",
            PostErrorKind::Forbidden => "forbidden",
            PostErrorKind::CreationFailed => "creation_failed",
            PostErrorKind::FetchFailed => "fetch_failed",
            PostErrorKind::UpdateFailed => "update_failed",
            PostErrorKind::DeletionFailed => "deletion_failed",
        }
    }
}

/// Failure of a post service operation.
///
/// The `Display` output is the user-facing message. Storage faults are
/// logged where they happen and never carried in here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Post not found")]
    NotFound,

    #[error("You don't have permission to {0} the post")]
    Forbidden(PostAction),

    #[error("Failed to create post")]
    CreationFailed,

    #[error("Failed to fetch post")]
    FetchFailed,

    #[error("Failed to update post")]
    UpdateFailed,

    #[error("Failed to delete post")]
    DeletionFailed,
}

impl PostError {
    pub fn kind(&self) -> PostErrorKind {
        match self {
            PostError::Unauthorized => PostErrorKind::Unauthorized,
            PostError::Validation(_) => PostErrorKind::Validation,
            PostError::NotFound => PostErrorKind::NotFound,
            PostError::Forbidden(_) => PostErrorKind::Forbidden,
            PostError::CreationFailed => PostErrorKind::CreationFailed,
            PostError::FetchFailed => PostErrorKind::FetchFailed,
            PostError::UpdateFailed => PostErrorKind::UpdateFailed,
            PostError::DeletionFailed => PostErrorKind::DeletionFailed,
        }
    }
}

/// Failure while turning a verified identity event into a local user.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to store user: {0}")]
    Storage(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_message_names_the_action() {
        assert_eq!(
            PostError::Forbidden(PostAction::Edit).to_string(),
            "You don't have permission to edit the post"
        );
        assert_eq!(
            PostError::Forbidden(PostAction::Delete).to_string(),
            "You don't have permission to delete the post"
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PostErrorKind::CreationFailed).unwrap();
        assert_eq!(json, "\"creation_failed\"");
        assert_eq!(PostError::CreationFailed.kind().as_str(), "creation_failed");
    }
}

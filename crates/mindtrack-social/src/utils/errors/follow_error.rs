use std::fmt;

use axum::http::StatusCode;
use uuid::Uuid;

use super::repository_error::RepositoryError;

/// Which relationship mutation was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowAction {
    Follow,
    Unfollow,
}

impl fmt::Display for FollowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowAction::Follow => write!(f, "follow"),
            FollowAction::Unfollow => write!(f, "unfollow"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("You cannot {action} yourself")]
    SelfReference { action: FollowAction },

    #[error("Already following user {0}")]
    AlreadyFollowing(Uuid),

    #[error("A user with this {field} already exists")]
    UserAlreadyExists { field: &'static str },

    /// The commit of the two-sided update failed, so its outcome is unknown.
    #[error(
        "Relationship update between {actor_id} and {target_id} could not be confirmed; retry the request"
    )]
    PartialWrite { actor_id: Uuid, target_id: Uuid },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl FollowError {
    pub fn code(&self) -> StatusCode {
        match self {
            FollowError::InvalidUserId(_) => StatusCode::BAD_REQUEST,
            FollowError::UserNotFound(_) => StatusCode::NOT_FOUND,
            FollowError::SelfReference { .. } => StatusCode::BAD_REQUEST,
            FollowError::AlreadyFollowing(_) => StatusCode::BAD_REQUEST,
            FollowError::UserAlreadyExists { .. } => StatusCode::CONFLICT,
            FollowError::PartialWrite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            FollowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            FollowError::InvalidUserId(_) => "VALIDATION_ERROR",
            FollowError::UserNotFound(_) => "NOT_FOUND",
            FollowError::SelfReference { .. } => "SELF_REFERENCE",
            FollowError::AlreadyFollowing(_) => "DUPLICATE_EDGE",
            FollowError::UserAlreadyExists { .. } => "DUPLICATE_USER",
            FollowError::PartialWrite { .. } => "PARTIAL_WRITE",
            FollowError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Maps a repository failure raised while mutating the `actor_id -> target_id` edge.
    pub fn from_edge_write(err: RepositoryError, actor_id: Uuid, target_id: Uuid) -> Self {
        match err {
            RepositoryError::Aborted(_) => FollowError::PartialWrite {
                actor_id,
                target_id,
            },
            other => other.into(),
        }
    }
}

impl From<RepositoryError> for FollowError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) | RepositoryError::Aborted(e) => {
                FollowError::DatabaseError(e)
            }
            RepositoryError::MissingUser(id) => FollowError::UserNotFound(id),
            RepositoryError::DuplicateUser { field } => FollowError::UserAlreadyExists { field },
        }
    }
}

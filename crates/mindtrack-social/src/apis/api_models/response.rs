use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::users::User;

/// Acknowledgement returned by follow and unfollow.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FollowActionResponse {
    pub success: bool,
    pub message: String,
}

impl FollowActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// An entry of a user's followers list, annotated for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowerResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    /// Whether the viewer already follows this user
    pub following: bool,
}

impl FollowerResponse {
    pub fn from_user(user: User, following: bool) -> Self {
        FollowerResponse {
            id: user.id,
            username: user.display_username(),
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
            following,
        }
    }
}

/// An entry of the list of users someone follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowingResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

impl From<User> for FollowingResponse {
    fn from(user: User) -> Self {
        FollowingResponse {
            id: user.id,
            username: user.display_username(),
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

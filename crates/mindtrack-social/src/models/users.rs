use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub email: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown in follower lists: the username when set, otherwise the
    /// email, otherwise the login.
    pub fn display_username(&self) -> String {
        self.username
            .as_deref()
            .filter(|username| !username.is_empty())
            .or(Some(self.email.as_str()).filter(|email| !email.is_empty()))
            .unwrap_or(self.login.as_str())
            .to_string()
    }
}

/// Registration input. A new user starts with no relationships.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub email: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            login: self.login,
            email: self.email,
            username: self.username,
            avatar_url: self.avatar_url,
            created_at: Utc::now(),
        }
    }
}

/// Both relationship lists of a single user.
///
/// `followers` holds the ids this user follows, `followed_by` the ids that
/// follow this user. The field names keep the meaning the client has always
/// relied on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserRelations {
    pub user_id: Uuid,
    pub followers: Vec<Uuid>,
    pub followed_by: Vec<Uuid>,
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single follow edge: `follower_id` follows `followed_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct UserFollow {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl UserFollow {
    pub fn new(follower_id: Uuid, followed_id: Uuid) -> Self {
        Self {
            follower_id,
            followed_id,
            created_at: Utc::now(),
        }
    }

    pub fn connects(&self, follower_id: Uuid, followed_id: Uuid) -> bool {
        self.follower_id == follower_id && self.followed_id == followed_id
    }

    pub fn touches(&self, user_id: Uuid) -> bool {
        self.follower_id == user_id || self.followed_id == user_id
    }
}

/// Outcome of a set-semantics edge write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeChange {
    Applied,
    Unchanged,
}

impl EdgeChange {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            EdgeChange::Applied
        } else {
            EdgeChange::Unchanged
        }
    }
}

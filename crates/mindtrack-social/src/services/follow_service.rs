use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::apis::api_models::response::{FollowerResponse, FollowingResponse};
use crate::models::user_follows::EdgeChange;
use crate::models::users::{NewUser, User, UserRelations};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::follow_error::{FollowAction, FollowError};

/// Maintains follow edges between users and projects them into lists.
#[derive(Clone)]
pub struct FollowService {
    user_repository: Arc<dyn UserRepository>,
}

impl FollowService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn register(&self, user: NewUser) -> Result<User, FollowError> {
        let user = self.user_repository.create_user(user).await?;
        debug!("Registered user {}", user.id);
        Ok(user)
    }

    /// Removes a user and every relationship they take part in.
    pub async fn remove_user(&self, user_id: Uuid) -> Result<(), FollowError> {
        if !self.user_repository.delete_user(user_id).await? {
            return Err(FollowError::UserNotFound(user_id));
        }
        info!("Removed user {} and their relationships", user_id);
        Ok(())
    }

    pub async fn follow(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), FollowError> {
        if actor_id == target_id {
            warn!("User {} tried to follow themselves", actor_id);
            return Err(FollowError::SelfReference {
                action: FollowAction::Follow,
            });
        }
        self.require_pair(actor_id, target_id).await?;

        let change = self
            .user_repository
            .follow_user(actor_id, target_id)
            .await
            .map_err(|e| FollowError::from_edge_write(e, actor_id, target_id))?;

        match change {
            EdgeChange::Applied => {
                info!("User {} followed user {}", actor_id, target_id);
                Ok(())
            }
            EdgeChange::Unchanged => {
                debug!("User {} already follows user {}", actor_id, target_id);
                Err(FollowError::AlreadyFollowing(target_id))
            }
        }
    }

    /// Removing an edge that does not exist succeeds without changes.
    pub async fn unfollow(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), FollowError> {
        if actor_id == target_id {
            warn!("User {} tried to unfollow themselves", actor_id);
            return Err(FollowError::SelfReference {
                action: FollowAction::Unfollow,
            });
        }
        self.require_pair(actor_id, target_id).await?;

        let change = self
            .user_repository
            .unfollow_user(actor_id, target_id)
            .await
            .map_err(|e| FollowError::from_edge_write(e, actor_id, target_id))?;

        if change == EdgeChange::Applied {
            info!("User {} unfollowed user {}", actor_id, target_id);
        } else {
            debug!("User {} was not following user {}", actor_id, target_id);
        }
        Ok(())
    }

    pub async fn relations(&self, user_id: Uuid) -> Result<UserRelations, FollowError> {
        self.require_user(user_id).await?;
        Ok(UserRelations {
            user_id,
            followers: self.user_repository.following_ids(user_id).await?,
            followed_by: self.user_repository.follower_ids(user_id).await?,
        })
    }

    /// Users following `user_id`, each flagged with whether `viewer_id`
    /// follows them.
    pub async fn followers(
        &self,
        user_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Vec<FollowerResponse>, FollowError> {
        self.require_user(user_id).await?;

        let follower_ids = self.user_repository.follower_ids(user_id).await?;
        let viewer_following: HashSet<Uuid> = self
            .user_repository
            .following_ids(viewer_id)
            .await?
            .into_iter()
            .collect();

        let followers = self
            .load_in_order(&follower_ids)
            .await?
            .into_iter()
            .map(|user| {
                let following = viewer_following.contains(&user.id);
                FollowerResponse::from_user(user, following)
            })
            .collect();
        Ok(followers)
    }

    /// Users that `user_id` follows.
    pub async fn following(&self, user_id: Uuid) -> Result<Vec<FollowingResponse>, FollowError> {
        self.require_user(user_id).await?;

        let following_ids = self.user_repository.following_ids(user_id).await?;
        let following = self
            .load_in_order(&following_ids)
            .await?
            .into_iter()
            .map(FollowingResponse::from)
            .collect();
        Ok(following)
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, FollowError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(FollowError::UserNotFound(user_id))
    }

    async fn require_pair(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), FollowError> {
        let found: HashSet<Uuid> = self
            .user_repository
            .find_by_ids(&[target_id, actor_id])
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();

        for id in [target_id, actor_id] {
            if !found.contains(&id) {
                warn!("User {} not found", id);
                return Err(FollowError::UserNotFound(id));
            }
        }
        Ok(())
    }

    /// Batch-loads users and returns them in the order of `ids`.
    async fn load_in_order(&self, ids: &[Uuid]) -> Result<Vec<User>, FollowError> {
        let mut by_id: HashMap<Uuid, User> = self
            .user_repository
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

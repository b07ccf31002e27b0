use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user_follows::{EdgeChange, UserFollow};
use crate::models::users::{NewUser, User};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::repository_error::RepositoryError;

#[derive(Default)]
struct Directory {
    users: HashMap<Uuid, User>,
    // insertion order doubles as edge creation order
    edges: Vec<UserFollow>,
}

impl Directory {
    fn ensure_unique(&self, user: &User) -> Result<(), RepositoryError> {
        for existing in self.users.values() {
            if existing.login == user.login {
                return Err(RepositoryError::DuplicateUser { field: "login" });
            }
            if existing.email == user.email {
                return Err(RepositoryError::DuplicateUser { field: "email" });
            }
        }
        Ok(())
    }

    fn ensure_exists(&self, ids: [Uuid; 2]) -> Result<(), RepositoryError> {
        match ids.into_iter().find(|id| !self.users.contains_key(id)) {
            Some(missing) => Err(RepositoryError::MissingUser(missing)),
            None => Ok(()),
        }
    }
}

/// Process-local user directory, used when no database is configured.
#[derive(Default)]
pub struct InMemoryUserRepository {
    directory: RwLock<Directory>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.directory.read().await.users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepositoryError> {
        let directory = self.directory.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| directory.users.get(id).cloned())
            .collect())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let user = user.into_user(Uuid::new_v4());
        let mut directory = self.directory.write().await;
        directory.ensure_unique(&user)?;
        directory.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut directory = self.directory.write().await;
        if directory.users.remove(&id).is_none() {
            return Ok(false);
        }
        directory.edges.retain(|edge| !edge.touches(id));
        Ok(true)
    }

    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let directory = self.directory.read().await;
        Ok(directory
            .edges
            .iter()
            .filter(|edge| edge.follower_id == user_id)
            .map(|edge| edge.followed_id)
            .collect())
    }

    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let directory = self.directory.read().await;
        Ok(directory
            .edges
            .iter()
            .filter(|edge| edge.followed_id == user_id)
            .map(|edge| edge.follower_id)
            .collect())
    }

    async fn follow_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<EdgeChange, RepositoryError> {
        let mut directory = self.directory.write().await;
        directory.ensure_exists([follower_id, followed_id])?;

        if directory
            .edges
            .iter()
            .any(|edge| edge.connects(follower_id, followed_id))
        {
            return Ok(EdgeChange::Unchanged);
        }
        directory
            .edges
            .push(UserFollow::new(follower_id, followed_id));
        Ok(EdgeChange::Applied)
    }

    async fn unfollow_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<EdgeChange, RepositoryError> {
        let mut directory = self.directory.write().await;
        directory.ensure_exists([follower_id, followed_id])?;

        let before = directory.edges.len();
        directory
            .edges
            .retain(|edge| !edge.connects(follower_id, followed_id));
        Ok(EdgeChange::from_rows_affected(
            (before - directory.edges.len()) as u64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(login: &str) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: login.to_string(),
            login: login.to_string(),
            email: format!("{login}@mindtrack.test"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn follow_is_a_set_insert() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();
        let b = repo.create_user(new_user("b")).await.unwrap();

        assert_eq!(repo.follow_user(a.id, b.id).await.unwrap(), EdgeChange::Applied);
        assert_eq!(repo.follow_user(a.id, b.id).await.unwrap(), EdgeChange::Unchanged);
        assert_eq!(repo.following_ids(a.id).await.unwrap(), vec![b.id]);
        assert_eq!(repo.follower_ids(b.id).await.unwrap(), vec![a.id]);
    }

    #[tokio::test]
    async fn unfollow_of_missing_edge_is_unchanged() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();
        let b = repo.create_user(new_user("b")).await.unwrap();

        assert_eq!(
            repo.unfollow_user(a.id, b.id).await.unwrap(),
            EdgeChange::Unchanged
        );
    }

    #[tokio::test]
    async fn edge_write_reports_missing_endpoint() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();
        let ghost = Uuid::new_v4();

        let err = repo.follow_user(a.id, ghost).await.unwrap_err();
        assert!(matches!(err, RepositoryError::MissingUser(id) if id == ghost));
        assert!(repo.following_ids(a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_user_drops_its_edges() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();
        let b = repo.create_user(new_user("b")).await.unwrap();
        let c = repo.create_user(new_user("c")).await.unwrap();
        repo.follow_user(a.id, b.id).await.unwrap();
        repo.follow_user(b.id, c.id).await.unwrap();
        repo.follow_user(c.id, a.id).await.unwrap();

        assert!(repo.delete_user(b.id).await.unwrap());
        assert!(!repo.delete_user(b.id).await.unwrap());
        assert!(repo.following_ids(a.id).await.unwrap().is_empty());
        assert!(repo.follower_ids(c.id).await.unwrap().is_empty());
        assert_eq!(repo.following_ids(c.id).await.unwrap(), vec![a.id]);
    }

    #[tokio::test]
    async fn create_user_rejects_taken_login_and_email() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();

        let same_login = NewUser {
            email: "other@mindtrack.test".to_string(),
            ..new_user("a")
        };
        let err = repo.create_user(same_login).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateUser { field: "login" }));

        let same_email = NewUser {
            email: a.email.clone(),
            ..new_user("b")
        };
        let err = repo.create_user(same_email).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateUser { field: "email" }));

        assert_eq!(repo.find_by_ids(&[a.id]).await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown_ids() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();

        let found = repo.find_by_ids(&[a.id, Uuid::new_v4()]).await.unwrap();
        assert_eq!(found, vec![a]);
    }
}

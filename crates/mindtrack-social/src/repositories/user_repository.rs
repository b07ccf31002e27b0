use crate::models::user_follows::EdgeChange;
use crate::models::users::{NewUser, User};
use crate::utils::errors::repository_error::RepositoryError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

/// Persistent user directory and the follow edges between its users.
///
/// Edge writes have set semantics and cover both sides of the relationship
/// in one atomic step, so a user's `followers` and another user's
/// `followed_by` can never disagree.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Loads every listed user that exists, in no particular order.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepositoryError>;

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Deletes the user together with every edge touching it.
    async fn delete_user(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Ids the user follows, oldest edge first.
    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;

    /// Ids following the user, oldest edge first.
    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;

    async fn follow_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<EdgeChange, RepositoryError>;

    async fn unfollow_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<EdgeChange, RepositoryError>;
}

pub struct PgUserRepository {
    db: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        PgUserRepository { db }
    }

    /// Share-locks both endpoints of an edge in id order, so deleting either
    /// user waits for the edge write to finish.
    async fn lock_pair(
        tx: &mut Transaction<'_, Postgres>,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let locked: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM public.users WHERE id = ANY($1) ORDER BY id FOR SHARE",
        )
        .bind(vec![follower_id, followed_id])
        .fetch_all(&mut **tx)
        .await?;

        for id in [follower_id, followed_id] {
            if !locked.contains(&id) {
                return Err(RepositoryError::MissingUser(id));
            }
        }
        Ok(())
    }
}

/// Maps a unique violation (SQLSTATE 23505) on `login` or `email` to `DuplicateUser`.
fn duplicate_user(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_login_key") => return RepositoryError::DuplicateUser { field: "login" },
                Some("users_email_key") => return RepositoryError::DuplicateUser { field: "email" },
                _ => {}
            }
        }
    }
    err.into()
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let query = r#"
        SELECT id, first_name, last_name, login, email, username, avatar_url, created_at
        FROM public.users
        WHERE id = $1
        "#;
        let user = sqlx::query_as::<_, User>(query)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = r#"
        SELECT id, first_name, last_name, login, email, username, avatar_url, created_at
        FROM public.users
        WHERE id = ANY($1)
        "#;
        let users = sqlx::query_as::<_, User>(query)
            .bind(ids)
            .fetch_all(self.db.as_ref())
            .await?;
        Ok(users)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let user = user.into_user(Uuid::new_v4());
        let saved = sqlx::query_as::<_, User>(
            "INSERT INTO public.users (id, first_name, last_name, login, email, username, avatar_url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, first_name, last_name, login, email, username, avatar_url, created_at",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.avatar_url)
        .bind(user.created_at)
        .fetch_one(self.db.as_ref())
        .await
        .map_err(duplicate_user)?;
        Ok(saved)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, RepositoryError> {
        // Edges go with the user through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM public.users WHERE id = $1")
            .bind(id)
            .execute(self.db.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let ids = sqlx::query_scalar(
            "SELECT followed_id FROM social.user_follows WHERE follower_id = $1 ORDER BY created_at, followed_id",
        )
        .bind(user_id)
        .fetch_all(self.db.as_ref())
        .await?;
        Ok(ids)
    }

    async fn follower_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let ids = sqlx::query_scalar(
            "SELECT follower_id FROM social.user_follows WHERE followed_id = $1 ORDER BY created_at, follower_id",
        )
        .bind(user_id)
        .fetch_all(self.db.as_ref())
        .await?;
        Ok(ids)
    }

    async fn follow_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<EdgeChange, RepositoryError> {
        let mut tx = self.db.begin().await?;
        Self::lock_pair(&mut tx, follower_id, followed_id).await?;

        let result = sqlx::query(
            "INSERT INTO social.user_follows (follower_id, followed_id, created_at) VALUES ($1, $2, $3)
             ON CONFLICT (follower_id, followed_id) DO NOTHING",
        )
        .bind(follower_id)
        .bind(followed_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(RepositoryError::Aborted)?;
        Ok(EdgeChange::from_rows_affected(result.rows_affected()))
    }

    async fn unfollow_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<EdgeChange, RepositoryError> {
        let mut tx = self.db.begin().await?;
        Self::lock_pair(&mut tx, follower_id, followed_id).await?;

        let result = sqlx::query(
            "DELETE FROM social.user_follows WHERE follower_id = $1 AND followed_id = $2",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(RepositoryError::Aborted)?;
        Ok(EdgeChange::from_rows_affected(result.rows_affected()))
    }
}

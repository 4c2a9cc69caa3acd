use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::metrics::record_write;
use crate::models::User;

#[derive(Clone)]
pub struct FollowService {
    pool: SqlitePool,
}

impl FollowService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn author(&self, username: &str) -> Result<User> {
        user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("/profile/{}/", username)))
    }

    /// Subscribe `user_id` to `username`. Idempotent; following yourself is a no-op.
    pub async fn follow(&self, user_id: i64, username: &str) -> Result<User> {
        let author = self.author(username).await?;
        if author.id == user_id {
            debug!(user_id, "ignoring self-follow");
            return Ok(author);
        }

        if follow_repo::create_follow(&self.pool, user_id, author.id).await? {
            record_write("follow");
            info!(user_id, author_id = author.id, "follow created");
        }
        Ok(author)
    }

    /// Remove the subscription if present.
    pub async fn unfollow(&self, user_id: i64, username: &str) -> Result<User> {
        let author = self.author(username).await?;
        if follow_repo::delete_follow(&self.pool, user_id, author.id).await? {
            record_write("unfollow");
            info!(user_id, author_id = author.id, "follow removed");
        }
        Ok(author)
    }

    pub async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool> {
        Ok(follow_repo::is_following(&self.pool, user_id, author_id).await?)
    }
}

/// Comment service - validates and stores comments on posts
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::forms::CommentForm;
use crate::metrics::record_write;
use crate::models::Comment;

#[derive(Clone)]
pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a comment to a post.
    ///
    /// Returns `None` when the form is invalid; nothing is stored then.
    pub async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        form: &CommentForm,
    ) -> Result<Option<Comment>> {
        if post_repo::find_post_by_id(&self.pool, post_id).await?.is_none() {
            return Err(AppError::not_found(format!("/posts/{}/", post_id)));
        }

        let form = match form.cleaned() {
            Ok(form) => form,
            Err(errors) => {
                warn!(post_id, author_id, ?errors, "rejected comment");
                return Ok(None);
            }
        };

        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, &form.text).await?;
        record_write("comment_created");
        info!(post_id, comment_id = comment.id, "comment created");
        Ok(Some(comment))
    }

    /// Comments of a post, newest first
    pub async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        Ok(comment_repo::get_comments_by_post(&self.pool, post_id).await?)
    }
}

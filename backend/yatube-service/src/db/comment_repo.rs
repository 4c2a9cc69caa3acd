use crate::models::Comment;
use chrono::Utc;
use sqlx::SqlitePool;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO comments (post_id, author_id, text, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .bind(Utc::now())
    .execute(pool)
    .await?
    .last_insert_rowid();

    sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.id = ?"))
        .bind(id)
        .fetch_one(pool)
        .await
}

/// All comments of a post, newest first
pub async fn get_comments_by_post(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at DESC, c.id DESC"
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn count_comments_by_post(pool: &SqlitePool, post_id: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn count_comments(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

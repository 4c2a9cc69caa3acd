use crate::models::Follow;
use sqlx::SqlitePool;

/// Idempotent create follow; returns true if a new row was inserted.
pub async fn create_follow(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("INSERT OR IGNORE INTO follows (user_id, author_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Idempotent delete; returns true if a row was removed.
pub async fn delete_follow(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

pub async fn is_following(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

/// Subscriptions held by `user_id`
pub async fn list_following(pool: &SqlitePool, user_id: i64) -> Result<Vec<Follow>, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        "SELECT id, user_id, author_id FROM follows WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

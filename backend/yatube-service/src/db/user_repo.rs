use crate::models::User;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, first_name, last_name, password_hash, created_at";

/// Insert a new user and return the stored row
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    first_name: &str,
    last_name: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO users (username, first_name, last_name, password_hash, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

use crate::models::Group;
use sqlx::SqlitePool;

/// Insert a new group and return the stored row
pub async fn create_group(
    pool: &SqlitePool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    let id = sqlx::query("INSERT INTO groups (title, slug, description) VALUES (?, ?, ?)")
        .bind(title)
        .bind(slug)
        .bind(description)
        .execute(pool)
        .await?
        .last_insert_rowid();

    find_by_id(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn find_by_id(pool: &SqlitePool, group_id: i64) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM groups WHERE id = ?")
        .bind(group_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM groups WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// All groups ordered by title, used for the post form's group choices
pub async fn list_groups(pool: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM groups ORDER BY title, id")
        .fetch_all(pool)
        .await
}

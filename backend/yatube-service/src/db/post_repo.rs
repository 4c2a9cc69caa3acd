use crate::models::{Post, PostDraft};
use chrono::Utc;
use sqlx::SqlitePool;

const POST_SELECT: &str = r#"
    SELECT p.id, p.text, p.created_at, p.author_id, u.username AS author_username,
           p.group_id, g.slug AS group_slug, g.title AS group_title, p.image
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

/// Which posts a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post (index page)
    All,
    /// Posts of one group
    Group(i64),
    /// Posts of one author (profile page)
    Author(i64),
    /// Posts by authors the given user follows (feed)
    FollowedBy(i64),
}

impl PostFilter {
    fn where_clause(self) -> &'static str {
        match self {
            PostFilter::All => "",
            PostFilter::Group(_) => "WHERE p.group_id = ?",
            PostFilter::Author(_) => "WHERE p.author_id = ?",
            PostFilter::FollowedBy(_) => {
                "WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ?)"
            }
        }
    }

    fn param(self) -> Option<i64> {
        match self {
            PostFilter::All => None,
            PostFilter::Group(id) | PostFilter::Author(id) | PostFilter::FollowedBy(id) => Some(id),
        }
    }
}

/// Create a post and return it with its joined author/group columns
pub async fn create_post(
    pool: &SqlitePool,
    author_id: i64,
    draft: &PostDraft,
) -> Result<Post, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO posts (text, created_at, author_id, group_id, image)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.text)
    .bind(Utc::now())
    .bind(author_id)
    .bind(draft.group_id)
    .bind(draft.image.as_deref())
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_post_by_id(pool, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Overwrite text, group and image of a post; returns false when it does not exist
pub async fn update_post(
    pool: &SqlitePool,
    post_id: i64,
    draft: &PostDraft,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE posts SET text = ?, group_id = ?, image = ? WHERE id = ?")
        .bind(&draft.text)
        .bind(draft.group_id)
        .bind(draft.image.as_deref())
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_post_by_id(pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Posts matching `filter`, newest first
pub async fn find_posts(
    pool: &SqlitePool,
    filter: PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        "{POST_SELECT} {} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?",
        filter.where_clause()
    );

    let mut query = sqlx::query_as::<_, Post>(&sql);
    if let Some(param) = filter.param() {
        query = query.bind(param);
    }

    query.bind(limit).bind(offset).fetch_all(pool).await
}

pub async fn count_posts(pool: &SqlitePool, filter: PostFilter) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM posts p {}", filter.where_clause());

    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    if let Some(param) = filter.param() {
        query = query.bind(param);
    }

    let (count,) = query.fetch_one(pool).await?;
    Ok(count)
}

/// Shared application state handed to every handler through `web::Data`.
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::cache::PageCache;
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::media::MediaStorage;
use crate::services::{AccountService, CommentService, FollowService, PostService};
use crate::session::SessionKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub page_cache: PageCache,
    pub media: MediaStorage,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            page_cache: PageCache::new(config.cache.page_ttl_secs),
            media: MediaStorage::new(&config.media),
            sessions: SessionKeys::new(&config.session),
            config: Arc::new(config),
        }
    }

    /// Connect to the configured database, apply migrations and build the state.
    pub async fn connect(config: Config) -> Result<Self> {
        let pool = db::connect(&config.database).await?;
        Ok(Self::new(pool, config))
    }

    pub fn posts(&self) -> PostService {
        PostService::new(
            self.db.clone(),
            self.media.clone(),
            self.config.pagination.posts_per_page,
        )
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.db.clone())
    }

    pub fn follows(&self) -> FollowService {
        FollowService::new(self.db.clone())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.clone())
    }
}

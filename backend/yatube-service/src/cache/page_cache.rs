use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::metrics::PAGE_CACHE_EVENTS;

/// Identifies one cached rendering: key prefix, full request path (with
/// query) and the viewer, since logged-in users see their own navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    prefix: &'static str,
    path: String,
    viewer: Option<i64>,
}

impl CacheKey {
    pub fn new(prefix: &'static str, path: impl Into<String>, viewer: Option<i64>) -> Self {
        Self {
            prefix,
            path: path.into(),
            viewer,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedPage {
    body: Arc<str>,
    stored_at: Instant,
}

/// Process-wide cache of rendered pages.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct PageCache {
    entries: Arc<DashMap<CacheKey, CachedPage>>,
    ttl: Option<Duration>,
}

impl PageCache {
    /// `ttl_secs == 0` keeps entries until [`PageCache::clear`].
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if self.is_fresh(&entry) {
                    debug!(path = %key.path, "page cache HIT");
                    PAGE_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                    return Some(entry.body.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        debug!(path = %key.path, expired, "page cache MISS");
        PAGE_CACHE_EVENTS.with_label_values(&["miss"]).inc();
        None
    }

    pub fn insert(&self, key: CacheKey, body: impl Into<Arc<str>>) -> Arc<str> {
        let body = body.into();
        self.entries.insert(
            key,
            CachedPage {
                body: body.clone(),
                stored_at: Instant::now(),
            },
        );
        PAGE_CACHE_EVENTS.with_label_values(&["store"]).inc();
        body
    }

    /// Drop every cached page.
    pub fn clear(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        PAGE_CACHE_EVENTS.with_label_values(&["clear"]).inc();
        debug!(dropped, "page cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, page: &CachedPage) -> bool {
        match self.ttl {
            Some(ttl) => page.stored_at.elapsed() < ttl,
            None => true,
        }
    }
}

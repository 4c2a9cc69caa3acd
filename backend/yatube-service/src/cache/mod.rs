/// Page caching layer
///
/// Rendered pages are kept in process memory. Writes never invalidate them;
/// an entry is replaced only after `PageCache::clear` or when its TTL runs out.
pub mod page_cache;

pub use page_cache::{CacheKey, PageCache};

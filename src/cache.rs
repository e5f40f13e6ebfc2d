//! Process-wide response cache for rendered crawler documents.
//!
//! Synthesis is cheap but not free, and crawlers revisit aggressively. The
//! cache stores the final mutated HTML keyed by content type and slug.
//! Entries are derived purely from upstream data, so concurrent misses may
//! each rebuild and the last write wins; no locking beyond the map itself.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Injected cache seam so tests can substitute a deterministic fake.
pub trait ResponseCache: Send + Sync {
    /// Return the cached document, byte-for-byte as it was stored.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a rendered document. Overwrites any previous entry.
    fn set(&self, key: &str, html: String);

    /// Drop a single entry, if present.
    fn invalidate(&self, key: &str);

    /// Drop every expired entry.
    fn purge_expired(&self);

    /// Number of live entries (expired-but-unswept entries included).
    fn len(&self) -> usize;
}

struct Entry {
    html: String,
    created_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.created_at.elapsed() >= ttl,
            None => false,
        }
    }
}

/// Default cache: a concurrent map with an optional TTL checked on read.
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    /// `ttl: None` keeps entries until they are overwritten or invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired(self.ttl) => true,
            Some(entry) => return Some(entry.html.clone()),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, html: String) {
        self.entries.insert(
            key.to_string(),
            Entry {
                html,
                created_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_is_byte_exact() {
        let cache = MemoryCache::new(None);
        let html = "<html>\n  <body>£1,299 &amp; more — exact bytes</body>\n</html>";
        cache.set("package:rome-weekend", html.to_string());
        assert_eq!(cache.get("package:rome-weekend").as_deref(), Some(html));
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = MemoryCache::new(None);
        assert!(cache.get("tour:unknown").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemoryCache::new(None);
        cache.set("blog:post", "old".to_string());
        cache.set("blog:post", "new".to_string());
        assert_eq!(cache.get("blog:post").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = MemoryCache::new(None);
        cache.set("static:home", "<html/>".to_string());
        cache.invalidate("static:home");
        assert!(cache.get("static:home").is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new(Some(Duration::ZERO));
        cache.set("destination:italy", "<html/>".to_string());
        assert!(cache.get("destination:italy").is_none());
        // The expired read also swept the entry.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_purge_expired_sweeps() {
        let cache = MemoryCache::new(Some(Duration::ZERO));
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.purge_expired();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let cache = MemoryCache::new(None);
        cache.set("tour:123", "tour page".to_string());
        cache.set("package:123", "package page".to_string());
        assert_eq!(cache.get("tour:123").as_deref(), Some("tour page"));
        assert_eq!(cache.get("package:123").as_deref(), Some("package page"));
    }
}

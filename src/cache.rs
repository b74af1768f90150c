//! Template cache
//!
//! Identical attribute strings across many fields parse once. Entries are
//! evicted least-recently-used first.

use crate::parser::ParseResult;
use crate::template::Template;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Statistics for template cache performance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to parse
    pub misses: u64,
    /// Entries currently cached
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
}

impl CacheStats {
    /// Hit ratio as a percentage
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct CacheState {
    entries: Option<LruCache<String, Arc<Template>>>,
    hits: u64,
    misses: u64,
}

/// LRU cache of parsed templates keyed by source text
pub struct TemplateCache {
    state: Mutex<CacheState>,
}

impl TemplateCache {
    /// Create a cache holding up to `capacity` templates; 0 disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: NonZeroUsize::new(capacity).map(LruCache::new),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Return the cached template for `source`, parsing it on a miss
    ///
    /// Parse failures are not cached.
    pub fn get_or_parse(&self, source: &str) -> ParseResult<Arc<Template>> {
        {
            let mut state = self.state.lock();
            let cached = state
                .entries
                .as_mut()
                .and_then(|entries| entries.get(source).cloned());
            if let Some(template) = cached {
                state.hits += 1;
                return Ok(template);
            }
            state.misses += 1;
        }

        let template = Template::shared(source)?;
        if let Some(entries) = self.state.lock().entries.as_mut() {
            if let Some((evicted, _)) = entries.push(source.to_string(), Arc::clone(&template)) {
                if evicted != source {
                    log::debug!("Evicted template {evicted:?} from cache");
                }
            }
        }
        Ok(template)
    }

    /// Current statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            size: state.entries.as_ref().map_or(0, LruCache::len),
            capacity: state.entries.as_ref().map_or(0, |entries| entries.cap().get()),
        }
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut state = self.state.lock();
        if let Some(entries) = state.entries.as_mut() {
            entries.clear();
        }
        state.hits = 0;
        state.misses = 0;
    }
}

impl std::fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCache")
            .field("stats", &self.stats())
            .finish()
    }
}

//! Result Cache
//!
//! TTL + capacity bounded reply cache keyed by a digest of the request.
//! Eviction is a size-triggered sweep of expired entries; the capacity is
//! advisory and there is no per-entry recency tracking.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use super::models::{CacheStats, SearchOptions, SearchReply};

#[derive(Debug, Clone)]
struct CacheEntry {
    reply: SearchReply,
    cached_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
    max_entries: usize,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Digest of the full request identity.
    pub fn key(index: &str, query: &str, options: &SearchOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(index.as_bytes());
        hasher.update([0u8]);
        hasher.update(query.as_bytes());
        hasher.update([0u8]);
        // Struct field order makes this canonical for identical inputs.
        hasher.update(serde_json::to_string(options).unwrap_or_default().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// A cached reply, if present and still fresh. The copy comes back with
    /// `from_cache` set; everything else is verbatim.
    pub fn get(&self, key: &str) -> Option<SearchReply> {
        let entry = self.entries.get(key)?;
        if Utc::now() - entry.cached_at >= self.ttl {
            return None;
        }
        let mut reply = entry.reply.clone();
        reply.from_cache = true;
        Some(reply)
    }

    /// Store a reply. At capacity, expired entries are swept first; the cap
    /// itself is advisory, so a burst of fresh entries may exceed it.
    pub fn insert(&mut self, key: String, reply: SearchReply) {
        if self.entries.len() >= self.max_entries {
            let ttl = self.ttl;
            let now = Utc::now();
            self.entries.retain(|_, entry| now - entry.cached_at < ttl);
        }
        self.entries.insert(
            key,
            CacheEntry {
                reply,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_entries,
            ttl_secs: self.ttl.num_seconds().max(0) as u64,
        }
    }

    #[cfg(test)]
    fn backdate(&mut self, key: &str, secs: i64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.cached_at -= Duration::seconds(secs);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

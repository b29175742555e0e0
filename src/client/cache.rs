// In-memory response cache for the dashboard data layer.
// Key = stable serialization of (operation, variables); entries expire by
// TTL on read and are evicted LRU when the cache is full.

use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub stored_at: Instant,
}

impl CacheEntry {
    fn new(data: Value) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
        }
    }

    fn is_live(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

pub struct ResponseCache {
    entries: LruCache<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Live entry for `key`, or None. Expired entries are dropped.
    pub fn get(&mut self, key: &str, ttl: Duration) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_live(ttl) => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.pop(key);
        }
        None
    }

    pub fn put(&mut self, key: String, data: Value) {
        self.entries.put(key, CacheEntry::new(data));
    }

    /// Drop every entry whose key starts with `prefix`; returns the count.
    /// Mutations call this for affected operations instead of relying on
    /// callers to force-refresh.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            self.entries.pop(key);
        }
        keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable cache key: the operation text plus a canonical (key-sorted)
/// rendering of the variables, so `{a:1,b:2}` and `{b:2,a:1}` collide.
pub fn cache_key(operation: &str, variables: &Value) -> String {
    format!("{}|{}", operation.trim(), canonicalize(variables))
}

fn canonicalize(value: &Value) -> String {
    fn sort(value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: std::collections::BTreeMap<&String, Value> =
                    map.iter().map(|(k, v)| (k, sort(v))).collect();
                serde_json::to_value(sorted).unwrap_or(Value::Null)
            }
            Value::Array(items) => Value::Array(items.iter().map(sort).collect()),
            other => other.clone(),
        }
    }
    sort(value).to_string()
}

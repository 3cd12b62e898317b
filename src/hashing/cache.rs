//! Bounded memo cache for content-set hashes

use indexmap::IndexMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use super::hasher::hash_file_set;

/// Default number of memoized digests
pub const DEFAULT_HASH_CACHE_CAPACITY: usize = 1024;

/// Content-set hasher with an insertion-ordered, capacity-bounded memo
///
/// Keys combine every file name with a fast digest of its content, so a
/// lookup costs far less than recomputing SHA-256. At capacity the oldest
/// inserted entry is evicted first.
#[derive(Debug)]
pub struct CachedHasher {
    capacity: usize,
    cache: Mutex<IndexMap<String, String>>,
}

impl CachedHasher {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            cache: Mutex::new(IndexMap::new()),
        }
    }

    fn cache_key<N, C>(files: &[(N, C)]) -> String
    where
        N: AsRef<str>,
        C: AsRef<[u8]>,
    {
        let mut parts: Vec<(&str, u64)> = files
            .iter()
            .map(|(name, content)| {
                let mut hasher = DefaultHasher::new();
                content.as_ref().hash(&mut hasher);
                (name.as_ref(), hasher.finish())
            })
            .collect();
        parts.sort();
        parts
            .iter()
            .map(|(name, digest)| format!("{}:{:016x}", name, digest))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Hash a named file set, reusing a memoized digest when available
    pub fn hash_file_set<N, C>(&self, files: &[(N, C)]) -> String
    where
        N: AsRef<str>,
        C: AsRef<[u8]>,
    {
        let key = Self::cache_key(files);
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        let digest = hash_file_set(files);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, digest.clone());
            while cache.len() > self.capacity {
                cache.shift_remove_index(0);
            }
        }
        digest
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CachedHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_CACHE_CAPACITY)
    }
}

//! Content Hasher
//!
//! Deterministic SHA-256 fingerprints for artifacts, used as the dedup key.

pub mod cache;
pub mod hasher;

pub use cache::{CachedHasher, DEFAULT_HASH_CACHE_CAPACITY};
pub use hasher::{hash_blob_set, hash_file_set, EMPTY_CONTENT_HASH, MAX_HASHABLE_FILE_SIZE};

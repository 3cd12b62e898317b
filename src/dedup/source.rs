//! Hash Sources
//!
//! Where the dedup engine gets an artifact's content hash from when the
//! artifact does not carry one yet.

use crate::artifact::{DetectedArtifact, TreeEntry};
use crate::hashing::{hash_blob_set, CachedHasher};
use std::collections::HashMap;

/// Supplies content hashes for artifacts
pub trait HashSource {
    /// Content hash for `artifact`, or `None` when it cannot be resolved
    fn hash_for(&self, artifact: &DetectedArtifact) -> Option<String>;
}

/// Blob-identity hashes from a remote tree listing
///
/// This is the authoritative source during live scans.
#[derive(Debug, Clone, Copy)]
pub struct TreeHashSource<'a> {
    entries: &'a [TreeEntry],
}

impl<'a> TreeHashSource<'a> {
    pub fn new(entries: &'a [TreeEntry]) -> Self {
        Self { entries }
    }
}

impl HashSource for TreeHashSource<'_> {
    fn hash_for(&self, artifact: &DetectedArtifact) -> Option<String> {
        let path = artifact.path.as_str();
        let covered = self.entries.iter().any(|e| {
            e.is_file_like()
                && (path.is_empty()
                    || e.path == path
                    || e.path
                        .strip_prefix(path)
                        .is_some_and(|rest| rest.starts_with('/')))
        });
        if covered {
            Some(hash_blob_set(path, self.entries))
        } else {
            log::debug!("No tree blobs found for '{}'; hash unresolved", path);
            None
        }
    }
}

/// Content hashes from in-memory file contents, memoized
#[derive(Debug, Default)]
pub struct FileContentHashSource {
    hasher: CachedHasher,
    files: HashMap<String, Vec<(String, String)>>,
}

impl FileContentHashSource {
    pub fn new(hasher: CachedHasher) -> Self {
        Self {
            hasher,
            files: HashMap::new(),
        }
    }

    /// Register the `(file name, content)` pairs of the artifact at `artifact_path`
    pub fn insert<P: Into<String>>(&mut self, artifact_path: P, files: Vec<(String, String)>) {
        self.files.insert(artifact_path.into(), files);
    }

    pub fn with_files<P: Into<String>>(mut self, artifact_path: P, files: Vec<(String, String)>) -> Self {
        self.insert(artifact_path, files);
        self
    }

    pub fn hasher(&self) -> &CachedHasher {
        &self.hasher
    }
}

impl HashSource for FileContentHashSource {
    fn hash_for(&self, artifact: &DetectedArtifact) -> Option<String> {
        let files = self.files.get(&artifact.path)?;
        Some(self.hasher.hash_file_set(files.as_slice()))
    }
}

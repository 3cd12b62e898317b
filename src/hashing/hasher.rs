//! Canonical content fingerprints
//!
//! Two hashing paths exist. [`hash_blob_set`] works purely from a remote tree
//! listing (relative path plus blob identity) and is authoritative for dedup
//! decisions during live scans. [`hash_file_set`] hashes raw file contents and
//! serves offline tooling and tests. The two never produce comparable digests
//! for the same artifact and must not be mixed within one dedup pass.

use crate::artifact::TreeEntry;
use sha2::{Digest, Sha256};

/// Files larger than this are left out of the content hash
pub const MAX_HASHABLE_FILE_SIZE: usize = 10 * 1024 * 1024;

/// SHA-256 of the empty string; the hash of an artifact with no hashable files
pub const EMPTY_CONTENT_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Path of `entry_path` relative to `artifact_path`, if the entry belongs to it
///
/// An entry equal to the artifact path (a single-file artifact) is keyed by its
/// file name so that the hash does not depend on where the file lives.
fn relative_to(artifact_path: &str, entry_path: &str) -> Option<String> {
    if artifact_path.is_empty() {
        return Some(entry_path.to_string());
    }
    if entry_path == artifact_path {
        let file_name = entry_path.rsplit('/').next().unwrap_or(entry_path);
        return Some(file_name.to_string());
    }
    entry_path
        .strip_prefix(artifact_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(str::to_string)
}

/// Hash an artifact from the blob identities of a tree listing
///
/// Collects every blob or symlink at or below `artifact_path`, forms
/// `"relpath:blobsha"` lines, sorts them and hashes the newline-joined result.
/// The result is independent of listing order and of the artifact's location.
pub fn hash_blob_set(artifact_path: &str, entries: &[TreeEntry]) -> String {
    let artifact_path = artifact_path.trim_matches('/');
    let mut lines: Vec<String> = entries
        .iter()
        .filter(|e| e.is_file_like())
        .filter_map(|e| relative_to(artifact_path, &e.path).map(|rel| format!("{}:{}", rel, e.sha)))
        .collect();
    lines.sort();
    sha256_hex(lines.join("\n").as_bytes())
}

/// Hash a set of named file contents
///
/// Files are sorted by name and framed as `---{name}---\n{content}\n`. Files
/// over [`MAX_HASHABLE_FILE_SIZE`] are skipped with a warning; if every file is
/// skipped the result is [`EMPTY_CONTENT_HASH`].
pub fn hash_file_set<N, C>(files: &[(N, C)]) -> String
where
    N: AsRef<str>,
    C: AsRef<[u8]>,
{
    let mut ordered: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(name, content)| (name.as_ref(), content.as_ref()))
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Sha256::new();
    for (name, content) in ordered {
        if content.len() > MAX_HASHABLE_FILE_SIZE {
            log::warn!(
                "Skipping '{}' from content hash: {} bytes exceeds the {} byte limit",
                name,
                content.len(),
                MAX_HASHABLE_FILE_SIZE
            );
            continue;
        }
        hasher.update(format!("---{}---\n", name).as_bytes());
        hasher.update(content);
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(&str, &str)]) -> Vec<TreeEntry> {
        items.iter().map(|(p, s)| TreeEntry::blob(*p, *s)).collect()
    }

    #[test]
    fn test_empty_file_set_is_empty_string_digest() {
        let files: Vec<(String, Vec<u8>)> = vec![];
        assert_eq!(hash_file_set(&files), EMPTY_CONTENT_HASH);
    }

    #[test]
    fn test_file_set_order_independent() {
        let a = hash_file_set(&[("SKILL.md", "hello"), ("run.py", "print(1)")]);
        let b = hash_file_set(&[("run.py", "print(1)"), ("SKILL.md", "hello")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_file_set_changes_with_name_or_content() {
        let base = hash_file_set(&[("SKILL.md", "hello")]);
        assert_ne!(base, hash_file_set(&[("SKILL.md", "hello!")]));
        assert_ne!(base, hash_file_set(&[("skill.md", "hello")]));
    }

    #[test]
    fn test_oversized_files_are_skipped() {
        let big = vec![b'x'; MAX_HASHABLE_FILE_SIZE + 1];
        let only_big = hash_file_set(&[("huge.bin", big.as_slice())]);
        assert_eq!(only_big, EMPTY_CONTENT_HASH);

        let small = hash_file_set(&[("SKILL.md", b"hi".as_slice())]);
        let mixed = hash_file_set(&[("SKILL.md", b"hi".as_slice()), ("huge.bin", big.as_slice())]);
        assert_eq!(small, mixed);
    }

    #[test]
    fn test_blob_set_is_listing_order_independent() {
        let forward = entries(&[("skills/a/SKILL.md", "1"), ("skills/a/run.py", "2")]);
        let reversed = entries(&[("skills/a/run.py", "2"), ("skills/a/SKILL.md", "1")]);
        assert_eq!(
            hash_blob_set("skills/a", &forward),
            hash_blob_set("skills/a", &reversed)
        );
    }

    #[test]
    fn test_blob_set_is_location_independent() {
        let here = entries(&[("skills/a/SKILL.md", "1"), ("skills/a/lib/x.py", "2")]);
        let there = entries(&[("vendor/pack/b/SKILL.md", "1"), ("vendor/pack/b/lib/x.py", "2")]);
        assert_eq!(
            hash_blob_set("skills/a", &here),
            hash_blob_set("vendor/pack/b", &there)
        );
    }

    #[test]
    fn test_blob_set_ignores_siblings_with_shared_prefix() {
        let listing = entries(&[("skills/a/SKILL.md", "1"), ("skills/ab/SKILL.md", "9")]);
        let only_a = entries(&[("skills/a/SKILL.md", "1")]);
        assert_eq!(
            hash_blob_set("skills/a", &listing),
            hash_blob_set("skills/a", &only_a)
        );
    }

    #[test]
    fn test_blob_set_single_file_uses_file_name() {
        let one = entries(&[("commands/review.md", "f1")]);
        let other = entries(&[("tools/commands/review.md", "f1")]);
        assert_eq!(
            hash_blob_set("commands/review.md", &one),
            hash_blob_set("tools/commands/review.md", &other)
        );
    }

    #[test]
    fn test_blob_set_skips_trees() {
        let mut listing = entries(&[("skills/a/SKILL.md", "1")]);
        listing.push(TreeEntry {
            path: "skills/a/lib".to_string(),
            entry_type: crate::artifact::TreeEntryType::Tree,
            sha: "tree-sha".to_string(),
            size: None,
        });
        assert_eq!(
            hash_blob_set("skills/a", &listing),
            hash_blob_set("skills/a", &entries(&[("skills/a/SKILL.md", "1")]))
        );
    }
}

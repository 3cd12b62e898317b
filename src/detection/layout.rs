//! Path Layout
//!
//! Directory view over a flat path listing: files grouped by parent directory
//! and the direct subdirectories of every directory.

use crate::detection::manual::{normalize_path, parent_path};
use std::collections::{BTreeMap, BTreeSet};

/// Split a normalized file path into (directory, file name)
pub fn split_file_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

/// Last segment of a normalized path
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Number of segments in a normalized path (root = 0)
pub fn segment_count(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split('/').count()
    }
}

/// True when `ancestor` is `path` or one of its ancestors
pub fn is_at_or_below(path: &str, ancestor: &str) -> bool {
    ancestor.is_empty()
        || path == ancestor
        || (path.starts_with(ancestor) && path.as_bytes().get(ancestor.len()) == Some(&b'/'))
}

/// Directory structure derived from file paths
#[derive(Debug, Default)]
pub struct PathLayout {
    files: Vec<String>,
    files_by_dir: BTreeMap<String, Vec<String>>,
    subdirs: BTreeMap<String, BTreeSet<String>>,
}

impl PathLayout {
    /// Build from file paths, skipping empties, duplicates and rejected paths
    pub fn build<'a, I, F>(paths: I, mut reject: F) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&str) -> bool,
    {
        let mut layout = Self::default();
        let mut seen = BTreeSet::new();
        for raw in paths {
            let path = normalize_path(raw);
            if path.is_empty() || reject(&path) || !seen.insert(path.clone()) {
                continue;
            }
            let (dir, name) = split_file_path(&path);
            layout
                .files_by_dir
                .entry(dir.to_string())
                .or_default()
                .push(name.to_string());

            let mut child = dir;
            while let Some(parent) = parent_path(child) {
                let inserted = layout
                    .subdirs
                    .entry(parent.to_string())
                    .or_default()
                    .insert(last_segment(child).to_string());
                if !inserted {
                    break;
                }
                child = parent;
            }
            layout.files.push(path);
        }
        layout
    }

    /// Normalized file paths in first-seen order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Directories that directly hold at least one file
    pub fn file_dirs(&self) -> impl Iterator<Item = &str> {
        self.files_by_dir.keys().map(String::as_str)
    }

    pub fn files_in(&self, dir: &str) -> &[String] {
        self.files_by_dir
            .get(dir)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn subdirs_of(&self, dir: &str) -> impl Iterator<Item = &str> {
        self.subdirs
            .get(dir)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_files_by_parent() {
        let layout = PathLayout::build(
            ["skills/a/SKILL.md", "skills/a/run.py", "README.md"],
            |_| false,
        );
        assert_eq!(layout.files_in("skills/a"), ["SKILL.md", "run.py"]);
        assert_eq!(layout.files_in(""), ["README.md"]);
        assert_eq!(layout.file_count(), 3);
    }

    #[test]
    fn test_tracks_direct_subdirectories() {
        let layout = PathLayout::build(["a/b/c/file.md", "a/d/file.md"], |_| false);
        let root: Vec<&str> = layout.subdirs_of("").collect();
        assert_eq!(root, ["a"]);
        let a: Vec<&str> = layout.subdirs_of("a").collect();
        assert_eq!(a, ["b", "d"]);
        let b: Vec<&str> = layout.subdirs_of("a/b").collect();
        assert_eq!(b, ["c"]);
    }

    #[test]
    fn test_rejects_and_dedupes() {
        let layout = PathLayout::build(
            ["./x/a.md", "x/a.md", "node_modules/p/a.md"],
            |p| p.starts_with("node_modules/"),
        );
        assert_eq!(layout.files(), ["x/a.md"]);
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(split_file_path("a/b/c.md"), ("a/b", "c.md"));
        assert_eq!(split_file_path("c.md"), ("", "c.md"));
        assert_eq!(segment_count(""), 0);
        assert_eq!(segment_count("a/b"), 2);
        assert!(is_at_or_below("skills/a/x", "skills/a"));
        assert!(is_at_or_below("skills/a", "skills/a"));
        assert!(!is_at_or_below("skills/ab", "skills/a"));
        assert!(is_at_or_below("anything", ""));
    }
}

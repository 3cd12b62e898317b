//! Within-source deduplication tests

#[cfg(test)]
mod tests {
    use super::super::{artifact, single_file};
    use crate::artifact::{ExcludedReason, ManualMappingProvenance, TreeEntry};
    use crate::dedup::{best_of, DedupEngine, DedupError, FileContentHashSource, TreeHashSource};
    use crate::hashing::CachedHasher;

    #[test]
    fn test_keeps_higher_confidence_duplicate() {
        let source = FileContentHashSource::new(CachedHasher::new(16))
            .with_files("skills/low", single_file("SKILL.md", "same"))
            .with_files("skills/high", single_file("SKILL.md", "same"));
        let engine = DedupEngine::new(source);

        let (kept, excluded) =
            engine.dedupe_within_source(vec![artifact("skills/low", 80), artifact("skills/high", 90)]);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, "skills/high");
        assert_eq!(excluded.len(), 1);
        let loser = &excluded[0];
        assert_eq!(loser.path, "skills/low");
        assert!(loser.is_excluded());
        assert_eq!(
            loser.metadata.excluded_reason,
            Some(ExcludedReason::DuplicateWithinSource)
        );
        assert_eq!(loser.metadata.duplicate_of.as_deref(), Some("skills/high"));
        assert_eq!(loser.content_hash(), kept[0].content_hash());
    }

    #[test]
    fn test_partition_covers_input() {
        let source = FileContentHashSource::default()
            .with_files("a", single_file("x.md", "one"))
            .with_files("b", single_file("x.md", "one"))
            .with_files("c", single_file("x.md", "one"))
            .with_files("d", single_file("x.md", "two"));
        let engine = DedupEngine::new(source);
        let input = vec![
            artifact("a", 50),
            artifact("b", 60),
            artifact("c", 40),
            artifact("d", 10),
            artifact("unhashed", 10),
        ];

        let (kept, excluded) = engine.dedupe_within_source(input);

        assert_eq!(kept.len() + excluded.len(), 5);
        let kept_paths: Vec<&str> = kept.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(kept_paths, ["b", "d", "unhashed"]);
        for loser in &excluded {
            let winner = kept
                .iter()
                .find(|k| k.content_hash() == loser.content_hash())
                .unwrap();
            assert_eq!(loser.metadata.duplicate_of.as_deref(), Some(winner.path.as_str()));
        }
    }

    #[test]
    fn test_tie_breaks_prefer_manual_then_shorter_path() {
        let source = FileContentHashSource::default()
            .with_files("skills/long/path", single_file("a", "z"))
            .with_files("skills/s", single_file("a", "z"))
            .with_files("vendor/manual/entry", single_file("a", "z"));
        let engine = DedupEngine::new(source);

        let mut manual = artifact("vendor/manual/entry", 70);
        manual.metadata.manual_mapping = Some(ManualMappingProvenance {
            mapped_path: "vendor/manual".to_string(),
            depth: 1,
        });
        let (kept, _) = engine.dedupe_within_source(vec![
            artifact("skills/long/path", 70),
            artifact("skills/s", 70),
            manual.clone(),
        ]);
        assert_eq!(kept[0].path, "vendor/manual/entry");

        let (kept, _) =
            engine.dedupe_within_source(vec![artifact("skills/long/path", 70), artifact("skills/s", 70)]);
        assert_eq!(kept[0].path, "skills/s");
    }

    #[test]
    fn test_best_of_empty_group_is_an_error() {
        let empty: Vec<crate::artifact::DetectedArtifact> = Vec::new();
        assert_eq!(best_of(&empty).unwrap_err(), DedupError::EmptyGroup);

        let group = [artifact("a", 10), artifact("b", 20)];
        assert_eq!(best_of(&group).unwrap().path, "b");
    }

    #[test]
    fn test_find_duplicates_skips_singletons() {
        let source = FileContentHashSource::default()
            .with_files("a", single_file("f", "1"))
            .with_files("b", single_file("f", "1"))
            .with_files("c", single_file("f", "2"));
        let engine = DedupEngine::new(source);
        let mut artifacts = vec![artifact("a", 1), artifact("b", 1), artifact("c", 1)];

        let groups = engine.find_duplicates(&mut artifacts);
        assert_eq!(groups.len(), 1);
        let paths: Vec<&str> = groups[0].iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, ["a", "b"]);
    }

    #[test]
    fn test_tree_hashes_survive_relocation() {
        let entries = vec![
            TreeEntry::blob("skills/pdf/SKILL.md", "111"),
            TreeEntry::blob("skills/pdf/run.py", "222"),
            TreeEntry::blob("plugins/x/skills/pdf/run.py", "222"),
            TreeEntry::blob("plugins/x/skills/pdf/SKILL.md", "111"),
            TreeEntry::blob("skills/other/SKILL.md", "333"),
        ];
        let engine = DedupEngine::new(TreeHashSource::new(&entries));

        let (kept, excluded) = engine.dedupe_within_source(vec![
            artifact("skills/pdf", 50),
            artifact("plugins/x/skills/pdf", 60),
            artifact("skills/other", 50),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].path, "skills/pdf");
        assert_eq!(
            excluded[0].metadata.duplicate_of.as_deref(),
            Some("plugins/x/skills/pdf")
        );
    }

    #[test]
    fn test_precomputed_hash_is_reused() {
        let engine = DedupEngine::new(FileContentHashSource::default());
        let mut a = artifact("a", 10);
        let mut b = artifact("b", 20);
        a.metadata.content_hash = Some("h".to_string());
        b.metadata.content_hash = Some("h".to_string());

        let (kept, excluded) = engine.dedupe_within_source(vec![a, b]);
        assert_eq!(kept[0].path, "b");
        assert_eq!(excluded[0].path, "a");
    }
}

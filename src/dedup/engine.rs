//! Deduplication Engine
//!
//! Groups artifacts by content hash and resolves each group to one kept
//! artifact. Within-source dedup marks losers with the winner's path;
//! cross-source dedup excludes anything whose hash is already indexed.
//! Neither stage touches storage: the only side effect is annotating the
//! artifacts passed in.

use crate::artifact::{DetectedArtifact, ExcludedReason};
use crate::dedup::error::{DedupError, DedupResult};
use crate::dedup::source::HashSource;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Preference order inside a duplicate group: higher confidence, then manual
/// mappings, then the shorter path
fn rank(a: &DetectedArtifact, b: &DetectedArtifact) -> Ordering {
    b.confidence_score
        .cmp(&a.confidence_score)
        .then_with(|| b.is_manual().cmp(&a.is_manual()))
        .then_with(|| a.path.len().cmp(&b.path.len()))
}

/// Pick the preferred artifact of a group; ties keep the earliest
pub fn best_of<'a, I>(group: I) -> DedupResult<&'a DetectedArtifact>
where
    I: IntoIterator<Item = &'a DetectedArtifact>,
{
    group
        .into_iter()
        .min_by(|a, b| rank(a, b))
        .ok_or(DedupError::EmptyGroup)
}

/// Outcome of a dedup pass: kept artifacts and excluded ones, each in input order
pub type Partition = (Vec<DetectedArtifact>, Vec<DetectedArtifact>);

#[derive(Debug, Clone)]
pub struct DedupEngine<S> {
    source: S,
}

impl<S: HashSource> DedupEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Content hash of `artifact`, computed and stored on first use
    fn ensure_hash(&self, artifact: &mut DetectedArtifact) -> Option<String> {
        if let Some(hash) = artifact.content_hash() {
            return Some(hash.to_string());
        }
        let hash = self.source.hash_for(artifact)?;
        artifact.metadata.content_hash = Some(hash.clone());
        Some(hash)
    }

    /// Indices grouped by hash in first-seen order; unresolved artifacts are left out
    fn group_indices(&self, artifacts: &mut [DetectedArtifact]) -> IndexMap<String, Vec<usize>> {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, artifact) in artifacts.iter_mut().enumerate() {
            match self.ensure_hash(artifact) {
                Some(hash) => groups.entry(hash).or_default().push(index),
                None => log::warn!(
                    "Content hash unavailable for '{}'; treating as unique",
                    artifact.path
                ),
            }
        }
        groups
    }

    /// Groups of two or more artifacts sharing a content hash
    pub fn find_duplicates<'a>(
        &self,
        artifacts: &'a mut [DetectedArtifact],
    ) -> Vec<Vec<&'a DetectedArtifact>> {
        let groups = self.group_indices(artifacts);
        let artifacts: &'a [DetectedArtifact] = artifacts;
        groups
            .into_values()
            .filter(|members| members.len() > 1)
            .map(|members| members.into_iter().map(|i| &artifacts[i]).collect())
            .collect()
    }

    /// Keep one artifact per content hash, excluding the rest as within-source duplicates
    pub fn dedupe_within_source(&self, mut artifacts: Vec<DetectedArtifact>) -> Partition {
        let groups = self.group_indices(&mut artifacts);

        for members in groups.values().filter(|m| m.len() > 1) {
            let Some(&winner) = members
                .iter()
                .min_by(|a, b| rank(&artifacts[**a], &artifacts[**b]))
            else {
                continue;
            };
            let winner_path = artifacts[winner].path.clone();
            log::debug!(
                "Keeping '{}' over {} duplicate(s)",
                winner_path,
                members.len() - 1
            );
            for &loser in members.iter().filter(|&&i| i != winner) {
                artifacts[loser].exclude(
                    ExcludedReason::DuplicateWithinSource,
                    Some(winner_path.clone()),
                );
            }
        }

        artifacts.into_iter().partition(|a| !a.is_excluded())
    }

    /// Exclude artifacts whose content hash is already present in `existing`
    pub fn dedupe_cross_source(
        &self,
        artifacts: Vec<DetectedArtifact>,
        existing: &HashSet<String>,
    ) -> Partition {
        let mut unique = Vec::with_capacity(artifacts.len());
        let mut excluded = Vec::new();
        for mut artifact in artifacts {
            let known = self
                .ensure_hash(&mut artifact)
                .is_some_and(|hash| existing.contains(&hash));
            if known {
                log::debug!("'{}' is already indexed elsewhere", artifact.path);
                artifact.exclude(ExcludedReason::DuplicateCrossSource, None);
                excluded.push(artifact);
            } else {
                unique.push(artifact);
            }
        }
        (unique, excluded)
    }
}

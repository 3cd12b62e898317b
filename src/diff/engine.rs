//! Catalog Diff Engine
//!
//! Reconciles a prior catalog snapshot with freshly detected artifacts,
//! joined on `upstream_url`.

use crate::artifact::DetectedArtifact;
use crate::diff::types::{CatalogRow, ChangeType, DiffEntry, DiffResult};
use indexmap::IndexMap;

fn is_updated(prior: &CatalogRow, fresh: &DetectedArtifact) -> bool {
    match fresh.detected_sha.as_deref() {
        Some(sha) if !sha.is_empty() => prior.detected_sha.as_deref() != Some(sha),
        _ => false,
    }
}

fn fresh_entry(change_type: ChangeType, fresh: &DetectedArtifact, prior: Option<&CatalogRow>) -> DiffEntry {
    let carries_data = matches!(change_type, ChangeType::New | ChangeType::Updated);
    DiffEntry {
        change_type,
        upstream_url: fresh.upstream_url.clone(),
        artifact_type: fresh.artifact_type,
        name: fresh.name.clone(),
        path: fresh.path.clone(),
        old_sha: prior.and_then(|p| p.detected_sha.clone()),
        new_sha: fresh.detected_sha.clone(),
        old_version: prior.and_then(|p| p.detected_version.clone()),
        new_version: fresh.detected_version.clone(),
        existing_entry_id: prior.map(|p| p.id.clone()),
        data: carries_data.then(|| fresh.clone()),
    }
}

fn removed_entry(prior: &CatalogRow) -> DiffEntry {
    DiffEntry {
        change_type: ChangeType::Removed,
        upstream_url: prior.upstream_url.clone(),
        artifact_type: prior.artifact_type,
        name: prior.name.clone(),
        path: prior.path.clone(),
        old_sha: prior.detected_sha.clone(),
        new_sha: None,
        old_version: prior.detected_version.clone(),
        new_version: None,
        existing_entry_id: Some(prior.id.clone()),
        data: None,
    }
}

/// Classify every artifact as new, updated, removed or unchanged
///
/// New, updated and unchanged entries follow the order of `fresh`; removed
/// entries follow the order of `prior`. Repeated join keys keep their first
/// occurrence.
pub fn diff_catalog(prior: &[CatalogRow], fresh: &[DetectedArtifact]) -> DiffResult {
    let mut prior_by_url: IndexMap<&str, &CatalogRow> = IndexMap::new();
    for row in prior {
        prior_by_url.entry(row.upstream_url.as_str()).or_insert(row);
    }
    let mut fresh_by_url: IndexMap<&str, &DetectedArtifact> = IndexMap::new();
    for artifact in fresh {
        fresh_by_url
            .entry(artifact.upstream_url.as_str())
            .or_insert(artifact);
    }

    let mut result = DiffResult::default();
    for (url, artifact) in &fresh_by_url {
        match prior_by_url.get(url) {
            None => result.new.push(fresh_entry(ChangeType::New, artifact, None)),
            Some(row) if is_updated(row, artifact) => {
                result
                    .updated
                    .push(fresh_entry(ChangeType::Updated, artifact, Some(*row)))
            }
            Some(row) => result
                .unchanged
                .push(fresh_entry(ChangeType::Unchanged, artifact, Some(*row))),
        }
    }
    for (url, row) in &prior_by_url {
        if !fresh_by_url.contains_key(url) {
            result.removed.push(removed_entry(row));
        }
    }

    log::debug!(
        "Catalog diff: {} new, {} updated, {} removed, {} unchanged",
        result.new_count(),
        result.updated_count(),
        result.removed_count(),
        result.unchanged_count()
    );
    result
}

//! Scan Orchestrator
//!
//! Runs one scan end to end: fetch the tree, detect, hash, deduplicate,
//! diff against the prior catalog and plan the next fetch. A scan always
//! produces a [`ScanResult`]; failures are reported through its `status` and
//! `errors` fields.

use crate::artifact::{DetectedArtifact, TreeEntry, UpstreamContext};
use crate::config::ScanConfig;
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::dedup::{DedupEngine, TreeHashSource};
use crate::detection::layout::is_at_or_below;
use crate::detection::{normalize_path, Detector};
use crate::diff::diff_catalog;
use crate::planner::{should_reindex, ClonePlanner};
use crate::scanner::error::{ScanError, SourceError};
use crate::scanner::metadata::{enrich, MetadataExtractor};
use crate::scanner::source::{RepoTree, RepositorySource};
use crate::scanner::types::{ScanRequest, ScanResult, ScanStatus};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for [`ArtifactScanner`]
pub struct ArtifactScannerBuilder {
    source: Arc<dyn RepositorySource>,
    config: ScanConfig,
    metadata: Option<Arc<dyn MetadataExtractor>>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ArtifactScannerBuilder {
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self {
            source,
            config: ScanConfig::default(),
            metadata: None,
            time_provider: Arc::new(SystemTimeProvider),
        }
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metadata_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.metadata = Some(extractor);
        self
    }

    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    pub fn build(self) -> ArtifactScanner {
        let detector = Detector::new(self.config.detection_config());
        let planner = ClonePlanner::new().with_strategy_override(self.config.strategy);
        ArtifactScanner {
            config: self.config,
            detector,
            planner,
            source: self.source,
            metadata: self.metadata,
            time_provider: self.time_provider,
        }
    }
}

/// Discovers and indexes artifacts in remote repositories
pub struct ArtifactScanner {
    config: ScanConfig,
    detector: Detector,
    planner: ClonePlanner,
    source: Arc<dyn RepositorySource>,
    metadata: Option<Arc<dyn MetadataExtractor>>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ArtifactScanner {
    pub fn builder(source: Arc<dyn RepositorySource>) -> ArtifactScannerBuilder {
        ArtifactScannerBuilder::new(source)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan one repository
    pub async fn scan(&self, request: &ScanRequest) -> ScanResult {
        let started = self.time_provider.now();
        let mut result = ScanResult::started(request, self.time_provider.utc_now());

        if let Err(error) = self.run(request, &mut result).await {
            log::error!("Scan of {} failed: {}", request.source_label(), error);
            result.status = ScanStatus::Error;
            result.errors.push(error.to_string());
        }

        let elapsed = self.time_provider.now().saturating_duration_since(started);
        result.scan_duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Scanned {} ({}): {} detected, {} unique, {} duplicate(s), {} new in {}ms",
            request.source_label(),
            result.status,
            result.total_detected,
            result.total_unique,
            result.duplicates(),
            result.new_count,
            result.scan_duration_ms
        );
        result
    }

    /// Scan independent repositories concurrently; results follow request order
    pub async fn scan_many(&self, requests: &[ScanRequest]) -> Vec<ScanResult> {
        join_all(requests.iter().map(|request| self.scan(request))).await
    }

    async fn run(&self, request: &ScanRequest, result: &mut ScanResult) -> Result<(), ScanError> {
        let (tree, git_ref) = self.fetch_tree(request).await?;
        if tree.truncated {
            log::warn!(
                "Tree listing for {} was truncated by the remote",
                request.source_label()
            );
        }
        result.git_ref = Some(git_ref.clone());
        result.tree_sha = Some(tree.sha.clone());
        result.truncated = tree.truncated;

        let entries = self.select_entries(request, tree.entries, result);

        result.commit_sha = match self
            .source
            .resolve_commit(&request.owner, &request.repo, &git_ref)
            .await
        {
            Ok(sha) => Some(sha),
            Err(e) => {
                log::warn!(
                    "Could not resolve commit for {}@{}: {}",
                    request.source_label(),
                    git_ref,
                    e
                );
                None
            }
        };

        if self.config.skip_unchanged && !should_reindex(request.cached_target.as_ref(), &tree.sha) {
            log::debug!(
                "Tree {} of {} is unchanged; skipping detection",
                tree.sha,
                request.source_label()
            );
            result.tree_unchanged = true;
            result.clone_target = request.cached_target.clone();
            return Ok(());
        }

        let mut artifacts = self.detect(request, &entries, &git_ref, result.commit_sha.as_deref());
        if let Some(extractor) = &self.metadata {
            for artifact in artifacts.iter_mut() {
                enrich(artifact, extractor.as_ref());
            }
        }
        result.total_detected = artifacts.len();

        let engine = DedupEngine::new(TreeHashSource::new(&entries));
        let (mut kept, mut excluded) = engine.dedupe_within_source(artifacts);
        result.duplicates_within_source = excluded.len();
        if let Some(existing) = &request.existing_hashes {
            let (unique, known) = engine.dedupe_cross_source(kept, existing);
            result.duplicates_cross_source = known.len();
            kept = unique;
            excluded.extend(known);
        }
        result.total_unique = kept.len();
        log::debug!(
            "{}: {} kept, {} excluded",
            request.source_label(),
            kept.len(),
            excluded.len()
        );

        result.new_count = match &request.prior_catalog {
            Some(prior) => {
                let diff = diff_catalog(prior, &kept);
                let new_count = diff.new_count();
                result.diff = Some(diff);
                new_count
            }
            None => kept.len(),
        };

        let known_paths: HashSet<String> = entries.iter().map(|e| e.path.clone()).collect();
        result.clone_target = Some(self.planner.plan(
            &kept,
            &tree.sha,
            Some(&known_paths),
            self.time_provider.utc_now(),
        ));

        kept.extend(excluded);
        result.artifacts = kept;
        Ok(())
    }

    /// Fetch the tree, falling back once to the actual default branch when
    /// the configured default ref does not exist
    async fn fetch_tree(&self, request: &ScanRequest) -> Result<(RepoTree, String), SourceError> {
        let requested = request
            .git_ref
            .clone()
            .unwrap_or_else(|| self.config.default_ref.clone());

        match self
            .source
            .fetch_tree(&request.owner, &request.repo, &requested)
            .await
        {
            Ok(tree) => Ok((tree, requested)),
            Err(e) if e.is_not_found() && request.git_ref.is_none() => {
                let branch = self
                    .source
                    .default_branch(&request.owner, &request.repo)
                    .await?;
                if branch == requested {
                    return Err(e);
                }
                log::warn!(
                    "Ref '{}' not found in {}; falling back to default branch '{}'",
                    requested,
                    request.source_label(),
                    branch
                );
                let tree = self
                    .source
                    .fetch_tree(&request.owner, &request.repo, &branch)
                    .await?;
                Ok((tree, branch))
            }
            Err(e) => Err(e),
        }
    }

    /// File entries under the root hint, capped at `max-paths`
    fn select_entries(
        &self,
        request: &ScanRequest,
        entries: Vec<TreeEntry>,
        result: &mut ScanResult,
    ) -> Vec<TreeEntry> {
        let root = request
            .root_hint
            .as_deref()
            .map(normalize_path)
            .unwrap_or_default();

        let mut selected: Vec<TreeEntry> = entries
            .into_iter()
            .filter(|e| e.is_file_like() && is_at_or_below(&e.path, &root))
            .collect();

        if selected.len() > self.config.max_paths {
            log::warn!(
                "{} lists {} files; only the first {} are scanned",
                request.source_label(),
                selected.len(),
                self.config.max_paths
            );
            selected.truncate(self.config.max_paths);
            result.truncated = true;
        }
        selected
    }

    fn detect(
        &self,
        request: &ScanRequest,
        entries: &[TreeEntry],
        git_ref: &str,
        commit_sha: Option<&str>,
    ) -> Vec<DetectedArtifact> {
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        let manual = request
            .manual_mappings
            .as_ref()
            .unwrap_or(&self.config.manual_mappings);
        let matches = match &request.contents {
            Some(contents) => self
                .detector
                .detect_with_content(paths.as_slice(), contents, manual),
            None => self.detector.detect(paths.as_slice(), manual),
        };

        let ctx = UpstreamContext::new(&request.owner, &request.repo, git_ref)
            .with_template(&self.config.upstream_url_template);
        matches
            .iter()
            .filter_map(|m| DetectedArtifact::from_match(m, &ctx, commit_sha))
            .collect()
    }
}

//! Scan inputs read from disk
//!
//! Every optional input named on the command line is loaded here and folded
//! into a `ScanRequest`.

use crate::app::cli::args::Args;
use crate::diff::CatalogRow;
use crate::planner::CloneTarget;
use crate::scanner::{ScanError, ScanRequest};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Read and deserialize a JSON file
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ScanError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ScanError::unreadable(path, &e))?;
    serde_json::from_str(&contents).map_err(|e| ScanError::unparsable(path, &e))
}

async fn load_optional<T: DeserializeOwned>(path: Option<&Path>) -> Result<Option<T>, ScanError> {
    match path {
        Some(path) => load_json(path).await.map(Some),
        None => Ok(None),
    }
}

/// Assemble the scan request described by `args`
pub async fn build_request(args: &Args) -> Result<ScanRequest, ScanError> {
    let mut request = ScanRequest::new(&args.owner, &args.repo);
    request.git_ref = args.git_ref.clone();
    request.root_hint = args.root_hint.clone();
    request.existing_hashes =
        load_optional::<HashSet<String>>(args.existing_hashes.as_deref()).await?;
    request.prior_catalog = load_optional::<Vec<CatalogRow>>(args.catalog.as_deref()).await?;
    request.cached_target = load_optional::<CloneTarget>(args.cached_target.as_deref()).await?;
    request.contents = load_optional::<HashMap<String, String>>(args.contents.as_deref()).await?;

    log::debug!(
        "Request for {}: {} existing hash(es), {} catalog row(s), cached target: {}",
        request.source_label(),
        request.existing_hashes.as_ref().map_or(0, HashSet::len),
        request.prior_catalog.as_ref().map_or(0, Vec::len),
        request.cached_target.is_some()
    );
    Ok(request)
}

/// Persist the clone target for the next scan
pub async fn save_target(path: &Path, target: &CloneTarget) -> Result<(), ScanError> {
    let json = target.to_json().map_err(|e| ScanError::Input {
        message: format!("Failed to serialize clone target: {}", e),
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| ScanError::Input {
            message: format!("Failed to write {}: {}", path.display(), e),
        })
}

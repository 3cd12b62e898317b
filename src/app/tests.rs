//! Tests for output rendering and the application run loop

use crate::app::cli::args::Args;
use crate::app::output::{render, render_table, OutputFormat};
use crate::app::startup::{run, EXIT_FAILURE, EXIT_SUCCESS};
use crate::artifact::{ArtifactType, DetectedArtifact, ExcludedReason, SignalScores};
use crate::planner::CloneTarget;
use crate::scanner::{ScanRequest, ScanResult, ScanStatus};
use chrono::{TimeZone, Utc};
use clap::Parser;
use tempfile::TempDir;

fn artifact(path: &str, excluded: Option<&str>) -> DetectedArtifact {
    let mut artifact = DetectedArtifact {
        artifact_type: ArtifactType::Skill,
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        upstream_url: format!("https://github.com/acme/tools/tree/main/{}", path),
        confidence_score: 43,
        detected_sha: None,
        detected_version: None,
        raw_score: 51,
        signals: SignalScores::default(),
        single_file: false,
        metadata: Default::default(),
    };
    if let Some(winner) = excluded {
        artifact.exclude(ExcludedReason::DuplicateWithinSource, Some(winner.to_string()));
    }
    artifact
}

fn sample_result() -> ScanResult {
    let mut result = ScanResult::started(
        &ScanRequest::new("acme", "tools"),
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    );
    result.git_ref = Some("main".to_string());
    result.artifacts = vec![
        artifact("skills/alpha", None),
        artifact("skills/alpha-copy", Some("skills/alpha")),
    ];
    result.total_detected = 2;
    result.total_unique = 1;
    result.duplicates_within_source = 1;
    result.new_count = 1;
    result
}

#[test]
fn test_output_format_parsing() {
    assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
    assert_eq!(OutputFormat::parse("TABLE"), OutputFormat::Table);
    assert_eq!(OutputFormat::parse("other"), OutputFormat::Table);
}

#[test]
fn test_table_lists_artifacts_and_summary() {
    let text = render_table(&sample_result(), false);

    assert!(text.contains("skills/alpha-copy"));
    assert!(text.contains("duplicate_within_source of skills/alpha"));
    assert!(text.contains("kept"));
    assert!(text.contains("acme/tools @ main (success)"));
    assert!(text.contains("detected 2, unique 1, duplicates 1 within / 0 cross, new 1"));
}

#[test]
fn test_table_reports_errors() {
    let mut result = ScanResult::started(
        &ScanRequest::new("acme", "tools"),
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    );
    result.status = ScanStatus::Error;
    result.errors.push("Rate limit exceeded: try later".to_string());

    let text = render_table(&result, false);

    assert!(text.contains("(error)"));
    assert!(text.contains("error: Rate limit exceeded: try later"));
}

#[test]
fn test_json_uses_camel_case_fields() {
    let text = render(&sample_result(), OutputFormat::Json, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["status"], "success");
    assert_eq!(value["totalDetected"], 2);
    assert_eq!(value["duplicatesWithinSource"], 1);
    assert_eq!(value["scannedAt"], "2023-11-14T22:13:20Z");
    assert_eq!(value["artifacts"].as_array().unwrap().len(), 2);
}

const TREE: &str = r#"{
    "sha": "tree-1",
    "commit": "commit-1",
    "tree": [
        {"path": "skills/canvas/SKILL.md", "type": "blob", "sha": "b1"},
        {"path": "skills/canvas/index.ts", "type": "blob", "sha": "b2"}
    ]
}"#;

fn cli(dir: &TempDir, extra: &[&str]) -> Args {
    let tree = dir.path().join("tree.json");
    std::fs::write(&tree, TREE).unwrap();
    let tree = tree.to_string_lossy().to_string();
    let mut argv = vec![
        "reposcout",
        "--tree",
        tree.as_str(),
        "--owner",
        "acme",
        "--repo",
        "tools",
        "--format",
        "json",
    ];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_run_saves_clone_target() {
    let dir = TempDir::new().unwrap();
    let target_path = dir.path().join("target.json");
    let target_arg = target_path.to_string_lossy().to_string();
    let args = cli(&dir, &["--save-target", target_arg.as_str()]);

    assert_eq!(run(args, false).await, EXIT_SUCCESS);

    let saved = std::fs::read_to_string(&target_path).unwrap();
    let target = CloneTarget::from_json(&saved).unwrap();
    assert_eq!(target.tree_sha, "tree-1");
    assert_eq!(target.artifact_paths, ["skills/canvas"]);
}

#[tokio::test]
async fn test_run_fails_on_missing_tree() {
    let dir = TempDir::new().unwrap();
    let mut args = cli(&dir, &[]);
    args.tree = dir.path().join("absent.json");

    assert_eq!(run(args, false).await, EXIT_FAILURE);
}

#[tokio::test]
async fn test_run_fails_on_invalid_override() {
    let dir = TempDir::new().unwrap();
    let args = cli(&dir, &["--max-paths", "0"]);

    assert_eq!(run(args, false).await, EXIT_FAILURE);
}

#[tokio::test]
async fn test_run_fails_on_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let mut args = cli(&dir, &[]);
    args.config_file = Some(dir.path().join("absent.toml"));

    assert_eq!(run(args, false).await, EXIT_FAILURE);
}

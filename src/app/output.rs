//! Scan result rendering

use crate::artifact::DetectedArtifact;
use crate::scanner::ScanResult;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use std::fmt::Write;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }
}

pub fn render(result: &ScanResult, format: OutputFormat, color: bool) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result),
        OutputFormat::Table => Ok(render_table(result, color)),
    }
}

fn status_of(artifact: &DetectedArtifact) -> String {
    match (&artifact.metadata.excluded_reason, &artifact.metadata.duplicate_of) {
        (Some(reason), Some(of)) => format!("{} of {}", reason, of),
        (Some(reason), None) => reason.to_string(),
        (None, _) => "kept".to_string(),
    }
}

fn cell(text: &str, spec: &str, color: bool) -> Cell {
    let cell = Cell::new(text);
    if color {
        cell.style_spec(spec)
    } else {
        cell
    }
}

/// Artifact table followed by a summary block
pub fn render_table(result: &ScanResult, color: bool) -> String {
    let mut out = String::new();

    if !result.artifacts.is_empty() {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(Row::new(
            ["Type", "Name", "Path", "Conf", "Status"]
                .iter()
                .map(|t| cell(t, "bFc", color))
                .collect(),
        ));
        for artifact in &result.artifacts {
            let status_spec = if artifact.is_excluded() { "Fy" } else { "Fg" };
            table.add_row(Row::new(vec![
                Cell::new(&artifact.artifact_type.to_string()),
                Cell::new(&artifact.name),
                Cell::new(&artifact.path),
                Cell::new(&artifact.confidence_score.to_string()).style_spec("r"),
                cell(&status_of(artifact), status_spec, color),
            ]));
        }
        let _ = writeln!(out, "{}", table);
    }

    let heading = format!("{}/{}", result.owner, result.repo);
    let status = result.status.to_string();
    let _ = writeln!(
        out,
        "{} @ {} ({})",
        if color { heading.bold().to_string() } else { heading },
        result.git_ref.as_deref().unwrap_or("-"),
        if color && !result.is_success() {
            status.red().to_string()
        } else {
            status
        }
    );
    if result.tree_unchanged {
        let _ = writeln!(out, "  tree unchanged since last scan");
    }
    let _ = writeln!(
        out,
        "  detected {}, unique {}, duplicates {} within / {} cross, new {}",
        result.total_detected,
        result.total_unique,
        result.duplicates_within_source,
        result.duplicates_cross_source,
        result.new_count
    );
    if let Some(diff) = &result.diff {
        let _ = writeln!(
            out,
            "  catalog: {} new, {} updated, {} removed, {} unchanged",
            diff.new_count(),
            diff.updated_count(),
            diff.removed_count(),
            diff.unchanged_count()
        );
    }
    if let Some(target) = &result.clone_target {
        let _ = writeln!(
            out,
            "  clone: {} ({} pattern(s))",
            target.strategy,
            target.sparse_patterns.len()
        );
    }
    if result.truncated {
        let _ = writeln!(out, "  listing truncated");
    }
    for error in &result.errors {
        let _ = writeln!(out, "  error: {}", error);
    }
    let _ = write!(out, "  scanned in {}ms", result.scan_duration_ms);
    out
}

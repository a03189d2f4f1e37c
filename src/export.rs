// src/export.rs
//! JSON run report: stats, per-source outcomes and the new matches.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::models::{FetchResult, Match, RunStats};

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub stats: &'a RunStats,
    pub results: &'a [FetchResult],
    pub matches: &'a [Match],
}

impl<'a> RunReport<'a> {
    pub fn new(stats: &'a RunStats, results: &'a [FetchResult], matches: &'a [Match]) -> Self {
        Self {
            generated_at: Utc::now(),
            stats,
            results,
            matches,
        }
    }

    /// `jobs_combined_YYYY-MM-DD_HH-MM-SS.json`
    pub fn file_name(&self) -> String {
        format!(
            "jobs_combined_{}.json",
            self.generated_at.format("%Y-%m-%d_%H-%M-%S")
        )
    }
}

/// Write `report` into `dir` and return the file path.
pub fn write_report(dir: &Path, report: &RunReport<'_>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(report.file_name());
    let body = serde_json::to_vec_pretty(report).context("serialize run report")?;
    std::fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), matches = report.matches.len(), "run report exported");
    Ok(path)
}

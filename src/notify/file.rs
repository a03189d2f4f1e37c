// src/notify/file.rs
use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{render_report, Notifier};
use crate::models::{Match, RunStats};

/// Writes the report to a file, replacing the previous run's report.
pub struct FileNotifier {
    path: PathBuf,
}

impl FileNotifier {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl Notifier for FileNotifier {
    fn name(&self) -> &str {
        "file"
    }

    async fn notify(&self, matches: &[Match], stats: &RunStats) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create {}", dir.display()))?;
        }
        tokio::fs::write(&self.path, render_report(matches, stats))
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        tracing::debug!(target: "notify", path = %self.path.display(), "report written");
        Ok(())
    }
}

// src/metrics.rs
//! Run counters. Series are recorded through the `metrics` facade; with a Prometheus
//! recorder installed they can be dumped to a textfile after each run
//! (node_exporter textfile collector format).

use anyhow::Context as _;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::path::Path;

use crate::models::{FetchResult, RunStats};

/// One-time metrics registration (so series carry HELP lines).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("radar_fetch_total", "Source fetches, labelled by outcome.");
        describe_counter!(
            "radar_postings_fetched_total",
            "Classified postings returned by sources."
        );
        describe_counter!(
            "radar_board_errors_total",
            "Greenhouse company boards that failed inside an otherwise healthy source."
        );
        describe_counter!("radar_matches_total", "Postings emitted as matches.");
        describe_histogram!("radar_fetch_ms", "Per-source fetch time in milliseconds.");
        describe_gauge!("radar_last_run_ts", "Unix ts when the last run finished.");
        describe_gauge!("radar_last_run_new", "New postings in the last run.");
    });
}

pub fn record_fetch(result: &FetchResult) {
    let outcome = match &result.error {
        None => "ok",
        Some(e) => e.kind(),
    };
    counter!("radar_fetch_total", "source" => result.source_name.clone(), "outcome" => outcome)
        .increment(1);
    counter!("radar_postings_fetched_total", "source" => result.source_name.clone())
        .increment(result.postings.len() as u64);
    histogram!("radar_fetch_ms").record(result.elapsed.as_secs_f64() * 1000.0);
}

pub fn record_run(stats: &RunStats) {
    counter!("radar_matches_total").increment(stats.relevant_found as u64);
    gauge!("radar_last_run_new").set(stats.new_found as f64);
    gauge!("radar_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
}

/// Install the Prometheus recorder once per process; later calls return the same handle.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();
    HANDLE
        .get_or_try_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .context("prometheus: install recorder")
        })
        .cloned()
}

/// Render the current exposition text to `path` (tmp + rename).
pub fn write_textfile(handle: &PrometheusHandle, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, handle.render()).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

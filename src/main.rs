//! job-radar binary entrypoint.
//! One pass: load config, fetch all sources, filter against the seen ledger,
//! notify, export, persist.
//!
//! Usage: `job-radar [config.toml|config.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use job_radar::export::{write_report, RunReport};
use job_radar::{keywords, metrics, run_once, AppConfig, NotifierMux, SeenStore};

/// Compact logs by default, JSON lines with `JOB_RADAR_LOG_JSON=1`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("job_radar=info,warn"));
    let json = std::env::var("JOB_RADAR_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::load_from(&path)
            .with_context(|| format!("config {}", path.display())),
        None => AppConfig::load_default().context("config"),
    }
}

// Ledger problems never stop a run. The fallback store has no path, so an unreadable
// ledger is never overwritten.
fn load_seen(cfg: &AppConfig) -> SeenStore {
    match SeenStore::load(&cfg.seen_jobs_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "seen store unusable, continuing in memory");
            SeenStore::in_memory()
        }
    }
}

async fn run(cfg: AppConfig, kws: Vec<String>) -> anyhow::Result<()> {
    let prom = match cfg.metrics_path {
        Some(_) => Some(metrics::install_recorder()?),
        None => None,
    };
    metrics::ensure_described();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling in-flight fetches");
                cancel.cancel();
            }
        });
    }

    let mut seen = load_seen(&cfg);

    let outcome = run_once(&cfg, kws, &mut seen, &cancel).await?;

    NotifierMux::from_config(&cfg)
        .notify(&outcome.matches, &outcome.stats)
        .await;

    if let Some(dir) = &cfg.export_dir {
        let report = RunReport::new(&outcome.stats, &outcome.results, &outcome.matches);
        if let Err(e) = write_report(dir, &report) {
            tracing::warn!(error = %format!("{e:#}"), "export failed");
        }
    }

    if seen.path().is_some() {
        if let Err(e) = seen.save() {
            tracing::warn!(error = %e, "seen store not saved");
        }
    } else if seen.is_dirty() {
        tracing::warn!(path = %cfg.seen_jobs_path.display(), "seen store was not loadable; new entries kept in memory only");
    }

    if let (Some(handle), Some(path)) = (&prom, &cfg.metrics_path) {
        if let Err(e) = metrics::write_textfile(handle, path) {
            tracing::warn!(error = %format!("{e:#}"), "metrics textfile not written");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let startup = load_config().and_then(|cfg| {
        let kws = keywords::require_keywords(&cfg).context("keywords")?;
        Ok((cfg, kws))
    });
    let (cfg, kws) = match startup {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "startup aborted");
            eprintln!("job-radar: {e:#}");
            return ExitCode::from(2);
        }
    };

    match run(cfg, kws).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            ExitCode::FAILURE
        }
    }
}

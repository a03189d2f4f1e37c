// src/run.rs
//! One radar pass: fetch every source, filter, summarize.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;

use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::filter::{FilterPipeline, LocationPolicy};
use crate::models::{FetchResult, Match, Posting, RunStats};
use crate::orchestrator::Orchestrator;
use crate::seen::SeenStore;

#[derive(Debug)]
pub struct RunOutcome {
    pub results: Vec<FetchResult>,
    pub matches: Vec<Match>,
    pub stats: RunStats,
}

/// Fetch, filter against `seen` and compute stats. `seen` is updated in memory only;
/// persisting it is up to the caller. An empty `keywords` list is a config error and
/// nothing is fetched.
pub async fn run_once(
    cfg: &AppConfig,
    keywords: Vec<String>,
    seen: &mut SeenStore,
    cancel: &CancellationToken,
) -> anyhow::Result<RunOutcome> {
    if keywords.is_empty() {
        return Err(ConfigError::Invalid("at least one keyword is required".into()).into());
    }

    let t0 = Instant::now();
    let classifier = Arc::new(Classifier::new(&cfg.classifier));
    let orchestrator = Orchestrator::new(&cfg.http, classifier.clone(), cfg.max_concurrency)
        .context("build HTTP client")?;

    let sources = cfg.sources();
    tracing::info!(sources = sources.len(), keywords = keywords.len(), "run started");
    let results = orchestrator.scrape_all(&sources, cancel).await;

    let postings: Vec<Posting> = results
        .iter()
        .flat_map(|r| r.postings.iter().cloned())
        .collect();

    let pipeline = FilterPipeline::new(
        classifier,
        LocationPolicy::new(&cfg.location),
        keywords,
        cfg.min_relevance_score,
    );
    let outcome = pipeline.filter(seen, &postings);

    let mut stats = RunStats::from_results(&results, t0.elapsed());
    stats.new_found = postings.len() - outcome.already_seen;
    stats.relevant_found = outcome.matches.len();
    crate::metrics::record_run(&stats);

    tracing::info!(
        total = stats.total_found,
        new = stats.new_found,
        relevant = stats.relevant_found,
        succeeded = stats.sources_succeeded,
        failed = stats.sources_failed,
        elapsed_ms = stats.total_duration.as_millis() as u64,
        "run finished"
    );

    Ok(RunOutcome {
        results,
        matches: outcome.matches,
        stats,
    })
}

// src/orchestrator.rs
//! Fetches every configured source, one tokio task per source, bounded by a semaphore.
//!
//! - A failing source is recorded in its own `FetchResult`; the others keep going.
//! - Results come back in source order (index-assigned from the join handles).
//! - Cancellation aborts in-flight fetches; completed results are returned intact and
//!   interrupted ones keep the postings collected so far.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::classifier::Classifier;
use crate::config::SourceSpec;
use crate::error::FetchError;
use crate::metrics as radar_metrics;
use crate::models::FetchResult;
use crate::scrape::{fetcher_for, http::HttpSettings, SiteFetcher};

pub struct Orchestrator {
    client: reqwest::Client,
    classifier: Arc<Classifier>,
    max_concurrency: usize,
}

impl Orchestrator {
    /// Builds the shared HTTP client from `http`.
    pub fn new(
        http: &HttpSettings,
        classifier: Arc<Classifier>,
        max_concurrency: usize,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: http.build_client()?,
            classifier,
            max_concurrency: max_concurrency.max(1),
        })
    }

    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    /// Fetch all sources. Always returns exactly one result per source.
    pub async fn scrape_all(
        &self,
        sources: &[SourceSpec],
        cancel: &CancellationToken,
    ) -> Vec<FetchResult> {
        let fetchers: Vec<Arc<dyn SiteFetcher>> = sources
            .iter()
            .map(|s| Arc::from(fetcher_for(s, &self.client, &self.classifier)))
            .collect();
        run_fetchers(fetchers, self.max_concurrency, cancel).await
    }
}

/// Drive pre-built fetchers with at most `max_concurrency` in flight.
pub async fn run_fetchers(
    fetchers: Vec<Arc<dyn SiteFetcher>>,
    max_concurrency: usize,
    cancel: &CancellationToken,
) -> Vec<FetchResult> {
    radar_metrics::ensure_described();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));

    let mut handles = Vec::with_capacity(fetchers.len());
    for fetcher in &fetchers {
        let fetcher = fetcher.clone();
        let sem = semaphore.clone();
        let token = cancel.clone();
        handles.push(tokio::spawn(async move {
            let t0 = Instant::now();
            let permit = tokio::select! {
                _ = token.cancelled() => None,
                p = sem.acquire_owned() => p.ok(),
            };
            let Some(_permit) = permit else {
                return FetchResult::failed(fetcher.name(), FetchError::Cancelled, t0.elapsed());
            };
            fetcher.fetch(&token).await
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (fetcher, handle) in fetchers.iter().zip(handles) {
        let result = match handle.await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(target: "scrape", source = fetcher.name(), error = %e, "fetch task died");
                FetchResult::failed(
                    fetcher.name(),
                    FetchError::Internal(e.to_string()),
                    Duration::ZERO,
                )
            }
        };
        record(&result);
        results.push(result);
    }
    results
}

fn record(result: &FetchResult) {
    radar_metrics::record_fetch(result);
    match &result.error {
        None => tracing::info!(
            target: "scrape",
            source = %result.source_name,
            postings = result.postings.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "source fetched"
        ),
        Some(e) => tracing::warn!(
            target: "scrape",
            source = %result.source_name,
            kind = e.kind(),
            error = %e,
            postings = result.postings.len(),
            "source failed"
        ),
    }
}

// src/scrape/mod.rs
//! Per-source fetchers. Each turns one configured source into a [`FetchResult`] of
//! classified postings; errors are captured, never propagated.

pub mod api;
pub mod greenhouse;
pub mod html;
pub mod http;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::classifier::Classifier;
use crate::config::{ApiKind, SourceSpec};
use crate::error::FetchError;
use crate::models::{FetchResult, Posting};

/// One source of postings.
#[async_trait]
pub trait SiteFetcher: Send + Sync {
    fn name(&self) -> &str;

    /// Push classified postings into `out`. On error, whatever was pushed before
    /// the failure is kept.
    async fn collect(&self, out: &mut Vec<Posting>) -> Result<(), FetchError>;

    /// Timed wrapper around [`SiteFetcher::collect`] that never fails. Cancellation
    /// stops the collect but keeps whatever it had already pushed.
    async fn fetch(&self, cancel: &CancellationToken) -> FetchResult {
        let t0 = Instant::now();
        let mut postings = Vec::new();
        let res = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            r = self.collect(&mut postings) => r,
        };
        let elapsed = t0.elapsed();
        match res {
            Ok(()) => FetchResult::ok(self.name(), postings, elapsed),
            Err(e) => {
                tracing::debug!(target: "scrape", source = self.name(), kind = e.kind(), salvaged = postings.len(), "collect stopped early");
                FetchResult {
                    source_name: self.name().to_string(),
                    postings,
                    error: Some(e),
                    elapsed,
                }
            }
        }
    }
}

/// Build the fetcher for a configured source. All fetchers share one client and one
/// classifier.
pub fn fetcher_for(
    spec: &SourceSpec,
    client: &reqwest::Client,
    classifier: &Arc<Classifier>,
) -> Box<dyn SiteFetcher> {
    match spec {
        SourceSpec::Html(site) => Box::new(html::HtmlFetcher::new(
            site.clone(),
            client.clone(),
            classifier.clone(),
        )),
        SourceSpec::Api(site) => match site.kind {
            ApiKind::Generic => Box::new(api::GenericApiFetcher::new(
                site.clone(),
                client.clone(),
                classifier.clone(),
            )),
            ApiKind::Greenhouse => Box::new(greenhouse::GreenhouseFetcher::new(
                site.clone(),
                client.clone(),
                classifier.clone(),
            )),
        },
    }
}

/// GET/any-method helper: send, require 2xx, read the body.
pub(crate) async fn send_for_text(
    req: reqwest::RequestBuilder,
    url: &str,
) -> Result<(String, url::Url), FetchError> {
    let resp = req
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let final_url = resp.url().clone();
    let body = resp
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    Ok((body, final_url))
}

const MAX_TEXT_CHARS: usize = 1500;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)</?[^>]+>").expect("static regex"));

fn ascii_quote(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' | '\u{00AB}' | '\u{00BB}' => '"',
        '\u{2018}' | '\u{2019}' => '\'',
        other => other,
    }
}

/// Board text as plain single-spaced prose: entities decoded, markup dropped, curly
/// quotes flattened, capped at [`MAX_TEXT_CHARS`].
pub fn normalize_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let plain = TAG.replace_all(&decoded, " ");
    let text: String = plain
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(ascii_quote)
        .collect();
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

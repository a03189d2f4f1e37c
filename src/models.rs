// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FetchError;

/// A single job listing extracted from a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Posting {
    /// Source-local id, e.g. `weworkremotely-3` or `greenhouse-acme-123`.
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    pub source: String, // configured source name

    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub matched_skills: Vec<String>,

    pub scraped_at: DateTime<Utc>,
}

impl Posting {
    /// Bare posting with identity fields only; everything else defaulted.
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            company: company.into(),
            location: location.into(),
            url: url.into(),
            description: String::new(),
            salary: String::new(),
            posted_at: None,
            source: source.into(),
            relevance_score: 0.0,
            matched_skills: Vec::new(),
            scraped_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Stable identity used by the seen ledger.
    ///
    /// URL when present, otherwise title + company + source. Mutable fields
    /// (score, matched skills, timestamps, source-local id) never take part.
    pub fn dedup_id(&self) -> String {
        let url = self.url.trim();
        let key = if !url.is_empty() {
            format!("url:{url}")
        } else {
            format!(
                "tcs:{}|{}|{}",
                self.title.trim().to_lowercase(),
                self.company.trim().to_lowercase(),
                self.source.trim().to_lowercase()
            )
        };
        short_hash(&key)
    }
}

// sha256 → first 16 bytes as hex
fn short_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(32);
    for b in digest.iter().take(16) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// One entry of the durable seen ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeenRecord {
    pub job_id: String,
    pub url: String,
    pub seen_at: DateTime<Utc>,
    pub source: String,
}

/// Outcome of fetching one source during one run.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub source_name: String,
    pub postings: Vec<Posting>,
    pub error: Option<FetchError>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl FetchResult {
    pub fn ok(source_name: impl Into<String>, postings: Vec<Posting>, elapsed: Duration) -> Self {
        Self {
            source_name: source_name.into(),
            postings,
            error: None,
            elapsed,
        }
    }

    pub fn failed(source_name: impl Into<String>, error: FetchError, elapsed: Duration) -> Self {
        Self {
            source_name: source_name.into(),
            postings: Vec::new(),
            error: Some(error),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A posting that passed every filter, with its score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub posting: Posting,
    pub relevance_score: f64,
    pub matched_skills: Vec<String>,
}

/// Aggregate counts for one run. Recomputed every run, never persisted.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunStats {
    pub total_found: usize,
    pub relevant_found: usize,
    pub new_found: usize,
    #[serde(rename = "total_duration_ms", serialize_with = "serialize_millis")]
    pub total_duration: Duration,
    pub sources_succeeded: usize,
    pub sources_failed: usize,
}

impl RunStats {
    /// Source counts and totals from fetch results; filter counts are filled in by the caller.
    pub fn from_results(results: &[FetchResult], total_duration: Duration) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total_found: results.iter().map(|r| r.postings.len()).sum(),
            relevant_found: 0,
            new_found: 0,
            total_duration,
            sources_succeeded: succeeded,
            sources_failed: results.len() - succeeded,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis().min(u128::from(u64::MAX)) as u64)
}

// src/scrape/greenhouse.rs
//! Greenhouse job board API: one request per company board,
//! `{base_url}/{company}/jobs?content=true`.

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::ApiSite;
use crate::error::FetchError;
use crate::models::Posting;
use crate::scrape::api::parse_timestamp;
use crate::scrape::{normalize_text, send_for_text, SiteFetcher};

#[derive(Debug, Deserialize)]
struct BoardResponse {
    #[serde(default)]
    jobs: Vec<BoardJob>,
}

#[derive(Debug, Deserialize)]
struct BoardJob {
    id: u64,
    title: String,
    #[serde(default)]
    location: Option<BoardLocation>,
    #[serde(default)]
    absolute_url: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoardLocation {
    #[serde(default)]
    name: String,
}

pub struct GreenhouseFetcher {
    site: ApiSite,
    client: reqwest::Client,
    classifier: Arc<Classifier>,
}

impl GreenhouseFetcher {
    pub fn new(site: ApiSite, client: reqwest::Client, classifier: Arc<Classifier>) -> Self {
        Self {
            site,
            client,
            classifier,
        }
    }

    pub fn board_url(&self, company: &str) -> String {
        format!(
            "{}/{}/jobs?content=true",
            self.site.base_url.trim().trim_end_matches('/'),
            company.trim()
        )
    }

    async fn fetch_board(&self, company: &str) -> Result<Vec<Posting>, FetchError> {
        let url = self.board_url(company);
        let req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        let (body, _) = send_for_text(req, &url).await?;
        parse_board(&body, company, &self.site.name, &self.classifier)
    }
}

#[async_trait]
impl SiteFetcher for GreenhouseFetcher {
    fn name(&self) -> &str {
        &self.site.name
    }

    /// Boards fail independently. Only when every board failed does the source fail,
    /// with the last board's error.
    async fn collect(&self, out: &mut Vec<Posting>) -> Result<(), FetchError> {
        let mut last_err = None;
        let mut ok_boards = 0usize;

        for company in self.site.companies.iter().filter(|c| !c.trim().is_empty()) {
            match self.fetch_board(company).await {
                Ok(jobs) => {
                    ok_boards += 1;
                    tracing::debug!(target: "scrape", source = %self.site.name, company = %company, kept = jobs.len(), "greenhouse board parsed");
                    out.extend(jobs);
                }
                Err(e) => {
                    tracing::warn!(target: "scrape", source = %self.site.name, company = %company, error = %e, "greenhouse board skipped");
                    metrics::counter!("radar_board_errors_total").increment(1);
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if ok_boards == 0 => Err(e),
            _ => Ok(()),
        }
    }
}

/// Classified postings from one board's JSON.
pub fn parse_board(
    body: &str,
    company: &str,
    source: &str,
    classifier: &Classifier,
) -> Result<Vec<Posting>, FetchError> {
    let resp: BoardResponse = serde_json::from_str(body)
        .with_context(|| format!("greenhouse board {company}"))
        .map_err(|e| FetchError::Parse(format!("{e:#}")))?;

    let company_name = title_case(company);
    let mut out = Vec::new();
    for job in resp.jobs {
        let location = job.location.map(|l| l.name).unwrap_or_default();
        let description = job
            .content
            .as_deref()
            .map(normalize_text)
            .unwrap_or_default();

        if !classifier.is_remote(&job.title, &company_name, &location, &description)
            || !classifier.is_relevant_role(&job.title, &description)
        {
            continue;
        }

        let posted_at = job
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| job.created_at.as_deref().and_then(parse_timestamp));

        out.push(Posting {
            id: format!("greenhouse-{}-{}", company.trim(), job.id),
            title: job.title,
            company: company_name.clone(),
            location,
            url: job.absolute_url,
            description,
            salary: String::new(),
            posted_at,
            source: source.to_string(),
            relevance_score: 0.0,
            matched_skills: Vec::new(),
            scraped_at: Utc::now(),
        });
    }
    Ok(out)
}

/// `"acme-corp"` → `"Acme-Corp"`, `"initech"` → `"Initech"`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.trim().chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

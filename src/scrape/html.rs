// src/scrape/html.rs
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use url::Url;

use crate::classifier::Classifier;
use crate::config::HtmlSite;
use crate::error::FetchError;
use crate::models::Posting;
use crate::scrape::{normalize_text, send_for_text, SiteFetcher};

const TITLE_SELECTORS: &[&str] = &["h2", "h3", ".title", ".job-title", "a", ".job-title-text"];
const COMPANY_SELECTORS: &[&str] = &[
    ".company",
    ".company-name",
    ".employer",
    ".job-card-container__company-name",
];
const LOCATION_SELECTORS: &[&str] = &[
    ".location",
    ".job-location",
    ".where",
    ".job-card-container__metadata-item",
];
const SALARY_SELECTORS: &[&str] = &[".salary", ".compensation", ".pay"];

fn compile(list: &[&str]) -> Vec<Selector> {
    list.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

static TITLE: Lazy<Vec<Selector>> = Lazy::new(|| compile(TITLE_SELECTORS));
static COMPANY: Lazy<Vec<Selector>> = Lazy::new(|| compile(COMPANY_SELECTORS));
static LOCATION: Lazy<Vec<Selector>> = Lazy::new(|| compile(LOCATION_SELECTORS));
static SALARY: Lazy<Vec<Selector>> = Lazy::new(|| compile(SALARY_SELECTORS));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Scrapes listing cards out of a job board page.
pub struct HtmlFetcher {
    site: HtmlSite,
    client: reqwest::Client,
    classifier: Arc<Classifier>,
}

impl HtmlFetcher {
    pub fn new(site: HtmlSite, client: reqwest::Client, classifier: Arc<Classifier>) -> Self {
        Self {
            site,
            client,
            classifier,
        }
    }
}

#[async_trait]
impl SiteFetcher for HtmlFetcher {
    fn name(&self) -> &str {
        &self.site.name
    }

    async fn collect(&self, out: &mut Vec<Posting>) -> Result<(), FetchError> {
        let url = self.site.url.trim();
        let req = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            );
        let (body, final_url) = send_for_text(req, url).await?;
        let postings = parse_listings(&body, &final_url, &self.site, &self.classifier)?;
        tracing::debug!(target: "scrape", source = %self.site.name, kept = postings.len(), "html page parsed");
        out.extend(postings);
        Ok(())
    }
}

/// Extract classified postings from a board page. Relative links resolve against `base`.
pub fn parse_listings(
    body: &str,
    base: &Url,
    site: &HtmlSite,
    classifier: &Classifier,
) -> Result<Vec<Posting>, FetchError> {
    let selector = Selector::parse(&site.selector)
        .map_err(|e| FetchError::Parse(format!("selector {:?}: {e}", site.selector)))?;
    let document = Html::parse_document(body);

    let mut out = Vec::new();
    for card in document.select(&selector) {
        let title = first_text(&card, &TITLE);
        if title.is_empty() {
            continue;
        }
        let company = first_text(&card, &COMPANY);
        let location = first_text(&card, &LOCATION);
        let full_text = normalize_text(&card.text().collect::<Vec<_>>().join(" "));

        if !classifier.is_remote(&title, &company, &location, &full_text)
            || !classifier.is_relevant_role(&title, &full_text)
        {
            continue;
        }

        let href = card
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .or_else(|| card.value().attr("href"))
            .unwrap_or_default();

        out.push(Posting {
            id: format!("{}-{}", site.name, out.len() + 1),
            title,
            company,
            location,
            url: absolute_url(base, href),
            description: full_text,
            salary: first_text(&card, &SALARY),
            posted_at: None,
            source: site.name.clone(),
            relevance_score: 0.0,
            matched_skills: Vec::new(),
            scraped_at: Utc::now(),
        });
    }
    Ok(out)
}

// first non-empty text across the prioritized selectors
fn first_text(card: &ElementRef<'_>, selectors: &[Selector]) -> String {
    for sel in selectors {
        for el in card.select(sel) {
            let t = normalize_text(&el.text().collect::<Vec<_>>().join(" "));
            if !t.is_empty() {
                return t;
            }
        }
    }
    String::new()
}

fn absolute_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div class="job">
    <h2>Senior DevOps Engineer</h2>
    <span class="company">Acme</span>
    <span class="location">Remote</span>
    <span class="salary">$150k</span>
    <a href="/jobs/1">Apply</a>
  </div>
  <div class="job">
    <h2>Barista</h2>
    <span class="company">Bean Co</span>
    <span class="location">New York, NY</span>
    <a href="/jobs/2">Apply</a>
  </div>
  <div class="job">
    <h3>Site Reliability Engineer</h3>
    <span class="company">Initech</span>
    <span class="location">Austin, TX - onsite</span>
    <a href="https://other.test/sre">Apply</a>
  </div>
</body></html>"#;

    fn site() -> HtmlSite {
        HtmlSite {
            name: "board".into(),
            url: "https://board.test/remote".into(),
            selector: "div.job".into(),
            kind: None,
        }
    }

    #[test]
    fn keeps_only_remote_relevant_cards() {
        let base = Url::parse("https://board.test/remote").unwrap();
        let got = parse_listings(PAGE, &base, &site(), &Classifier::default()).unwrap();
        assert_eq!(got.len(), 1);
        let p = &got[0];
        assert_eq!(p.title, "Senior DevOps Engineer");
        assert_eq!(p.company, "Acme");
        assert_eq!(p.location, "Remote");
        assert_eq!(p.salary, "$150k");
        assert_eq!(p.url, "https://board.test/jobs/1");
        assert_eq!(p.id, "board-1");
        assert_eq!(p.source, "board");
    }

    #[test]
    fn broken_selector_is_a_parse_error() {
        let base = Url::parse("https://board.test/").unwrap();
        let mut s = site();
        s.selector = "div[".into();
        let err = parse_listings(PAGE, &base, &s, &Classifier::default()).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}

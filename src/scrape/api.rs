// src/scrape/api.rs
//! Generic JSON job APIs with unknown shapes.
//!
//! The body is decoded into an untyped `serde_json::Value`; the jobs array and each
//! field are located by probing candidate key names, first present non-empty value wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use url::Url;

use crate::classifier::Classifier;
use crate::config::ApiSite;
use crate::error::FetchError;
use crate::models::Posting;
use crate::scrape::{normalize_text, send_for_text, SiteFetcher};

const JOBS_KEYS: &[&str] = &["jobs", "results", "data", "items", "postings", "listings"];
const TITLE_KEYS: &[&str] = &["title", "name", "position"];
const COMPANY_KEYS: &[&str] = &["company", "company_name", "employer", "organization"];
const LOCATION_KEYS: &[&str] = &["location", "candidate_required_location", "city", "place"];
const URL_KEYS: &[&str] = &["url", "link", "absolute_url", "apply_url"];
const DESCRIPTION_KEYS: &[&str] = &["description", "content", "summary"];
const SALARY_KEYS: &[&str] = &["salary", "compensation"];
const POSTED_KEYS: &[&str] = &["publication_date", "posted_at", "created_at", "date"];

pub struct GenericApiFetcher {
    site: ApiSite,
    client: reqwest::Client,
    classifier: Arc<Classifier>,
}

impl GenericApiFetcher {
    pub fn new(site: ApiSite, client: reqwest::Client, classifier: Arc<Classifier>) -> Self {
        Self {
            site,
            client,
            classifier,
        }
    }

    fn request_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(self.site.url.trim())
            .map_err(|e| FetchError::Parse(format!("invalid URL {:?}: {e}", self.site.url)))?;
        if !self.site.params.is_empty() {
            let mut q = url.query_pairs_mut();
            for (k, v) in &self.site.params {
                q.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SiteFetcher for GenericApiFetcher {
    fn name(&self) -> &str {
        &self.site.name
    }

    async fn collect(&self, out: &mut Vec<Posting>) -> Result<(), FetchError> {
        let url = self.request_url()?;
        let method = reqwest::Method::from_bytes(self.site.method.trim().to_uppercase().as_bytes())
            .unwrap_or(reqwest::Method::GET);

        let req = self
            .client
            .request(method, url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        let (body, _) = send_for_text(req, url.as_str()).await?;

        let root: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::Parse(format!("{}: invalid JSON: {e}", self.site.name)))?;
        let postings = extract_postings(&root, &self.site.name, &self.classifier)?;
        tracing::debug!(target: "scrape", source = %self.site.name, kept = postings.len(), "api response parsed");
        out.extend(postings);
        Ok(())
    }
}

/// Classified postings from an arbitrary JSON document.
pub fn extract_postings(
    root: &Value,
    source: &str,
    classifier: &Classifier,
) -> Result<Vec<Posting>, FetchError> {
    let jobs = find_jobs_array(root)
        .ok_or_else(|| FetchError::Parse(format!("{source}: no jobs array in response")))?;

    let mut out = Vec::new();
    for entry in jobs {
        let Some(obj) = entry.as_object() else {
            continue;
        };
        let title = first_string(obj, TITLE_KEYS);
        if title.is_empty() {
            continue;
        }
        let company = first_string(obj, COMPANY_KEYS);
        let location = first_string(obj, LOCATION_KEYS);
        let description = normalize_text(&first_string(obj, DESCRIPTION_KEYS));

        if !classifier.is_remote(&title, &company, &location, &description)
            || !classifier.is_relevant_role(&title, &description)
        {
            continue;
        }

        out.push(Posting {
            id: format!("{}-{}", source, out.len() + 1),
            title,
            company,
            location,
            url: first_string(obj, URL_KEYS),
            description,
            salary: first_string(obj, SALARY_KEYS),
            posted_at: parse_timestamp(&first_string(obj, POSTED_KEYS)),
            source: source.to_string(),
            relevance_score: 0.0,
            matched_skills: Vec::new(),
            scraped_at: Utc::now(),
        });
    }
    Ok(out)
}

/// The root itself, or the first array under a jobs-like key (one nested level deep).
pub fn find_jobs_array(root: &Value) -> Option<&Vec<Value>> {
    if let Some(arr) = root.as_array() {
        return Some(arr);
    }
    let obj = root.as_object()?;
    for key in JOBS_KEYS {
        match obj.get(*key) {
            Some(Value::Array(arr)) => return Some(arr),
            Some(Value::Object(inner)) => {
                for inner_key in JOBS_KEYS {
                    if let Some(Value::Array(arr)) = inner.get(*inner_key) {
                        return Some(arr);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// First present, non-empty string among `keys`. Objects carrying a string `name`
/// (e.g. `"location": {"name": "Remote"}`) count as that string.
pub fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        let candidate = match obj.get(*key) {
            Some(Value::String(s)) => s.trim(),
            Some(Value::Object(inner)) => inner
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default(),
            _ => "",
        };
        if !candidate.is_empty() {
            return candidate.to_string();
        }
    }
    String::new()
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Remotive-style "2024-05-01T10:00:00" without offset
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|n| n.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probes_candidate_keys_in_order() {
        let v = json!({"name": "", "position": "SRE", "title": null});
        let obj = v.as_object().unwrap();
        assert_eq!(first_string(obj, TITLE_KEYS), "SRE");

        let v = json!({"location": {"name": "Remote - US"}});
        assert_eq!(first_string(v.as_object().unwrap(), LOCATION_KEYS), "Remote - US");
    }

    #[test]
    fn finds_nested_jobs_array() {
        let v = json!({"data": {"jobs": [{"title": "x"}]}});
        assert_eq!(find_jobs_array(&v).unwrap().len(), 1);
        let v = json!([{"title": "x"}, {"title": "y"}]);
        assert_eq!(find_jobs_array(&v).unwrap().len(), 2);
        assert!(find_jobs_array(&json!({"count": 0})).is_none());
    }

    #[test]
    fn extracts_and_classifies_entries() {
        let v = json!({
            "jobs": [
                {"title": "Platform Engineer", "company_name": "Acme",
                 "candidate_required_location": "Worldwide",
                 "url": "https://acme.test/1", "publication_date": "2024-05-01T10:00:00",
                 "description": "<p>Terraform &amp; Kubernetes</p>"},
                {"title": "Sales Manager", "company": "Acme", "location": "Remote"},
                "garbage",
                {"position": "DevOps Lead", "employer": "Globex", "location": "Paris office"}
            ]
        });
        let got = extract_postings(&v, "remotive", &Classifier::default()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].company, "Acme");
        assert_eq!(got[0].description, "Terraform & Kubernetes");
        assert_eq!(got[0].id, "remotive-1");
        assert!(got[0].posted_at.is_some());
    }

    #[test]
    fn missing_jobs_array_is_parse_error() {
        let err = extract_postings(&json!({"ok": true}), "x", &Classifier::default()).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}

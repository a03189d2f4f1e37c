// src/config/sources.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A job board scraped as HTML with a CSS selector per listing card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HtmlSite {
    pub name: String,
    pub url: String,
    pub selector: String,
    /// Free-form board tag ("indeed", "weworkremotely", ...); informational only.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Which JSON API dialect a site speaks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiKind {
    /// Unknown shape; fields probed by candidate key names.
    #[default]
    #[serde(alias = "api")]
    Generic,
    /// Greenhouse job board API, one request per company board.
    #[serde(alias = "greenhouse_api")]
    Greenhouse,
}

fn default_method() -> String {
    "GET".to_string()
}

/// A JSON job API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiSite {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ApiKind,
    /// Endpoint for generic APIs.
    #[serde(default)]
    pub url: String,
    /// Board API root for vendor APIs, e.g. `https://boards-api.greenhouse.io/v1/boards`.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Company board identifiers for vendor APIs.
    #[serde(default)]
    pub companies: Vec<String>,
}

/// One configured origin of postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Html(HtmlSite),
    Api(ApiSite),
}

impl SourceSpec {
    pub fn name(&self) -> &str {
        match self {
            SourceSpec::Html(s) => &s.name,
            SourceSpec::Api(s) => &s.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_type_tags_are_accepted() {
        let g: ApiSite = serde_json::from_str(
            r#"{"name":"GH","type":"greenhouse_api","base_url":"https://x","companies":["acme"]}"#,
        )
        .unwrap();
        assert_eq!(g.kind, ApiKind::Greenhouse);
        assert_eq!(g.method, "GET");

        let a: ApiSite =
            serde_json::from_str(r#"{"name":"R","type":"api","url":"https://x/api"}"#).unwrap();
        assert_eq!(a.kind, ApiKind::Generic);
    }
}

// src/scrape/http.rs
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn default_total_ms() -> u64 {
    30_000
}
fn default_phase_ms() -> u64 {
    10_000
}
fn default_max_redirects() -> usize {
    10
}
fn default_idle_ms() -> u64 {
    90_000
}
fn default_max_idle_per_host() -> usize {
    10
}
fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

/// HTTP client settings shared by every fetch of a run.
///
/// Built once by the orchestrator; the resulting `reqwest::Client` is cloned into each
/// fetcher so all sources share one connection pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole request, connect through body.
    #[serde(default = "default_total_ms")]
    pub total_timeout_ms: u64,
    /// TCP connect plus TLS handshake.
    #[serde(default = "default_phase_ms")]
    pub connect_timeout_ms: u64,
    /// Gap between reads, which bounds the wait for response headers.
    #[serde(default = "default_phase_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_idle_ms")]
    pub pool_idle_timeout_ms: u64,
    #[serde(default = "default_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            total_timeout_ms: default_total_ms(),
            connect_timeout_ms: default_phase_ms(),
            read_timeout_ms: default_phase_ms(),
            max_redirects: default_max_redirects(),
            pool_idle_timeout_ms: default_idle_ms(),
            pool_max_idle_per_host: default_max_idle_per_host(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_millis(self.total_timeout_ms))
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .read_timeout(Duration::from_millis(self.read_timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .pool_idle_timeout(Duration::from_millis(self.pool_idle_timeout_ms))
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_every_phase() {
        let s: HttpSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, HttpSettings::default());
        assert_eq!(s.total_timeout_ms, 30_000);
        assert_eq!(s.connect_timeout_ms, 10_000);
        assert_eq!(s.max_redirects, 10);
        assert!(s.build_client().is_ok());
    }
}

// src/config/mod.rs
//! Application configuration: job sources, candidate keywords, location policy,
//! notification channels and runtime knobs. Loaded from TOML or JSON.

pub mod sources;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classifier::ClassifierConfig;
use crate::error::ConfigError;
use crate::scrape::http::HttpSettings;

pub use sources::{ApiKind, ApiSite, HtmlSite, SourceSpec};

pub const ENV_CONFIG_PATH: &str = "JOB_RADAR_CONFIG";
pub const ENV_SMTP_PASSWORD: &str = "JOB_RADAR_SMTP_PASSWORD";
pub const DEFAULT_TOML_PATH: &str = "config/job_radar.toml";
pub const DEFAULT_JSON_PATH: &str = "config/job_radar.json";

fn default_min_score() -> f64 {
    0.3
}
fn default_seen_path() -> PathBuf {
    PathBuf::from("state/seen_jobs.json")
}
fn default_max_concurrency() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub sites: Vec<HtmlSite>,
    #[serde(default)]
    pub api_sites: Vec<ApiSite>,
    #[serde(default)]
    pub resume_keywords: Vec<String>,
    /// Plain-text resume (or keyword list) merged into `resume_keywords`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_path: Option<PathBuf>,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub email: EmailConfig,
    /// 0.0 ..= 1.0
    #[serde(default = "default_min_score")]
    pub min_relevance_score: f64,
    #[serde(default = "default_seen_path")]
    pub seen_jobs_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_file: Option<PathBuf>,
    /// Prometheus textfile written at the end of a run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<PathBuf>,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationConfig {
    /// Search worldwide (minus `exclude_countries`).
    #[serde(default)]
    pub global: bool,
    /// ISO codes or names, e.g. "US", "Canada".
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub exclude_countries: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    #[serde(default = "default_true")]
    pub accept: bool,
    /// Only remote (or hybrid, when `hybrid`) postings pass.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hybrid: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            accept: true,
            required: false,
            hybrid: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    /// Empty → read from `$JOB_RADAR_SMTP_PASSWORD`.
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            to: String::new(),
            from: String::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sites: Vec::new(),
            api_sites: Vec::new(),
            resume_keywords: Vec::new(),
            resume_path: None,
            location: LocationConfig::default(),
            email: EmailConfig::default(),
            min_relevance_score: default_min_score(),
            seen_jobs_path: default_seen_path(),
            export_dir: None,
            notify_file: None,
            metrics_path: None,
            max_concurrency: default_max_concurrency(),
            classifier: ClassifierConfig::default(),
            http: HttpSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate from an explicit path. TOML or JSON, picked by extension.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !matches!(ext.as_str(), "toml" | "json" | "") {
            return Err(ConfigError::UnsupportedFormat(format!(
                "{} (expected .toml or .json)",
                path.display()
            )));
        }
        let mut cfg = parse_config(&content, ext.as_str()).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        if cfg.email.password.is_empty() {
            if let Ok(p) = std::env::var(ENV_SMTP_PASSWORD) {
                cfg.email.password = p;
            }
        }

        cfg.validate()?;
        tracing::debug!(
            path = %path.display(),
            sites = cfg.sites.len(),
            api_sites = cfg.api_sites.len(),
            keywords = cfg.resume_keywords.len(),
            email = cfg.email.enabled,
            "config loaded"
        );
        Ok(cfg)
    }

    /// Resolve the config path:
    /// 1) `$JOB_RADAR_CONFIG`
    /// 2) `config/job_radar.toml`
    /// 3) `config/job_radar.json`
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(ConfigError::Invalid(format!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                )));
            }
            return Self::load_from(&pb);
        }
        for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Err(ConfigError::NotFound)
    }

    /// Structural checks that must hold before any source is fetched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sites.is_empty() && self.api_sites.is_empty() {
            return Err(invalid("at least one site or api_site must be configured"));
        }
        let has_keyword = self.resume_keywords.iter().any(|k| !k.trim().is_empty());
        if !has_keyword && self.resume_path.is_none() {
            return Err(invalid(
                "at least one resume keyword (or a resume_path) is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_relevance_score) {
            return Err(invalid(format!(
                "min_relevance_score must be within 0.0..=1.0, got {}",
                self.min_relevance_score
            )));
        }
        if self.max_concurrency == 0 {
            return Err(invalid("max_concurrency must be at least 1"));
        }

        for site in &self.sites {
            require_name(&site.name, "site")?;
            require_url(&site.url, &site.name)?;
            if scraper::Selector::parse(&site.selector).is_err() {
                return Err(invalid(format!(
                    "site {}: selector {:?} does not parse",
                    site.name, site.selector
                )));
            }
        }

        for api in &self.api_sites {
            require_name(&api.name, "api_site")?;
            match api.kind {
                ApiKind::Generic => {
                    require_url(&api.url, &api.name)?;
                    if reqwest::Method::from_bytes(api.method.trim().to_uppercase().as_bytes())
                        .is_err()
                    {
                        return Err(invalid(format!(
                            "api_site {}: bad HTTP method {:?}",
                            api.name, api.method
                        )));
                    }
                }
                ApiKind::Greenhouse => {
                    require_url(&api.base_url, &api.name)?;
                    if api.companies.iter().all(|c| c.trim().is_empty()) {
                        return Err(invalid(format!(
                            "api_site {}: greenhouse needs at least one company",
                            api.name
                        )));
                    }
                }
            }
        }

        if self.email.enabled {
            for (field, value) in [
                ("smtp_host", &self.email.smtp_host),
                ("from", &self.email.from),
                ("to", &self.email.to),
            ] {
                if value.trim().is_empty() {
                    return Err(invalid(format!("email enabled but email.{field} is empty")));
                }
            }
        }

        if self
            .location
            .countries
            .iter()
            .chain(&self.location.exclude_countries)
            .chain(&self.location.cities)
            .any(|c| c.trim().is_empty())
        {
            return Err(invalid("location lists must not contain blank entries"));
        }

        Ok(())
    }

    /// HTML sites first, then API sites, each in configured order.
    pub fn sources(&self) -> Vec<SourceSpec> {
        self.sites
            .iter()
            .cloned()
            .map(SourceSpec::Html)
            .chain(self.api_sites.iter().cloned().map(SourceSpec::Api))
            .collect()
    }

    /// Write the config back out (TOML for `.toml`, pretty JSON otherwise).
    /// The SMTP password is never written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let is_toml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let body = if is_toml {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Read {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, body).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn require_name(name: &str, what: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(invalid(format!("{what} with empty name")));
    }
    Ok(())
}

fn require_url(raw: &str, site: &str) -> Result<(), ConfigError> {
    match url::Url::parse(raw.trim()) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        Ok(u) => Err(invalid(format!(
            "{site}: unsupported URL scheme {:?}",
            u.scheme()
        ))),
        Err(e) => Err(invalid(format!("{site}: invalid URL {raw:?}: {e}"))),
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig, String> {
    match hint_ext {
        "toml" => toml::from_str(s).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(s).map_err(|e| e.to_string()),
        _ => {
            // No extension: JSON if it looks like an object, else TOML.
            if s.trim_start().starts_with('{') {
                serde_json::from_str(s).map_err(|e| e.to_string())
            } else {
                toml::from_str(s).map_err(|e| e.to_string())
            }
        }
    }
}

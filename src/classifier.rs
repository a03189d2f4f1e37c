// src/classifier.rs
//! # Classifier
//!
//! Substring heuristics that decide whether a posting is remote and whether it is a
//! relevant infrastructure/operations role. One [`Classifier`] instance is shared by the
//! HTML and API fetch paths so both apply the same keyword lists.
//!
//! All keyword lists and the two judgement calls (negative-over-positive precedence and
//! "no location means remote") are configurable through [`ClassifierConfig`]; the
//! defaults reproduce the behaviour the radar has always had.

use serde::{Deserialize, Serialize};

const REMOTE_KEYWORDS: &[&str] = &[
    "remote",
    "work from home",
    "wfh",
    "virtual",
    "distributed",
    "telecommute",
    "flexible location",
    "anywhere",
    "global",
    "worldwide",
    "us-remote",
    "remote in",
    "remote us",
    "remote canada",
];

const NON_REMOTE_KEYWORDS: &[&str] = &[
    "on-site",
    "onsite",
    "in-person",
    "office",
    "headquarters",
    "relocation required",
    "must be local",
];

const HYBRID_KEYWORDS: &[&str] = &[
    "hybrid",
    "partially remote",
    "remote-friendly",
    "flexible hybrid",
];

const HOME_COUNTRY_ALIASES: &[&str] = &["united states", "usa", "us", "u.s.", "u.s.a.", "america"];

const ROLE_KEYWORDS: &[&str] = &[
    "system engineer",
    "systems engineer",
    "devops",
    "dev ops",
    "cloud engineer",
    "sre",
    "site reliability engineer",
    "platform engineer",
    "infrastructure engineer",
    "reliability engineer",
    "automation engineer",
    "build engineer",
    "release engineer",
    "deployment engineer",
    "kubernetes engineer",
    "container engineer",
    "aws engineer",
    "azure engineer",
    "gcp engineer",
    "google cloud engineer",
    "terraform engineer",
    "ansible engineer",
    "jenkins engineer",
    "ci/cd engineer",
    "monitoring engineer",
    "observability engineer",
    "security engineer",
    "compliance engineer",
    "network engineer",
    "linux engineer",
    "unix engineer",
    "operations engineer",
    "ops engineer",
    "production engineer",
    "backend engineer",
    "api engineer",
    "microservices engineer",
    "distributed systems engineer",
    "scalability engineer",
    "performance engineer",
    "data engineer",
    "ml engineer",
    "machine learning engineer",
    "ai engineer",
    "artificial intelligence engineer",
];

const TECH_KEYWORDS: &[&str] = &[
    "kubernetes",
    "docker",
    "terraform",
    "ansible",
    "puppet",
    "chef",
    "jenkins",
    "gitlab ci",
    "github actions",
    "aws",
    "azure",
    "gcp",
    "google cloud",
    "amazon web services",
    "microservices",
    "containerization",
    "orchestration",
    "monitoring",
    "observability",
    "prometheus",
    "grafana",
    "elk stack",
    "elasticsearch",
    "splunk",
    "datadog",
    "new relic",
    "pagerduty",
    "incident response",
    "disaster recovery",
    "high availability",
    "load balancing",
    "auto scaling",
    "infrastructure as code",
    "configuration management",
    "linux",
    "unix",
    "bash",
    "shell scripting",
    "python",
    "golang",
    "go",
    "ruby",
    "powershell",
    "networking",
    "security",
    "compliance",
    "automation",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_remote_keywords() -> Vec<String> {
    owned(REMOTE_KEYWORDS)
}
fn default_non_remote_keywords() -> Vec<String> {
    owned(NON_REMOTE_KEYWORDS)
}
fn default_hybrid_keywords() -> Vec<String> {
    owned(HYBRID_KEYWORDS)
}
fn default_home_country_aliases() -> Vec<String> {
    owned(HOME_COUNTRY_ALIASES)
}
fn default_role_keywords() -> Vec<String> {
    owned(ROLE_KEYWORDS)
}
fn default_tech_keywords() -> Vec<String> {
    owned(TECH_KEYWORDS)
}
fn default_min_tech_keywords() -> usize {
    2
}
fn default_true() -> bool {
    true
}

/// Keyword lists and toggles. Every field is optional in config files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default = "default_remote_keywords")]
    pub remote_keywords: Vec<String>,
    #[serde(default = "default_non_remote_keywords")]
    pub non_remote_keywords: Vec<String>,
    #[serde(default = "default_hybrid_keywords")]
    pub hybrid_keywords: Vec<String>,
    /// Locations that only name the home country, e.g. "United States".
    #[serde(default = "default_home_country_aliases")]
    pub home_country_aliases: Vec<String>,
    #[serde(default = "default_role_keywords")]
    pub role_keywords: Vec<String>,
    #[serde(default = "default_tech_keywords")]
    pub tech_keywords: Vec<String>,
    /// Distinct technology keywords needed when no role keyword matched.
    #[serde(default = "default_min_tech_keywords")]
    pub min_tech_keywords: usize,
    /// A negative keyword rejects even when a positive one is present.
    #[serde(default = "default_true")]
    pub negative_overrides_positive: bool,
    /// Empty or home-country-only locations count as remote.
    #[serde(default = "default_true")]
    pub unspecified_location_is_remote: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            remote_keywords: default_remote_keywords(),
            non_remote_keywords: default_non_remote_keywords(),
            hybrid_keywords: default_hybrid_keywords(),
            home_country_aliases: default_home_country_aliases(),
            role_keywords: default_role_keywords(),
            tech_keywords: default_tech_keywords(),
            min_tech_keywords: default_min_tech_keywords(),
            negative_overrides_positive: true,
            unspecified_location_is_remote: true,
        }
    }
}

/// Stateless predicates over posting text. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Classifier {
    remote: Vec<String>,
    non_remote: Vec<String>,
    hybrid: Vec<String>,
    home_aliases: Vec<String>,
    roles: Vec<String>,
    tech: Vec<String>,
    min_tech: usize,
    negative_overrides_positive: bool,
    unspecified_location_is_remote: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl Classifier {
    pub fn new(cfg: &ClassifierConfig) -> Self {
        Self {
            remote: lowered(&cfg.remote_keywords),
            non_remote: lowered(&cfg.non_remote_keywords),
            hybrid: lowered(&cfg.hybrid_keywords),
            home_aliases: lowered(&cfg.home_country_aliases),
            roles: lowered(&cfg.role_keywords),
            tech: dedup(lowered(&cfg.tech_keywords)),
            min_tech: cfg.min_tech_keywords,
            negative_overrides_positive: cfg.negative_overrides_positive,
            unspecified_location_is_remote: cfg.unspecified_location_is_remote,
        }
    }

    /// Remote-work status from title, company, location and free-text body.
    pub fn is_remote(&self, title: &str, company: &str, location: &str, full_text: &str) -> bool {
        let fields = [
            title.to_lowercase(),
            company.to_lowercase(),
            location.to_lowercase(),
            full_text.to_lowercase(),
        ];
        let has_positive = any_in_fields(&self.remote, &fields);
        let has_negative = any_in_fields(&self.non_remote, &fields);

        if has_negative && (self.negative_overrides_positive || !has_positive) {
            return false;
        }
        if has_positive {
            return true;
        }
        if self.is_unspecified_location(location) {
            return self.unspecified_location_is_remote;
        }
        false
    }

    /// Explicit role phrase anywhere, or enough distinct technology keywords.
    pub fn is_relevant_role(&self, title: &str, full_text: &str) -> bool {
        let fields = [title.to_lowercase(), full_text.to_lowercase()];
        if any_in_fields(&self.roles, &fields) {
            return true;
        }
        self.tech_hits(&fields) >= self.min_tech
    }

    /// `(is_remote, is_hybrid)` from title and location only; used by the location policy.
    pub fn remote_status(&self, title: &str, location: &str) -> (bool, bool) {
        let fields = [title.to_lowercase(), location.to_lowercase()];
        let hybrid = any_in_fields(&self.hybrid, &fields);
        let remote = !hybrid && any_in_fields(&self.remote, &fields);
        (remote, hybrid)
    }

    fn tech_hits(&self, fields: &[String]) -> usize {
        self.tech
            .iter()
            .filter(|kw| fields.iter().any(|f| f.contains(kw.as_str())))
            .count()
    }

    fn is_unspecified_location(&self, location: &str) -> bool {
        let loc = location.trim().to_lowercase();
        loc.is_empty() || self.home_aliases.iter().any(|a| *a == loc)
    }
}

fn any_in_fields(keywords: &[String], fields: &[String]) -> bool {
    keywords
        .iter()
        .any(|kw| fields.iter().any(|f| f.contains(kw.as_str())))
}

fn lowered(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        if !out.contains(&it) {
            out.push(it);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_keyword_wins_over_positive_by_default() {
        let c = Classifier::default();
        assert!(!c.is_remote("Remote SRE (office in Berlin)", "", "", ""));

        let lenient = Classifier::new(&ClassifierConfig {
            negative_overrides_positive: false,
            ..ClassifierConfig::default()
        });
        assert!(lenient.is_remote("Remote SRE (office in Berlin)", "", "", ""));
        assert!(!lenient.is_remote("SRE", "", "Berlin headquarters", ""));
    }

    #[test]
    fn home_country_only_location_counts_as_unspecified() {
        let c = Classifier::default();
        assert!(c.is_remote("Platform Engineer", "Acme", "United States", ""));
        assert!(c.is_remote("Platform Engineer", "Acme", "USA", ""));
        assert!(!c.is_remote("Platform Engineer", "Acme", "Austin, TX", ""));
    }

    #[test]
    fn unspecified_default_is_configurable() {
        let strict = Classifier::new(&ClassifierConfig {
            unspecified_location_is_remote: false,
            ..ClassifierConfig::default()
        });
        assert!(!strict.is_remote("Platform Engineer", "Acme", "", ""));
    }

    #[test]
    fn tech_keywords_count_once_each() {
        let c = Classifier::default();
        // "docker" three times is still one keyword
        assert!(!c.is_relevant_role("Engineer", "docker docker docker"));
        assert!(c.is_relevant_role("Engineer", "docker and terraform"));
    }

    #[test]
    fn hybrid_is_not_remote() {
        let c = Classifier::default();
        assert_eq!(c.remote_status("SRE", "Hybrid - Remote, Boston"), (false, true));
        assert_eq!(c.remote_status("SRE", "Remote"), (true, false));
        assert_eq!(c.remote_status("SRE", "Boston, MA"), (false, false));
    }
}

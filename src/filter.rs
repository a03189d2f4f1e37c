// src/filter.rs
//! Seen check → location policy → relevance threshold, in that order.
//!
//! Only postings that pass every step are marked seen, so lowering the threshold on a
//! later run still surfaces postings that were scored out before.

use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::LocationConfig;
use crate::location::{normalize_country, parse_location};
use crate::models::{Match, Posting};
use crate::scoring::RelevanceScorer;
use crate::seen::SeenStore;

/// Geographic acceptance rules, normalized once from the `location` config section.
#[derive(Debug, Clone)]
pub struct LocationPolicy {
    global: bool,
    countries: Vec<String>,
    exclude_countries: Vec<String>,
    cities: Vec<String>,
    accept_remote: bool,
    require_remote: bool,
    accept_hybrid: bool,
}

impl LocationPolicy {
    pub fn new(cfg: &LocationConfig) -> Self {
        let iso = |list: &[String]| -> Vec<String> {
            list.iter().filter_map(|c| normalize_country(c)).collect()
        };
        Self {
            global: cfg.global,
            countries: iso(&cfg.countries),
            exclude_countries: iso(&cfg.exclude_countries),
            cities: cfg
                .cities
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
            accept_remote: cfg.remote.accept,
            require_remote: cfg.remote.required,
            accept_hybrid: cfg.remote.hybrid,
        }
    }

    pub fn accepts(&self, posting: &Posting, classifier: &Classifier) -> bool {
        let (_, hybrid) = classifier.remote_status(&posting.title, &posting.location);
        let remote = !hybrid
            && classifier.is_remote(
                &posting.title,
                &posting.company,
                &posting.location,
                &posting.description,
            );

        if self.require_remote && !(remote || (hybrid && self.accept_hybrid)) {
            return false;
        }

        let parsed = parse_location(&posting.location);
        let country = parsed.country.as_deref();

        if self.global && !country.is_some_and(|c| self.exclude_countries.iter().any(|x| x == c)) {
            return true;
        }
        if country.is_some_and(|c| self.countries.iter().any(|x| x == c)) {
            return true;
        }
        if let Some(city) = parsed.city.as_deref() {
            let city = city.to_lowercase();
            if self.cities.iter().any(|c| *c == city) {
                return true;
            }
        }
        (self.accept_remote && remote) || (self.accept_hybrid && hybrid)
    }
}

/// What happened to one batch of postings.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub matches: Vec<Match>,
    pub already_seen: usize,
    pub location_rejected: usize,
    pub below_threshold: usize,
}

pub struct FilterPipeline {
    classifier: Arc<Classifier>,
    policy: LocationPolicy,
    scorer: RelevanceScorer,
    keywords: Vec<String>,
    min_score: f64,
}

impl FilterPipeline {
    pub fn new(
        classifier: Arc<Classifier>,
        policy: LocationPolicy,
        keywords: Vec<String>,
        min_score: f64,
    ) -> Self {
        Self {
            classifier,
            policy,
            scorer: RelevanceScorer,
            keywords,
            min_score,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Filter `postings` in encounter order, marking accepted ones in `seen`.
    pub fn filter(&self, seen: &mut SeenStore, postings: &[Posting]) -> FilterOutcome {
        let mut out = FilterOutcome::default();

        for posting in postings {
            if seen.is_seen(posting) {
                out.already_seen += 1;
                continue;
            }
            if !self.policy.accepts(posting, &self.classifier) {
                tracing::debug!(target: "filter", title = %posting.title, location = %posting.location, "location rejected");
                out.location_rejected += 1;
                continue;
            }

            let (score, skills) = self.scorer.score(posting, &self.keywords);
            if score < self.min_score {
                tracing::debug!(target: "filter", title = %posting.title, score, "below threshold");
                out.below_threshold += 1;
                continue;
            }

            seen.mark_seen(posting);
            let mut copy = posting.clone();
            copy.relevance_score = score;
            copy.matched_skills = skills.clone();
            out.matches.push(Match {
                posting: copy,
                relevance_score: score,
                matched_skills: skills,
            });
        }

        tracing::info!(
            target: "filter",
            matches = out.matches.len(),
            already_seen = out.already_seen,
            location_rejected = out.location_rejected,
            below_threshold = out.below_threshold,
            "filter pass done"
        );
        out
    }
}

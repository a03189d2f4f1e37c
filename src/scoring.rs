// src/scoring.rs
//! Relevance of a posting to the candidate's keyword list.

use crate::models::Posting;

/// Fraction of candidate keywords found in title + company + description.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer;

impl RelevanceScorer {
    /// Returns `(score, matched)`.
    ///
    /// - score is `matched / distinct keywords`, always within `[0.0, 1.0]`;
    /// - an empty keyword list scores exactly `0.0`;
    /// - matched keywords keep their configured spelling and order.
    pub fn score(&self, posting: &Posting, keywords: &[String]) -> (f64, Vec<String>) {
        let keywords = distinct_keywords(keywords);
        if keywords.is_empty() {
            return (0.0, Vec::new());
        }

        let text = format!(
            "{} {} {}",
            posting.title, posting.company, posting.description
        )
        .to_lowercase();

        let matched: Vec<String> = keywords
            .iter()
            .filter(|(_, needle)| text.contains(needle.as_str()))
            .map(|(original, _)| original.to_string())
            .collect();

        let score = (matched.len() as f64 / keywords.len() as f64).clamp(0.0, 1.0);
        (score, matched)
    }
}

// (configured spelling, lowercased needle), trimmed, blank-free, case-insensitively unique
fn distinct_keywords(keywords: &[String]) -> Vec<(&str, String)> {
    let mut out: Vec<(&str, String)> = Vec::with_capacity(keywords.len());
    for kw in keywords {
        let trimmed = kw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let needle = trimmed.to_lowercase();
        if out.iter().any(|(_, n)| *n == needle) {
            continue;
        }
        out.push((trimmed, needle));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_keywords_score_zero() {
        let p = Posting::new("SRE", "Acme", "Remote", "u", "s").with_description("kubernetes");
        assert_eq!(RelevanceScorer.score(&p, &[]), (0.0, vec![]));
        assert_eq!(RelevanceScorer.score(&p, &kws(&["  ", ""])), (0.0, vec![]));
    }

    #[test]
    fn duplicates_do_not_skew_the_ratio() {
        let p = Posting::new("SRE", "Acme", "Remote", "u", "s").with_description("Kubernetes");
        let (score, matched) = RelevanceScorer.score(&p, &kws(&["kubernetes", "KUBERNETES", "rust"]));
        assert!((score - 0.5).abs() < f64::EPSILON);
        assert_eq!(matched, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn matched_order_follows_configuration() {
        let p = Posting::new("Platform Engineer", "Acme", "", "u", "s")
            .with_description("Terraform, AWS and Kubernetes");
        let (score, matched) = RelevanceScorer.score(&p, &kws(&["kubernetes", "go", "aws"]));
        assert_eq!(matched, kws(&["kubernetes", "aws"]));
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }
}

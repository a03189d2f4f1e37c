// src/location.rs
//! Free-text job locations → `{country, city, remote}`.
//!
//! Handles the shapes boards actually emit: "Remote", "Remote - US", "Remote (Canada)",
//! "City, Country", "City, ST" (US state codes) and "City, State, Country".
//! Country names and ISO codes normalize to ISO-2; anything unknown is upper-cased as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLocation {
    pub country: Option<String>,
    pub city: Option<String>,
    pub is_remote: bool,
}

const COUNTRIES: &[(&str, &str)] = &[
    ("united states", "US"),
    ("united states of america", "US"),
    ("usa", "US"),
    ("us", "US"),
    ("u.s.", "US"),
    ("u.s.a.", "US"),
    ("america", "US"),
    ("canada", "CA"),
    ("united kingdom", "GB"),
    ("uk", "GB"),
    ("great britain", "GB"),
    ("england", "GB"),
    ("scotland", "GB"),
    ("ireland", "IE"),
    ("germany", "DE"),
    ("deutschland", "DE"),
    ("france", "FR"),
    ("spain", "ES"),
    ("portugal", "PT"),
    ("italy", "IT"),
    ("netherlands", "NL"),
    ("the netherlands", "NL"),
    ("belgium", "BE"),
    ("switzerland", "CH"),
    ("austria", "AT"),
    ("poland", "PL"),
    ("czech republic", "CZ"),
    ("czechia", "CZ"),
    ("sweden", "SE"),
    ("norway", "NO"),
    ("denmark", "DK"),
    ("finland", "FI"),
    ("estonia", "EE"),
    ("romania", "RO"),
    ("ukraine", "UA"),
    ("israel", "IL"),
    ("india", "IN"),
    ("singapore", "SG"),
    ("japan", "JP"),
    ("australia", "AU"),
    ("new zealand", "NZ"),
    ("brazil", "BR"),
    ("mexico", "MX"),
    ("argentina", "AR"),
    ("south africa", "ZA"),
];

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

const REMOTE_MARKERS: &[&str] = &["remote", "anywhere", "worldwide", "work from home", "wfh"];

// Work-mode words carry no geography; "Hybrid - Berlin" must still yield Berlin.
static WORK_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:fully |partially |flexible )?(?:remote|anywhere|worldwide|hybrid|on-?site)(?:-friendly)?\b",
    )
    .expect("static regex")
});

/// Map a country name or code to ISO-2. Unknown values are upper-cased; blank → `None`.
pub fn normalize_country(raw: &str) -> Option<String> {
    let t = raw.trim().trim_matches(|c: char| c == '(' || c == ')').trim();
    if t.is_empty() {
        return None;
    }
    let lower = t.to_lowercase();
    if let Some((_, code)) = COUNTRIES.iter().find(|(name, _)| *name == lower) {
        return Some(code.to_string());
    }
    Some(t.to_uppercase())
}

fn is_known_country(raw: &str) -> bool {
    let lower = raw.trim().to_lowercase();
    let upper = raw.trim().to_uppercase();
    COUNTRIES
        .iter()
        .any(|(name, code)| *name == lower || *code == upper)
}

fn is_us_state(raw: &str) -> bool {
    let t = raw.trim();
    t.len() == 2 && US_STATES.contains(&t.to_uppercase().as_str())
}

/// Parse a location string. Never fails; unknown parts are simply left out.
pub fn parse_location(text: &str) -> ParsedLocation {
    let lower = text.to_lowercase();
    let is_remote = REMOTE_MARKERS.iter().any(|m| lower.contains(m));

    // Drop work-mode markers and separators, keep the geographic remainder.
    let rest = WORK_MODE
        .replace_all(text, " ")
        .replace(['(', ')', '|', '/', '–', '—'], ",")
        .replace(" - ", ",")
        .replace(" in ", ",");

    let parts: Vec<&str> = rest
        .split(',')
        .map(|p| p.trim().trim_matches('-').trim())
        .filter(|p| !p.is_empty())
        .collect();

    let mut out = ParsedLocation {
        is_remote,
        ..ParsedLocation::default()
    };

    match parts.as_slice() {
        [] => {}
        [only] => {
            if is_known_country(only) {
                out.country = normalize_country(only);
            } else if !is_remote {
                out.city = Some(only.to_string());
            }
        }
        [city, last] => {
            out.city = Some(city.to_string());
            // Two-letter state codes win over clashing ISO codes ("CA", "DE", "IN").
            out.country = if is_us_state(last) {
                Some("US".to_string())
            } else {
                normalize_country(last)
            };
        }
        [city, .., last] => {
            out.city = Some(city.to_string());
            out.country = normalize_country(last);
        }
    }

    out
}

// src/notify/mod.rs
//! Delivery of run results. Channels are independent: a failing one is logged and
//! the others still receive the report.

pub mod console;
pub mod email;
pub mod file;

use anyhow::Result;
use std::fmt::Write as _;

use crate::config::AppConfig;
use crate::models::{Match, RunStats};

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use file::FileNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    async fn notify(&self, matches: &[Match], stats: &RunStats) -> Result<()>;
}

/// Fan-out to every configured channel.
pub struct NotifierMux {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Console always; file and email when configured.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let mut channels: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier)];
        if let Some(path) = &cfg.notify_file {
            channels.push(Box::new(FileNotifier::new(path.clone())));
        }
        if cfg.email.enabled {
            match EmailNotifier::from_config(&cfg.email) {
                Ok(n) => channels.push(Box::new(n)),
                Err(e) => tracing::warn!(error = %format!("{e:#}"), "email channel disabled"),
            }
        }
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Returns how many channels delivered successfully.
    pub async fn notify(&self, matches: &[Match], stats: &RunStats) -> usize {
        let mut delivered = 0;
        for ch in &self.channels {
            match ch.notify(matches, stats).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(target: "notify", channel = ch.name(), error = %format!("{e:#}"), "notify failed")
                }
            }
        }
        delivered
    }
}

/// Multi-line block for a single match.
pub fn format_match(m: &Match) -> String {
    let p = &m.posting;
    let mut out = format!(
        "{} @ {} [{:.0}%]\n  location: {}\n  source:   {}\n",
        p.title,
        if p.company.is_empty() { "unknown company" } else { p.company.as_str() },
        m.relevance_score * 100.0,
        if p.location.is_empty() { "unspecified" } else { p.location.as_str() },
        p.source,
    );
    if !p.salary.is_empty() {
        let _ = writeln!(out, "  salary:   {}", p.salary);
    }
    if !m.matched_skills.is_empty() {
        let _ = writeln!(out, "  skills:   {}", m.matched_skills.join(", "));
    }
    if let Some(ts) = p.posted_at {
        let _ = writeln!(out, "  posted:   {}", ts.format("%Y-%m-%d"));
    }
    if !p.url.is_empty() {
        let _ = writeln!(out, "  {}", p.url);
    }
    out
}

/// Summary line, then every match.
pub fn render_report(matches: &[Match], stats: &RunStats) -> String {
    let mut out = format!(
        "job-radar: {} new matches ({} new of {} postings; sources ok {}, failed {}; {:.1}s)\n",
        stats.relevant_found,
        stats.new_found,
        stats.total_found,
        stats.sources_succeeded,
        stats.sources_failed,
        stats.total_duration.as_secs_f64(),
    );
    if matches.is_empty() {
        out.push_str("No new matches.\n");
        return out;
    }
    for m in matches {
        out.push('\n');
        out.push_str(&format_match(m));
    }
    out
}

// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod classifier;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod keywords;
pub mod location;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod orchestrator;
pub mod run;
pub mod scoring;
pub mod scrape;
pub mod seen;

// ---- Re-exports for stable public API ----
pub use crate::classifier::{Classifier, ClassifierConfig};
pub use crate::config::AppConfig;
pub use crate::error::{ConfigError, FetchError, PersistenceError};
pub use crate::models::{FetchResult, Match, Posting, RunStats, SeenRecord};
pub use crate::notify::NotifierMux;
pub use crate::orchestrator::Orchestrator;
pub use crate::run::{run_once, RunOutcome};
pub use crate::seen::SeenStore;

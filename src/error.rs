// src/error.rs
//! Error taxonomy for the radar pipeline.
//!
//! - [`ConfigError`] is fatal and aborts startup.
//! - [`FetchError`] is recorded per source and never escapes the orchestrator.
//! - [`PersistenceError`] is logged; the run continues with in-memory state.

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no config file found (set JOB_RADAR_CONFIG or create config/job_radar.toml)")]
    NotFound,
}

/// Per-source fetch failure. Captured into `FetchResult::error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, DNS failure, TLS failure, body read failure.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// Any of the bounded HTTP timeouts fired.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Non-2xx response.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Malformed HTML/JSON, or an unusable selector.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("fetch cancelled")]
    Cancelled,

    /// The fetch task itself failed (panic, join error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// Coarse error class used in logs, metrics and exports.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } | FetchError::Timeout { .. } | FetchError::Status { .. } => {
                "network"
            }
            FetchError::Parse(_) => "parse",
            FetchError::Cancelled => "cancelled",
            FetchError::Internal(_) => "internal",
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == "network"
    }

    /// Map a reqwest error into the taxonomy, keeping timeouts distinct.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout {
                url: url.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return FetchError::Parse(format!("{url}: {err}"));
        }
        FetchError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Exported as `{ "kind": "...", "message": "..." }`.
impl Serialize for FetchError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("FetchError", 2)?;
        st.serialize_field("kind", self.kind())?;
        st.serialize_field("message", &self.to_string())?;
        st.end()
    }
}

/// Seen-ledger read/write failure.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("seen store I/O at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seen store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

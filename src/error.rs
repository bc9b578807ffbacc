// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Failures while talking to the remote ticket source.
///
/// All variants are recoverable: the syncer falls back to the last snapshot
/// and only surfaces the error when there is nothing to fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("network failure: {0}")]
    Transport(String),

    #[error("{}", rate_limit_message(.remaining, .retry_after_mins))]
    RateLimited {
        remaining: Option<u64>,
        /// Minutes until the quota resets, rounded up, at least 1.
        retry_after_mins: Option<u64>,
    },

    #[error("GitHub API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("remote reported \"not modified\" for an unconditional request")]
    UnexpectedNotModified,
}

impl SyncError {
    /// Build a rate-limit error from the raw `x-ratelimit-*` header values.
    ///
    /// `reset_epoch` is in seconds; `now_ms` is wall-clock epoch millis.
    pub fn rate_limited(remaining: Option<&str>, reset_epoch: Option<&str>, now_ms: i64) -> Self {
        let remaining = remaining.and_then(|v| v.trim().parse::<u64>().ok());
        let retry_after_mins = reset_epoch
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|secs| retry_minutes(secs.saturating_mul(1000), now_ms));
        SyncError::RateLimited { remaining, retry_after_mins }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SyncError::RateLimited { .. })
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}

fn retry_minutes(reset_ms: i64, now_ms: i64) -> u64 {
    let left = reset_ms.saturating_sub(now_ms);
    // ceil for positive values; anything already past clamps to 1
    let mins = if left <= 0 { 0 } else { left.saturating_add(59_999) / 60_000 };
    mins.max(1) as u64
}

fn rate_limit_message(remaining: &Option<u64>, retry_after_mins: &Option<u64>) -> String {
    let mut msg = s!("GitHub rate limit hit while loading inventory.");
    if let Some(r) = remaining {
        msg.push_str(&format!(" Remaining: {r}."));
    }
    if let Some(m) = *retry_after_mins {
        let plural = if m == 1 { "" } else { "s" };
        msg.push_str(&format!(" Try again in about {m} minute{plural}."));
    }
    msg
}

/// Failures while submitting a reservation. Messages carry the remote
/// service's own text whenever it sent one.
#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("reservation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("reservation rejected: {0}")]
    Rejected(String),

    #[error("unexpected reservation response (HTTP {status}): {body}")]
    Malformed { status: u16, body: String },

    #[error("invalid reservation endpoint: {0}")]
    Endpoint(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

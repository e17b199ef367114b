// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for apitap
//!
//! Tracking failures (`MalformedUrl`, `TelemetryUnavailable`) are contained
//! inside the tracker and only reported through `tracing`. Failures of the
//! wrapped real call (`Upstream`, `Http`) are handed back to the caller
//! exactly as the real call produced them.

use thiserror::Error;

/// Result type alias for apitap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apitap
#[derive(Error, Debug)]
pub enum Error {
    /// Target URL could not be resolved against the page location
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// Resource timing buffer cannot be read in this environment
    #[error("Resource timing unavailable: {0}")]
    TelemetryUnavailable(String),

    /// The wrapped real call failed
    #[error("{0}")]
    Upstream(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed URL error
    pub fn malformed_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::MalformedUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an upstream failure, as a host API would report it
    pub fn upstream<S: Into<String>>(msg: S) -> Self {
        Error::Upstream(msg.into())
    }

    /// Create a telemetry error
    pub fn telemetry<S: Into<String>>(msg: S) -> Self {
        Error::TelemetryUnavailable(msg.into())
    }

    /// Message of the underlying failure, without this crate's variant prefix
    pub fn upstream_message(&self) -> String {
        match self {
            Error::Http(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Check if this failure came from the real call rather than from tracking
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_) | Error::Http(_))
    }

    /// Check if this failure came from the tracker itself
    pub fn is_tracking_failure(&self) -> bool {
        matches!(
            self,
            Error::MalformedUrl { .. } | Error::TelemetryUnavailable(_)
        )
    }

    /// Get the offending URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::MalformedUrl { url, .. } => Some(url),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

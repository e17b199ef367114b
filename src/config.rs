// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Tracker configuration

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::CallType;

/// Tracker configuration
///
/// Every option toggles independently. Defaults track every API and capture
/// no optional enrichment fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Track the request-response (fetch) API
    pub track_fetch: bool,
    /// Track connection objects (open/send pairs)
    pub track_xhr: bool,
    /// Track persistent socket construction
    pub track_websockets: bool,
    /// Track fire-and-forget beacons
    pub track_beacon: bool,
    /// Track event-stream construction
    pub track_eventsource: bool,
    /// Import the resource timing buffer at startup
    pub track_performance: bool,
    /// Skip calls to the page's own origin
    pub ignore_same_origin: bool,
    /// Only track URLs matching this regex
    pub filter_pattern: Option<String>,
    /// Group the report by domain
    pub group_by_domain: bool,
    /// Number of recent calls shown by the report
    pub display_limit: usize,
    /// Capture request/response headers
    pub save_headers: bool,
    /// Capture response size and status
    pub save_response_sizes: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            track_fetch: true,
            track_xhr: true,
            track_websockets: true,
            track_beacon: true,
            track_eventsource: true,
            track_performance: true,
            ignore_same_origin: false,
            filter_pattern: None,
            group_by_domain: false,
            display_limit: 100,
            save_headers: false,
            save_response_sizes: false,
        }
    }
}

impl TrackerConfig {
    /// Create a new tracker config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.compiled_filter()?;
        Ok(config)
    }

    /// Enable/disable fetch tracking
    pub fn track_fetch(mut self, enabled: bool) -> Self {
        self.track_fetch = enabled;
        self
    }

    /// Enable/disable connection object tracking
    pub fn track_xhr(mut self, enabled: bool) -> Self {
        self.track_xhr = enabled;
        self
    }

    /// Enable/disable socket tracking
    pub fn track_websockets(mut self, enabled: bool) -> Self {
        self.track_websockets = enabled;
        self
    }

    /// Enable/disable beacon tracking
    pub fn track_beacon(mut self, enabled: bool) -> Self {
        self.track_beacon = enabled;
        self
    }

    /// Enable/disable event-stream tracking
    pub fn track_eventsource(mut self, enabled: bool) -> Self {
        self.track_eventsource = enabled;
        self
    }

    /// Enable/disable the resource timing import
    pub fn track_performance(mut self, enabled: bool) -> Self {
        self.track_performance = enabled;
        self
    }

    /// Skip same-origin calls
    pub fn ignore_same_origin(mut self, ignore: bool) -> Self {
        self.ignore_same_origin = ignore;
        self
    }

    /// Only track URLs matching `pattern`
    pub fn filter_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.filter_pattern = Some(pattern.into());
        self
    }

    /// Group the report by domain
    pub fn group_by_domain(mut self, group: bool) -> Self {
        self.group_by_domain = group;
        self
    }

    /// Set the report limit
    pub fn display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    /// Capture headers
    pub fn save_headers(mut self, save: bool) -> Self {
        self.save_headers = save;
        self
    }

    /// Capture response sizes and status codes
    pub fn save_response_sizes(mut self, save: bool) -> Self {
        self.save_response_sizes = save;
        self
    }

    /// Config that captures every optional field
    pub fn full_capture() -> Self {
        Self {
            save_headers: true,
            save_response_sizes: true,
            ..Default::default()
        }
    }

    /// Whether live interception is enabled for a call type
    pub fn tracks(&self, call_type: CallType) -> bool {
        match call_type {
            CallType::Fetch => self.track_fetch,
            CallType::Xhr => self.track_xhr,
            CallType::WebSocket => self.track_websockets,
            CallType::Beacon => self.track_beacon,
            CallType::EventSource => self.track_eventsource,
            CallType::Performance => self.track_performance,
        }
    }

    /// Compile the filter pattern, if any
    pub fn compiled_filter(&self) -> Result<Option<Regex>> {
        self.filter_pattern
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| Error::Config(format!("Invalid filter pattern: {}", e)))
            })
            .transpose()
    }
}

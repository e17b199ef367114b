// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Call record model
//!
//! A [`CallRecord`] is created the moment an interceptor observes a call
//! attempt. Its [`LogicalKey`] (type, resolved URL, method) is what the dedup
//! index admits at most once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Process-wide record counter, never reset
static RECORD_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Source API of a tracked call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// Request-response call (fetch)
    Fetch,
    /// Request-response call through a connection object
    Xhr,
    /// Persistent socket
    #[serde(rename = "websocket")]
    WebSocket,
    /// Fire-and-forget beacon
    Beacon,
    /// Server-sent event stream
    #[serde(rename = "eventsource")]
    EventSource,
    /// Resource timing entry with no matching initiator
    Performance,
}

impl CallType {
    /// Lowercase name used in exports and initiator matching
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Fetch => "fetch",
            CallType::Xhr => "xhr",
            CallType::WebSocket => "websocket",
            CallType::Beacon => "beacon",
            CallType::EventSource => "eventsource",
            CallType::Performance => "performance",
        }
    }

    /// Method recorded when the caller gives none. APIs without a verb get a
    /// fixed pseudo-verb.
    pub fn default_method(&self) -> &'static str {
        match self {
            CallType::Fetch | CallType::Xhr | CallType::Performance => "GET",
            CallType::WebSocket => "WS",
            CallType::Beacon => "BEACON",
            CallType::EventSource => "SSE",
        }
    }

    /// Map a resource timing `initiatorType` onto a call type
    pub fn from_initiator(initiator: &str) -> CallType {
        match initiator {
            "fetch" => CallType::Fetch,
            "xmlhttprequest" | "xhr" => CallType::Xhr,
            "beacon" => CallType::Beacon,
            "eventsource" => CallType::EventSource,
            "websocket" => CallType::WebSocket,
            _ => CallType::Performance,
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplication key of a call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalKey {
    pub call_type: CallType,
    pub url: String,
    pub method: String,
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.call_type, self.url, self.method)
    }
}

/// Optional enrichment fields. Unset fields are omitted from exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Declared content-length of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Bytes transferred, from resource timing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_size: Option<u64>,
    /// Beacon payload length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<usize>,
    /// Socket sub-protocol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_credentials: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds, from resource timing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Milliseconds since navigation start, from resource timing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
}

impl CallDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_protocol(mut self, protocol: Option<String>) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_data_size(mut self, size: Option<usize>) -> Self {
        self.data_size = size;
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = Some(with_credentials);
        self
    }

    pub fn with_timing(mut self, duration: f64, start_time: f64, transfer_size: u64) -> Self {
        self.duration = Some(duration);
        self.start_time = Some(start_time);
        self.transfer_size = Some(transfer_size);
        self
    }
}

/// A tracked call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Unique for the process lifetime
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: CallType,
    /// Resolved absolute URL
    pub url: String,
    /// Origin and path, no query or fragment
    pub clean_url: String,
    pub domain: String,
    pub method: String,
    pub timestamp: DateTime<Utc>,
    /// Human-readable local capture time
    pub local_time: String,
    #[serde(flatten)]
    pub details: CallDetails,
}

impl CallRecord {
    /// Normalize a raw call into a record.
    ///
    /// `raw_url` may be relative and is resolved against `base`. An empty or
    /// missing method falls back to the type's default verb.
    pub fn normalize(
        call_type: CallType,
        raw_url: &str,
        method: Option<&str>,
        base: &Url,
        details: CallDetails,
    ) -> Result<Self> {
        let url = resolve_url(raw_url, base)?;
        let method = method
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| call_type.default_method());

        let now = Utc::now();
        Ok(Self {
            id: next_record_id(),
            call_type,
            clean_url: clean_url(&url),
            domain: url.host_str().unwrap_or("").to_string(),
            url: url.to_string(),
            method: method.to_string(),
            timestamp: now,
            local_time: now
                .with_timezone(&Local)
                .format("%a %b %d %Y %H:%M:%S GMT%z")
                .to_string(),
            details,
        })
    }

    /// Deduplication key
    pub fn key(&self) -> LogicalKey {
        LogicalKey {
            call_type: self.call_type,
            url: self.url.clone(),
            method: self.method.clone(),
        }
    }

    /// Check if a completion outcome has been attached
    pub fn is_completed(&self) -> bool {
        self.details.status.is_some() || self.details.error.is_some()
    }

    /// Check if the call failed upstream
    pub fn is_failed(&self) -> bool {
        self.details.error.is_some()
    }
}

/// Resolve a possibly relative URL against the page location
pub fn resolve_url(raw_url: &str, base: &Url) -> Result<Url> {
    base.join(raw_url)
        .map_err(|e| Error::malformed_url(raw_url, e))
}

/// Origin plus path of a URL
pub fn clean_url(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}

fn next_record_id() -> String {
    let n = RECORD_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("call_{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://a.test/x/").unwrap()
    }

    #[test]
    fn test_relative_url_resolves_against_page() {
        let record = CallRecord::normalize(
            CallType::Fetch,
            "data.json?page=2#top",
            None,
            &page(),
            CallDetails::new(),
        )
        .unwrap();

        assert_eq!(record.url, "https://a.test/x/data.json?page=2#top");
        assert_eq!(record.clean_url, "https://a.test/x/data.json");
        assert_eq!(record.domain, "a.test");
        assert_eq!(record.method, "GET");
    }

    #[test]
    fn test_absolute_url_keeps_its_origin() {
        let record = CallRecord::normalize(
            CallType::Xhr,
            "http://other.test:8080/api/v1?q=1",
            Some("POST"),
            &page(),
            CallDetails::new(),
        )
        .unwrap();

        assert_eq!(record.clean_url, "http://other.test:8080/api/v1");
        assert_eq!(record.domain, "other.test");
        assert_eq!(record.method, "POST");
    }

    #[test]
    fn test_pseudo_verbs() {
        let base = page();
        let ws = CallRecord::normalize(CallType::WebSocket, "wss://a.test/ws", None, &base, CallDetails::new()).unwrap();
        let beacon = CallRecord::normalize(CallType::Beacon, "/log", None, &base, CallDetails::new()).unwrap();
        let sse = CallRecord::normalize(CallType::EventSource, "/events", Some(""), &base, CallDetails::new()).unwrap();

        assert_eq!(ws.method, "WS");
        assert_eq!(beacon.method, "BEACON");
        assert_eq!(sse.method, "SSE");
    }

    #[test]
    fn test_malformed_url() {
        let result = CallRecord::normalize(
            CallType::Fetch,
            "http://[::1",
            None,
            &page(),
            CallDetails::new(),
        );

        assert!(matches!(result, Err(Error::MalformedUrl { .. })));
    }

    #[test]
    fn test_ids_are_unique() {
        let base = page();
        let a = CallRecord::normalize(CallType::Fetch, "/a", None, &base, CallDetails::new()).unwrap();
        let b = CallRecord::normalize(CallType::Fetch, "/a", None, &base, CallDetails::new()).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let record = CallRecord::normalize(
            CallType::EventSource,
            "/stream",
            None,
            &page(),
            CallDetails::new().with_credentials(true),
        )
        .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "eventsource");
        assert_eq!(json["cleanUrl"], "https://a.test/x/stream");
        assert_eq!(json["withCredentials"], true);
        assert!(json.get("status").is_none());
        assert!(json.get("headers").is_none());
        assert!(json.get("localTime").is_some());
    }

    #[test]
    fn test_from_initiator() {
        assert_eq!(CallType::from_initiator("fetch"), CallType::Fetch);
        assert_eq!(CallType::from_initiator("xmlhttprequest"), CallType::Xhr);
        assert_eq!(CallType::from_initiator("img"), CallType::Performance);
        assert_eq!(CallType::from_initiator(""), CallType::Performance);
    }
}

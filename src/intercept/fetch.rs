// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request-response interceptor

use async_trait::async_trait;

use super::host::{FetchApi, FetchInit, FetchInput};
use super::Interceptor;
use crate::correlator::Outcome;
use crate::error::Result;
use crate::http::FetchResponse;
use crate::record::{CallDetails, CallType};
use crate::tracker::Tracker;

/// Fetch decorator
///
/// The record is captured before the real call is issued. Status and
/// content-length are correlated on success when size capture is on; the
/// failure message is always stored and the failure is returned unchanged.
pub struct TrackedFetch<F> {
    tracker: Tracker,
    inner: F,
}

impl<F: FetchApi> TrackedFetch<F> {
    pub fn new(tracker: Tracker, inner: F) -> Self {
        Self { tracker, inner }
    }

    /// The wrapped implementation
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Convenience GET with no options
    pub async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.fetch(FetchInput::from(url), FetchInit::default()).await
    }

    fn details(&self, input: &FetchInput, init: &FetchInit) -> CallDetails {
        if !self.tracker.config().save_headers {
            return CallDetails::new();
        }
        let headers = init
            .headers
            .clone()
            .or_else(|| input.headers())
            .unwrap_or_default();
        CallDetails::new().with_headers(headers)
    }
}

impl<F> Interceptor for TrackedFetch<F> {
    const CALL_TYPE: CallType = CallType::Fetch;

    fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

#[async_trait]
impl<F: FetchApi> FetchApi for TrackedFetch<F> {
    async fn fetch(&self, input: FetchInput, init: FetchInit) -> Result<FetchResponse> {
        let handle = if self.enabled() {
            let method = init.method.as_deref().or_else(|| input.method());
            self.observe(input.url(), method, self.details(&input, &init))
        } else {
            None
        };

        let result = self.inner.fetch(input, init).await;

        if let Some(handle) = handle {
            match &result {
                Ok(response) if self.tracker.config().save_response_sizes => {
                    let outcome = Outcome::completed(
                        response.status_code(),
                        response.content_length().map(String::from),
                    );
                    self.tracker.correlator().correlate(handle, &outcome);
                }
                Ok(_) => {}
                Err(e) => {
                    self.tracker
                        .correlator()
                        .correlate(handle, &Outcome::failed(e.upstream_message()));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::error::Error;
    use crate::http::FetchRequest;
    use crate::intercept::mock::MockFetch;
    use std::time::Duration;

    fn tracker(config: TrackerConfig) -> Tracker {
        Tracker::new(config, "https://a.test/x/").unwrap()
    }

    #[tokio::test]
    async fn test_repeated_fetch_logged_once() {
        let tracker = tracker(TrackerConfig::default());
        let fetch = tracker.wrap_fetch(MockFetch::new());

        fetch.get("/api/x").await.unwrap();
        fetch.get("/api/x").await.unwrap();

        let records = tracker.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].call_type, CallType::Fetch);
        assert!(records[0].clean_url.ends_with("/api/x"));
        assert_eq!(records[0].method, "GET");
        // Both calls still reached the real API
        assert_eq!(fetch.inner().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_status_and_size_correlated() {
        let tracker = tracker(TrackerConfig::new().save_response_sizes(true));
        let fetch = tracker.wrap_fetch(MockFetch::new().respond("https://a.test/api/items", 200, "123"));

        let response = fetch.get("/api/items").await.unwrap();
        assert_eq!(response.status_code(), 200);

        let records = tracker.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].details.status, Some(200));
        assert_eq!(records[0].details.response_size.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_no_size_capture_by_default() {
        let tracker = tracker(TrackerConfig::default());
        let fetch = tracker.wrap_fetch(MockFetch::new());

        fetch.get("/api/items").await.unwrap();
        assert!(tracker.records()[0].details.status.is_none());
    }

    #[tokio::test]
    async fn test_failure_recorded_and_returned_unchanged() {
        let tracker = tracker(TrackerConfig::default());
        let fetch = tracker.wrap_fetch(MockFetch::new().fail("https://a.test/down", "Failed to fetch"));

        let err = fetch.get("/down").await.unwrap_err();
        assert!(matches!(err, Error::Upstream(ref msg) if msg == "Failed to fetch"));

        let records = tracker.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].details.error.as_deref(), Some("Failed to fetch"));
    }

    #[tokio::test]
    async fn test_method_precedence() {
        let tracker = tracker(TrackerConfig::default());
        let fetch = tracker.wrap_fetch(MockFetch::new());

        fetch
            .fetch(FetchRequest::post("/a").into(), FetchInit::new())
            .await
            .unwrap();
        fetch
            .fetch(FetchRequest::post("/b").into(), FetchInit::new().method("PUT"))
            .await
            .unwrap();

        let methods: Vec<String> = tracker.records().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["POST", "PUT"]);
    }

    #[tokio::test]
    async fn test_headers_snapshot() {
        let tracker = tracker(TrackerConfig::new().save_headers(true));
        let fetch = tracker.wrap_fetch(MockFetch::new());

        let request = FetchRequest::get("/from-descriptor").header("x-token", "abc");
        fetch.fetch(request.into(), FetchInit::new()).await.unwrap();
        fetch
            .fetch("/from-init".into(), FetchInit::new().header("accept", "application/json"))
            .await
            .unwrap();
        fetch.get("/none").await.unwrap();

        let records = tracker.records();
        let headers: Vec<_> = records.iter().map(|r| r.details.headers.clone().unwrap()).collect();
        assert_eq!(headers[0].get("x-token").map(String::as_str), Some("abc"));
        assert_eq!(headers[1].get("accept").map(String::as_str), Some("application/json"));
        assert!(headers[2].is_empty());
    }

    #[tokio::test]
    async fn test_malformed_url_fails_open() {
        let tracker = tracker(TrackerConfig::default());
        let fetch = tracker.wrap_fetch(MockFetch::new());

        let result = fetch.get("http://[::1").await;

        assert!(tracker.records().is_empty());
        // The real call ran with the original argument and its result came back
        assert_eq!(fetch.inner().calls(), vec!["http://[::1".to_string()]);
        assert!(matches!(result, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn test_disabled_passes_through() {
        let tracker = tracker(TrackerConfig::new().track_fetch(false));
        let fetch = tracker.wrap_fetch(MockFetch::new());

        fetch.get("/api/x").await.unwrap();
        assert!(tracker.records().is_empty());
        assert_eq!(fetch.inner().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_order_follows_issue_not_completion() {
        let tracker = tracker(TrackerConfig::new().save_response_sizes(true));
        let fetch = tracker.wrap_fetch(
            MockFetch::new()
                .delay("https://a.test/slow", Duration::from_millis(50))
                .respond("https://a.test/slow", 200, "slow")
                .respond("https://a.test/fast", 204, ""),
        );

        let (slow, fast) = futures::join!(fetch.get("/slow"), fetch.get("/fast"));
        slow.unwrap();
        fast.unwrap();

        let records = tracker.records();
        assert_eq!(records[0].url, "https://a.test/slow");
        assert_eq!(records[1].url, "https://a.test/fast");
        assert_eq!(records[0].details.status, Some(200));
        assert_eq!(records[1].details.status, Some(204));
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory host capabilities for tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use url::Url;

use super::host::*;
use crate::error::{Error, Result};
use crate::http::FetchResponse;

const PAGE: &str = "https://a.test/x/";

/// Fetch that answers from a table, resolving URLs against the test page
#[derive(Default)]
pub struct MockFetch {
    calls: Arc<Mutex<Vec<String>>>,
    responses: HashMap<String, (u16, String)>,
    failures: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.failures.insert(url.to_string(), message.to_string());
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Raw URLs received, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl FetchApi for MockFetch {
    async fn fetch(&self, input: FetchInput, _init: FetchInit) -> Result<FetchResponse> {
        self.calls.lock().push(input.url().to_string());

        let url = Url::parse(PAGE)
            .and_then(|base| base.join(input.url()))
            .map_err(|e| Error::upstream(format!("Failed to fetch: {}", e)))?;

        if let Some(delay) = self.delays.get(url.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = self.failures.get(url.as_str()) {
            return Err(Error::upstream(message.clone()));
        }

        let (status, body) = self
            .responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| (200, "ok".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from(body.len()));

        Ok(FetchResponse::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
            headers,
            Bytes::from(body),
            url,
        ))
    }
}

/// Connection object driven by the test
#[derive(Default)]
pub struct MockXhr {
    pub opened: Vec<(String, String)>,
    pub sent: Vec<Option<Bytes>>,
    ready_state: ReadyState,
    status: u16,
    response_headers: Vec<(String, String)>,
    handler: Option<ReadyStateHandler>,
}

impl MockXhr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers known before send, as a browser may expose on reuse
    pub fn with_response_headers(mut self, headers: &[(&str, &str)]) -> Self {
        self.response_headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    /// Move to the terminal state and fire the handler
    pub fn complete(&mut self, status: u16, headers: &[(&str, &str)]) {
        self.status = status;
        self.response_headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.ready_state = ReadyState::Done;
        self.fire();
    }

    /// Move to an intermediate state and fire the handler
    pub fn advance(&mut self, state: ReadyState) {
        self.ready_state = state;
        self.fire();
    }

    /// Fire the current handler again without changing state
    pub fn fire(&mut self) {
        if let Some(mut handler) = self.handler.take() {
            handler(&*self);
            if self.handler.is_none() {
                self.handler = Some(handler);
            }
        }
    }
}

impl XhrSnapshot for MockXhr {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn response_header(&self, name: &str) -> Option<String> {
        self.response_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    fn all_response_headers(&self) -> String {
        self.response_headers
            .iter()
            .map(|(k, v)| format!("{}: {}\r\n", k, v))
            .collect()
    }
}

impl XhrConnection for MockXhr {
    fn open(&mut self, method: &str, url: &str) -> Result<()> {
        self.opened.push((method.to_string(), url.to_string()));
        self.ready_state = ReadyState::Opened;
        Ok(())
    }

    fn send(&mut self, body: Option<Bytes>) -> Result<()> {
        self.sent.push(body);
        Ok(())
    }

    fn set_onreadystatechange(&mut self, handler: Option<ReadyStateHandler>) {
        self.handler = handler;
    }

    fn take_onreadystatechange(&mut self) -> Option<ReadyStateHandler> {
        self.handler.take()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSocket {
    pub url: String,
    pub protocol: Option<String>,
}

#[derive(Default)]
pub struct MockWebSocketFactory {
    pub connects: Mutex<Vec<MockSocket>>,
}

impl WebSocketFactory for MockWebSocketFactory {
    type Socket = MockSocket;

    fn connect(&self, url: &str, protocol: Option<&str>) -> Result<MockSocket> {
        let socket = MockSocket {
            url: url.to_string(),
            protocol: protocol.map(String::from),
        };
        self.connects.lock().push(socket.clone());
        Ok(socket)
    }
}

#[derive(Default)]
pub struct MockBeacon {
    pub sent: Mutex<Vec<(String, Option<BeaconData>)>>,
    pub refuse: bool,
}

impl BeaconApi for MockBeacon {
    fn send_beacon(&self, url: &str, data: Option<&BeaconData>) -> bool {
        self.sent.lock().push((url.to_string(), data.cloned()));
        !self.refuse
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStream {
    pub url: String,
    pub init: Option<EventSourceInit>,
}

#[derive(Default)]
pub struct MockEventSourceFactory {
    pub opened: Mutex<Vec<MockStream>>,
}

impl EventSourceFactory for MockEventSourceFactory {
    type Stream = MockStream;

    fn open(&self, url: &str, init: Option<EventSourceInit>) -> Result<MockStream> {
        let stream = MockStream {
            url: url.to_string(),
            init,
        };
        self.opened.lock().push(stream.clone());
        Ok(stream)
    }
}

/// Timing source that is unsupported
pub struct UnsupportedTiming;

impl ResourceTimingSource for UnsupportedTiming {
    fn resource_entries(&self) -> Result<Vec<ResourceEntry>> {
        Err(Error::telemetry("performance.getEntriesByType is not a function"))
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host network capabilities
//!
//! Each capability a page can use to reach the network is a trait. The
//! tracker decorates an implementation and implements the same trait, so host
//! code holds a wrapped value exactly where it held the real one.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::{FetchRequest, FetchResponse};

/// First argument of a fetch call
#[derive(Debug, Clone)]
pub enum FetchInput {
    /// Plain URL, possibly relative
    Url(String),
    /// Request descriptor
    Request(FetchRequest),
}

impl FetchInput {
    /// Target URL as given by the caller
    pub fn url(&self) -> &str {
        match self {
            FetchInput::Url(url) => url,
            FetchInput::Request(request) => &request.url,
        }
    }

    /// Method carried by a request descriptor
    pub fn method(&self) -> Option<&str> {
        match self {
            FetchInput::Url(_) => None,
            FetchInput::Request(request) => Some(request.method.as_str()),
        }
    }

    /// Headers carried by a request descriptor
    pub fn headers(&self) -> Option<BTreeMap<String, String>> {
        match self {
            FetchInput::Url(_) => None,
            FetchInput::Request(request) => Some(request.header_map()),
        }
    }
}

impl From<&str> for FetchInput {
    fn from(url: &str) -> Self {
        FetchInput::Url(url.to_string())
    }
}

impl From<String> for FetchInput {
    fn from(url: String) -> Self {
        FetchInput::Url(url)
    }
}

impl From<FetchRequest> for FetchInput {
    fn from(request: FetchRequest) -> Self {
        FetchInput::Request(request)
    }
}

/// Explicit fetch options. Set fields override the request descriptor.
#[derive(Debug, Clone, Default)]
pub struct FetchInit {
    pub method: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<Bytes>,
}

impl FetchInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Request-response capability
#[async_trait]
pub trait FetchApi: Send + Sync {
    async fn fetch(&self, input: FetchInput, init: FetchInit) -> Result<FetchResponse>;
}

#[async_trait]
impl<T: FetchApi + ?Sized> FetchApi for Arc<T> {
    async fn fetch(&self, input: FetchInput, init: FetchInit) -> Result<FetchResponse> {
        (**self).fetch(input, init).await
    }
}

/// Connection object ready state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    #[default]
    Unsent,
    Opened,
    HeadersReceived,
    Loading,
    Done,
}

/// Read-only view of a connection, handed to ready state handlers
pub trait XhrSnapshot {
    fn ready_state(&self) -> ReadyState;
    fn status(&self) -> u16;
    fn response_header(&self, name: &str) -> Option<String>;
    /// All response headers as CRLF-separated `name: value` lines
    fn all_response_headers(&self) -> String;
}

/// Ready state change handler
pub type ReadyStateHandler = Box<dyn FnMut(&dyn XhrSnapshot) + Send>;

/// Connection object with an open/send pair
pub trait XhrConnection: XhrSnapshot + Send {
    fn open(&mut self, method: &str, url: &str) -> Result<()>;
    fn send(&mut self, body: Option<Bytes>) -> Result<()>;
    fn set_onreadystatechange(&mut self, handler: Option<ReadyStateHandler>);
    fn take_onreadystatechange(&mut self) -> Option<ReadyStateHandler>;
}

/// Persistent socket constructor
pub trait WebSocketFactory: Send + Sync {
    type Socket;

    fn connect(&self, url: &str, protocol: Option<&str>) -> Result<Self::Socket>;
}

/// Beacon payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeaconData {
    Text(String),
    Binary(Bytes),
}

impl BeaconData {
    /// Best-effort payload length: UTF-16 units for text, bytes otherwise
    pub fn size_hint(&self) -> usize {
        match self {
            BeaconData::Text(text) => text.encode_utf16().count(),
            BeaconData::Binary(bytes) => bytes.len(),
        }
    }
}

/// Fire-and-forget send capability
pub trait BeaconApi: Send + Sync {
    /// Returns whether the payload was queued
    fn send_beacon(&self, url: &str, data: Option<&BeaconData>) -> bool;
}

/// Event stream options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSourceInit {
    pub with_credentials: bool,
}

/// Event stream constructor
pub trait EventSourceFactory: Send + Sync {
    type Stream;

    fn open(&self, url: &str, init: Option<EventSourceInit>) -> Result<Self::Stream>;
}

/// Resource timing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Resolved resource URL
    pub name: String,
    pub initiator_type: String,
    pub start_time: f64,
    pub duration: f64,
    pub transfer_size: u64,
}

impl ResourceEntry {
    pub fn new(name: impl Into<String>, initiator_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initiator_type: initiator_type.into(),
            start_time: 0.0,
            duration: 0.0,
            transfer_size: 0,
        }
    }

    pub fn with_timing(mut self, start_time: f64, duration: f64) -> Self {
        self.start_time = start_time;
        self.duration = duration;
        self
    }

    pub fn with_transfer_size(mut self, size: u64) -> Self {
        self.transfer_size = size;
        self
    }
}

/// Read-only resource timing query
pub trait ResourceTimingSource {
    /// Fails with `TelemetryUnavailable` where timing is unsupported
    fn resource_entries(&self) -> Result<Vec<ResourceEntry>>;
}

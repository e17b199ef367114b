// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # apitap - In-process Network Call Tracker
//!
//! Wraps the network-originating capabilities of a host environment and keeps
//! a deduplicated, queryable log of every distinct outbound call.
//!
//! ## Features
//!
//! - Transparent decorators: the real call always runs with the caller's arguments
//! - Request-response, connection object, socket, beacon and event-stream capture
//! - One-time backfill from the resource timing buffer
//! - Deduplication by (type, resolved URL, method)
//! - Late completion correlation (status, response size, error)
//! - Report rendering and JSON export
//!
//! ## Example
//!
//! ```rust,no_run
//! use apitap::{HttpClient, Tracker, TrackerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tracker = Tracker::new(TrackerConfig::full_capture(), "https://example.com/")?;
//!     let fetch = tracker.wrap_fetch(HttpClient::new()?);
//!
//!     fetch.get("https://example.com/api/status").await?;
//!     fetch.get("https://example.com/api/status").await?;
//!
//!     // One record for both calls
//!     println!("{}", tracker.report());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod correlator;
pub mod dedup;
pub mod error;
pub mod export;
pub mod http;
pub mod intercept;
pub mod record;
pub mod report;
pub mod store;
pub mod tracker;

// Re-exports for convenience

// Tracker
pub use config::TrackerConfig;
pub use tracker::Tracker;

// Records
pub use record::{CallDetails, CallRecord, CallType, LogicalKey};
pub use store::{LogStore, RecordHandle};
pub use dedup::DedupIndex;
pub use correlator::{ConnectionId, ConnectionTable, Correlator, Outcome};

// Interceptors
pub use intercept::{
    Interceptor, TrackedBeacon, TrackedEventSource, TrackedFetch, TrackedWebSocket, TrackedXhr,
};
pub use intercept::{
    BeaconApi, BeaconData, EventSourceFactory, EventSourceInit, FetchApi, FetchInit, FetchInput,
    ReadyState, ReadyStateHandler, ResourceEntry, ResourceTimingBuffer, ResourceTimingSource,
    WebSocketFactory, XhrConnection, XhrSnapshot,
};

// Output
pub use export::{export_filename, write_export};
pub use report::Report;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{FetchRequest, FetchResponse, HttpClient, HttpClientConfig};

/// apitap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor set
//!
//! One decorator per host capability. Every decorator follows the same
//! contract: observe the call, delegate to the real capability with the
//! caller's arguments untouched, and optionally correlate the outcome later.
//! Tracking failures are swallowed and logged; the real call always runs.

mod beacon;
mod eventsource;
mod fetch;
mod host;
mod performance;
mod websocket;
mod xhr;

#[cfg(test)]
pub(crate) mod mock;

pub use beacon::TrackedBeacon;
pub use eventsource::TrackedEventSource;
pub use fetch::TrackedFetch;
pub use host::{
    BeaconApi, BeaconData, EventSourceFactory, EventSourceInit, FetchApi, FetchInit, FetchInput,
    ReadyState, ReadyStateHandler, ResourceEntry, ResourceTimingSource, WebSocketFactory,
    XhrConnection, XhrSnapshot,
};
pub use performance::{ResourceTimingBuffer, IMPORTED_TYPES};
pub use websocket::TrackedWebSocket;
pub use xhr::TrackedXhr;

pub(crate) use performance::import_entries;

use crate::record::{CallDetails, CallType};
use crate::store::RecordHandle;
use crate::tracker::Tracker;

/// Observe step shared by every interceptor
pub trait Interceptor {
    /// Type recorded by this interceptor
    const CALL_TYPE: CallType;

    /// Tracker the interceptor reports to
    fn tracker(&self) -> &Tracker;

    /// Whether live tracking is enabled for this interceptor
    fn enabled(&self) -> bool {
        self.tracker().config().tracks(Self::CALL_TYPE)
    }

    /// Capture a call attempt. Returns the new record, or `None` when the
    /// call was filtered, deduplicated or could not be normalized.
    fn observe(&self, url: &str, method: Option<&str>, details: CallDetails) -> Option<RecordHandle> {
        if !self.enabled() {
            return None;
        }
        self.tracker().capture(Self::CALL_TYPE, url, method, details)
    }
}

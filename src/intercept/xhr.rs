// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Connection object interceptor (open/send pair)

use std::collections::BTreeMap;

use bytes::Bytes;

use super::host::{ReadyState, ReadyStateHandler, XhrConnection, XhrSnapshot};
use super::Interceptor;
use crate::correlator::{ConnectionId, Outcome};
use crate::error::Result;
use crate::record::{CallDetails, CallType};
use crate::store::RecordHandle;
use crate::tracker::Tracker;

/// Connection object decorator
///
/// The record is captured at `open`. The connection finds its record again
/// through the tracker's connection side table, never through the logical
/// key, so connections sharing a key cannot correlate onto each other.
pub struct TrackedXhr<C> {
    tracker: Tracker,
    inner: C,
    connection: ConnectionId,
    sent: bool,
}

impl<C: XhrConnection> TrackedXhr<C> {
    pub fn new(tracker: Tracker, inner: C) -> Self {
        let connection = tracker.correlator().connections().register();
        Self {
            tracker,
            inner,
            connection,
            sent: false,
        }
    }

    /// The wrapped connection
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The wrapped connection, mutably
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Record captured at the last `open`, if it was admitted
    pub fn record(&self) -> Option<RecordHandle> {
        self.tracker.correlator().connections().record_of(self.connection)
    }

    /// Merge the currently known response headers into the record.
    ///
    /// At send time the response has normally not arrived, so this usually
    /// merges nothing.
    fn merge_response_headers(&self, handle: RecordHandle) {
        let parsed = parse_header_lines(&self.inner.all_response_headers());
        self.tracker.store().update(handle, |record| {
            record
                .details
                .headers
                .get_or_insert_with(BTreeMap::new)
                .extend(parsed);
        });
    }

    /// Compose the completion step in front of the host's handler
    fn completion_handler(&self, previous: Option<ReadyStateHandler>) -> ReadyStateHandler {
        let correlator = self.tracker.correlator().clone();
        let connection = self.connection;
        let save_sizes = self.tracker.config().save_response_sizes;
        let mut previous = previous;

        Box::new(move |xhr: &dyn XhrSnapshot| {
            if xhr.ready_state() == ReadyState::Done {
                let outcome = if save_sizes {
                    Outcome::completed(xhr.status(), xhr.response_header("content-length"))
                } else {
                    Outcome::default()
                };
                correlator.correlate_connection(connection, &outcome);
            }
            if let Some(handler) = previous.as_mut() {
                handler(xhr);
            }
        })
    }
}

impl<C> Interceptor for TrackedXhr<C> {
    const CALL_TYPE: CallType = CallType::Xhr;

    fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

impl<C: XhrConnection> XhrSnapshot for TrackedXhr<C> {
    fn ready_state(&self) -> ReadyState {
        self.inner.ready_state()
    }

    fn status(&self) -> u16 {
        self.inner.status()
    }

    fn response_header(&self, name: &str) -> Option<String> {
        self.inner.response_header(name)
    }

    fn all_response_headers(&self) -> String {
        self.inner.all_response_headers()
    }
}

impl<C: XhrConnection> XhrConnection for TrackedXhr<C> {
    fn open(&mut self, method: &str, url: &str) -> Result<()> {
        let details = if self.tracker.config().save_headers {
            CallDetails::new().with_headers(BTreeMap::new())
        } else {
            CallDetails::new()
        };
        let handle = self.observe(url, Some(method), details);
        self.tracker
            .correlator()
            .connections()
            .bind(self.connection, handle);
        self.sent = false;

        self.inner.open(method, url)
    }

    fn send(&mut self, body: Option<Bytes>) -> Result<()> {
        if let Some(handle) = self.record() {
            if self.tracker.config().save_headers {
                self.merge_response_headers(handle);
            }
        }

        let previous = self.inner.take_onreadystatechange();
        let handler = self.completion_handler(previous);
        self.inner.set_onreadystatechange(Some(handler));
        self.sent = true;

        self.inner.send(body)
    }

    fn set_onreadystatechange(&mut self, handler: Option<ReadyStateHandler>) {
        if self.sent {
            let composed = self.completion_handler(handler);
            self.inner.set_onreadystatechange(Some(composed));
        } else {
            self.inner.set_onreadystatechange(handler);
        }
    }

    fn take_onreadystatechange(&mut self) -> Option<ReadyStateHandler> {
        self.inner.take_onreadystatechange()
    }
}

impl<C> Drop for TrackedXhr<C> {
    fn drop(&mut self) {
        self.tracker.correlator().connections().release(self.connection);
    }
}

/// Parse CRLF-separated `name: value` lines
fn parse_header_lines(raw: &str) -> Vec<(String, String)> {
    raw.split("\r\n")
        .filter_map(|line| line.split_once(": "))
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

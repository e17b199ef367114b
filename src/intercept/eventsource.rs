// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Event stream interceptor

use super::host::{EventSourceFactory, EventSourceInit};
use super::Interceptor;
use crate::error::Result;
use crate::record::{CallDetails, CallType};
use crate::tracker::Tracker;

/// Event stream constructor decorator
pub struct TrackedEventSource<E> {
    tracker: Tracker,
    inner: E,
}

impl<E: EventSourceFactory> TrackedEventSource<E> {
    pub fn new(tracker: Tracker, inner: E) -> Self {
        Self { tracker, inner }
    }

    /// The wrapped constructor
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E> Interceptor for TrackedEventSource<E> {
    const CALL_TYPE: CallType = CallType::EventSource;

    fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

impl<E: EventSourceFactory> EventSourceFactory for TrackedEventSource<E> {
    type Stream = E::Stream;

    fn open(&self, url: &str, init: Option<EventSourceInit>) -> Result<E::Stream> {
        let with_credentials = init.map(|i| i.with_credentials).unwrap_or(false);
        self.observe(url, None, CallDetails::new().with_credentials(with_credentials));
        self.inner.open(url, init)
    }
}

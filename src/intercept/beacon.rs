// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fire-and-forget interceptor

use super::host::{BeaconApi, BeaconData};
use super::Interceptor;
use crate::record::{CallDetails, CallType};
use crate::tracker::Tracker;

/// Beacon decorator
pub struct TrackedBeacon<B> {
    tracker: Tracker,
    inner: B,
}

impl<B: BeaconApi> TrackedBeacon<B> {
    pub fn new(tracker: Tracker, inner: B) -> Self {
        Self { tracker, inner }
    }

    /// The wrapped sender
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B> Interceptor for TrackedBeacon<B> {
    const CALL_TYPE: CallType = CallType::Beacon;

    fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

impl<B: BeaconApi> BeaconApi for TrackedBeacon<B> {
    fn send_beacon(&self, url: &str, data: Option<&BeaconData>) -> bool {
        self.observe(
            url,
            None,
            CallDetails::new().with_data_size(data.map(BeaconData::size_hint)),
        );
        self.inner.send_beacon(url, data)
    }
}

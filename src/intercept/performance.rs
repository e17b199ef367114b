// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resource timing import
//!
//! A one-time backfill of calls made before interception was installed, or
//! issued by markup rather than script. The buffer is scanned once and never
//! polled.

use std::sync::Arc;

use parking_lot::RwLock;

use super::host::{ResourceEntry, ResourceTimingSource};
use crate::error::Result;
use crate::record::{CallDetails, CallType};
use crate::tracker::Tracker;

/// Initiator types the importer synthesizes records for
pub const IMPORTED_TYPES: [CallType; 4] = [
    CallType::Fetch,
    CallType::Xhr,
    CallType::Beacon,
    CallType::EventSource,
];

/// Shared in-memory resource timing buffer
#[derive(Debug, Clone, Default)]
pub struct ResourceTimingBuffer {
    entries: Arc<RwLock<Vec<ResourceEntry>>>,
    /// Maximum entries kept, like the browser's buffer size
    capacity: Option<usize>,
}

impl ResourceTimingBuffer {
    /// Create an unbounded buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that drops entries once `capacity` is reached
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            capacity: Some(capacity),
        }
    }

    /// Add an entry. Entries past capacity are dropped.
    pub fn push(&self, entry: ResourceEntry) {
        let mut entries = self.entries.write();
        if self.capacity.map_or(true, |cap| entries.len() < cap) {
            entries.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ResourceTimingSource for ResourceTimingBuffer {
    fn resource_entries(&self) -> Result<Vec<ResourceEntry>> {
        Ok(self.entries.read().clone())
    }
}

/// Synthesize records for eligible entries. Returns how many were admitted.
///
/// Each record uses its type's default verb so that a live interceptor later
/// observing the same URL is deduplicated against it.
pub(crate) fn import_entries(tracker: &Tracker, entries: &[ResourceEntry]) -> usize {
    entries
        .iter()
        .filter_map(|entry| {
            let call_type = CallType::from_initiator(&entry.initiator_type);
            if !IMPORTED_TYPES.contains(&call_type) {
                return None;
            }
            let details = CallDetails::new().with_timing(
                entry.duration,
                entry.start_time,
                entry.transfer_size,
            );
            tracker.capture(
                call_type,
                &entry.name,
                Some(call_type.default_method()),
                details,
            )
        })
        .count()
}

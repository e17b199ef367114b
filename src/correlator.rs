// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Completion correlation
//!
//! Outcomes arrive after the record was appended. They are merged into the
//! existing record; a new record is never created. Connection objects are
//! tracked through a side table keyed by [`ConnectionId`] since several
//! connections can share one logical key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::record::CallDetails;
use crate::store::{LogStore, RecordHandle};

/// Late-arriving outcome of a call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub status: Option<u16>,
    /// Declared content-length
    pub response_size: Option<String>,
    pub error: Option<String>,
}

impl Outcome {
    /// Outcome of a completed call
    pub fn completed(status: u16, response_size: Option<String>) -> Self {
        Self {
            status: Some(status),
            response_size,
            error: None,
        }
    }

    /// Outcome of a failed call
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Merge into record details. Only fields present in the outcome are
    /// written.
    pub fn apply(&self, details: &mut CallDetails) {
        if let Some(status) = self.status {
            details.status = Some(status);
        }
        if let Some(ref size) = self.response_size {
            details.response_size = Some(size.clone());
        }
        if let Some(ref error) = self.error {
            details.error = Some(error.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.response_size.is_none() && self.error.is_none()
    }
}

/// Identity of a wrapped connection object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

#[derive(Debug)]
struct ConnectionSlot {
    record: Option<RecordHandle>,
    completed: bool,
}

/// Side table from connection identity to its call record
#[derive(Debug, Default)]
pub struct ConnectionTable {
    next_id: AtomicU64,
    slots: RwLock<HashMap<ConnectionId, ConnectionSlot>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an identity for a new connection
    pub fn register(&self) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.slots.write().insert(
            id,
            ConnectionSlot {
                record: None,
                completed: false,
            },
        );
        id
    }

    /// Point a connection at its record. Re-opening a connection rebinds it
    /// and re-arms completion.
    pub fn bind(&self, id: ConnectionId, record: Option<RecordHandle>) {
        self.slots.write().insert(
            id,
            ConnectionSlot {
                record,
                completed: false,
            },
        );
    }

    /// Record bound to a connection
    pub fn record_of(&self, id: ConnectionId) -> Option<RecordHandle> {
        self.slots.read().get(&id).and_then(|s| s.record)
    }

    /// Mark a connection complete. Returns its record only on the first call.
    pub fn complete(&self, id: ConnectionId) -> Option<RecordHandle> {
        let mut slots = self.slots.write();
        let slot = slots.get_mut(&id)?;
        if slot.completed {
            return None;
        }
        slot.completed = true;
        slot.record
    }

    /// Drop a connection's entry
    pub fn release(&self, id: ConnectionId) {
        self.slots.write().remove(&id);
    }

    /// Number of live connections
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

/// Attaches outcomes to stored records
#[derive(Debug, Clone)]
pub struct Correlator {
    store: LogStore,
    connections: Arc<ConnectionTable>,
}

impl Correlator {
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            connections: Arc::new(ConnectionTable::new()),
        }
    }

    /// Connection side table
    pub fn connections(&self) -> &ConnectionTable {
        &self.connections
    }

    /// Merge an outcome into a stored record
    pub fn correlate(&self, handle: RecordHandle, outcome: &Outcome) -> bool {
        tracing::trace!(record = handle.index(), ?outcome, "Correlating outcome");
        self.store.update(handle, |record| outcome.apply(&mut record.details))
    }

    /// Merge a connection's outcome, once per connection. Returns false for
    /// repeats and for connections with no record.
    pub fn correlate_connection(&self, id: ConnectionId, outcome: &Outcome) -> bool {
        match self.connections.complete(id) {
            Some(handle) => self.correlate(handle, outcome),
            None => false,
        }
    }
}

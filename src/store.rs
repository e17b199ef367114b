// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Append-only log of call records

use std::sync::Arc;

use parking_lot::RwLock;

use crate::record::{CallRecord, CallType};

/// Position of a record in the log. Stable for the life of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordHandle(usize);

impl RecordHandle {
    /// Insertion index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Insertion-ordered call record log
///
/// Records are never removed. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    records: Arc<RwLock<Vec<CallRecord>>>,
}

impl LogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its handle
    pub fn append(&self, record: CallRecord) -> RecordHandle {
        let mut records = self.records.write();
        records.push(record);
        RecordHandle(records.len() - 1)
    }

    /// Mutate a stored record in place. Returns false for an unknown handle.
    pub fn update<F>(&self, handle: RecordHandle, f: F) -> bool
    where
        F: FnOnce(&mut CallRecord),
    {
        match self.records.write().get_mut(handle.0) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    /// Get a copy of one record
    pub fn get(&self, handle: RecordHandle) -> Option<CallRecord> {
        self.records.read().get(handle.0).cloned()
    }

    /// All records in insertion order
    pub fn all(&self) -> Vec<CallRecord> {
        self.records.read().clone()
    }

    /// The last `n` records, newest first
    pub fn snapshot_recent(&self, n: usize) -> Vec<CallRecord> {
        self.records.read().iter().rev().take(n).cloned().collect()
    }

    /// Record count per type, in order of first appearance
    pub fn count_by_type(&self) -> Vec<(CallType, usize)> {
        let records = self.records.read();
        let mut counts: Vec<(CallType, usize)> = Vec::new();
        for record in records.iter() {
            match counts.iter_mut().find(|(t, _)| *t == record.call_type) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.call_type, 1)),
            }
        }
        counts
    }

    /// Count for a single type
    pub fn count_of(&self, call_type: CallType) -> usize {
        self.records
            .read()
            .iter()
            .filter(|r| r.call_type == call_type)
            .count()
    }

    /// Record count per domain, in order of first appearance
    pub fn count_by_domain(&self) -> Vec<(String, usize)> {
        let records = self.records.read();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in records.iter() {
            match counts.iter_mut().find(|(d, _)| *d == record.domain) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.domain.clone(), 1)),
            }
        }
        counts
    }

    /// Records whose upstream call failed
    pub fn failed(&self) -> Vec<CallRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.is_failed())
            .cloned()
            .collect()
    }

    /// Record count
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Export all records as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.records.read())
    }

    /// Export all records as an indented JSON array
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.records.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CallDetails;
    use url::Url;

    fn record(call_type: CallType, url: &str) -> CallRecord {
        let base = Url::parse("https://a.test/").unwrap();
        CallRecord::normalize(call_type, url, None, &base, CallDetails::new()).unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let store = LogStore::new();
        let a = store.append(record(CallType::Fetch, "/a"));
        let b = store.append(record(CallType::Fetch, "/b"));

        assert!(a < b);
        let all = store.all();
        assert_eq!(all[0].url, "https://a.test/a");
        assert_eq!(all[1].url, "https://a.test/b");
    }

    #[test]
    fn test_snapshot_recent_newest_first() {
        let store = LogStore::new();
        for path in ["/1", "/2", "/3", "/4"] {
            store.append(record(CallType::Fetch, path));
        }

        let recent: Vec<String> = store.snapshot_recent(2).into_iter().map(|r| r.url).collect();
        assert_eq!(recent, vec!["https://a.test/4", "https://a.test/3"]);
        assert_eq!(store.snapshot_recent(10).len(), 4);
    }

    #[test]
    fn test_count_by_type() {
        let store = LogStore::new();
        store.append(record(CallType::Xhr, "/a"));
        store.append(record(CallType::Fetch, "/b"));
        store.append(record(CallType::Xhr, "/c"));

        assert_eq!(
            store.count_by_type(),
            vec![(CallType::Xhr, 2), (CallType::Fetch, 1)]
        );
        assert_eq!(store.count_of(CallType::Beacon), 0);
    }

    #[test]
    fn test_update_in_place() {
        let store = LogStore::new();
        let handle = store.append(record(CallType::Fetch, "/a"));

        assert!(store.update(handle, |r| r.details.status = Some(204)));
        assert_eq!(store.get(handle).unwrap().details.status, Some(204));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clones_share_log() {
        let store = LogStore::new();
        let view = store.clone();
        store.append(record(CallType::Beacon, "/log"));

        assert_eq!(view.len(), 1);
    }
}

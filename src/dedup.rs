// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Dedup index
//!
//! The log is an inventory of distinct endpoints contacted, not a request
//! counter. Once a logical key is admitted it stays admitted for the life of
//! the index: no expiry, no re-admission after completion.

use dashmap::DashSet;

use crate::record::LogicalKey;

/// Set of logical keys already logged
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: DashSet<LogicalKey>,
}

impl DedupIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `key` is seen, false on every later call
    pub fn admit(&self, key: &LogicalKey) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.clone())
    }

    /// Number of admitted keys
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

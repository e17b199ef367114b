// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Summary report of the call log

use std::fmt;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::record::{CallRecord, CallType};
use crate::tracker::Tracker;

/// Point-in-time summary of a tracker's log
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Total records
    pub total: usize,
    /// Count per type, in order of first appearance
    pub by_type: Vec<(CallType, usize)>,
    /// Count per domain, when grouping is enabled
    pub by_domain: Option<Vec<(String, usize)>>,
    /// Most recent records, newest first
    pub recent: Vec<CallRecord>,
}

impl Report {
    /// Build a report from the tracker's current log
    pub fn new(tracker: &Tracker) -> Self {
        let by_domain = if tracker.config().group_by_domain {
            Some(tracker.count_by_domain())
        } else {
            None
        };

        Self {
            total: tracker.store().len(),
            by_type: tracker.count_by_type(),
            by_domain,
            recent: tracker.recent_default(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== API Call Logger ===")?;
        writeln!(f, "Tracking {} API calls.", self.total)?;

        writeln!(f, "API Call Types:")?;
        for (call_type, count) in &self.by_type {
            writeln!(f, "  {}: {} calls", call_type.as_str().to_uppercase(), count)?;
        }

        if let Some(ref domains) = self.by_domain {
            writeln!(f, "Domains:")?;
            for (domain, count) in domains {
                writeln!(f, "  {}: {} calls", domain, count)?;
            }
        }

        writeln!(f, "Recent API Calls:")?;
        for call in &self.recent {
            writeln!(
                f,
                "  {} - {} {} {}",
                call.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                call.call_type.as_str().to_uppercase(),
                call.method,
                call.url
            )?;
        }

        write!(f, "=== End of Report ===")
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! JSON export of the call log

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Result;
use crate::tracker::Tracker;

/// Export file name for a given instant, e.g.
/// `api-calls-2026-10-19T10-04-05-123Z.json`
pub fn export_filename(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-")
        .replace('.', "-");
    format!("api-calls-{}.json", stamp)
}

/// Write the full log into `dir` and return the file path
pub fn write_export(tracker: &Tracker, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(export_filename(Utc::now()));
    std::fs::write(&path, tracker.to_json()?)?;

    tracing::info!(
        calls = tracker.store().len(),
        path = %path.display(),
        "Exported API call log"
    );
    Ok(path)
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Tracker - process-wide tracking state
//!
//! One tracker owns one log store, one dedup index and one connection side
//! table for the lifetime of a page. Clones share that state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;
use url::Url;

use crate::config::TrackerConfig;
use crate::correlator::Correlator;
use crate::dedup::DedupIndex;
use crate::error::{Error, Result};
use crate::intercept::{
    import_entries, BeaconApi, EventSourceFactory, FetchApi, ResourceTimingSource, TrackedBeacon,
    TrackedEventSource, TrackedFetch, TrackedWebSocket, TrackedXhr, WebSocketFactory,
    XhrConnection,
};
use crate::record::{resolve_url, CallDetails, CallRecord, CallType};
use crate::report::Report;
use crate::store::{LogStore, RecordHandle};

struct TrackerInner {
    config: TrackerConfig,
    filter: Option<Regex>,
    /// Page location, base for relative URLs
    location: RwLock<Url>,
    store: LogStore,
    dedup: DedupIndex,
    correlator: Correlator,
    telemetry_imported: AtomicBool,
}

/// Network call tracker
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<TrackerInner>,
}

impl Tracker {
    /// Create a tracker for a page at `location`
    pub fn new(config: TrackerConfig, location: &str) -> Result<Self> {
        let filter = config.compiled_filter()?;
        let location = Url::parse(location).map_err(|e| Error::malformed_url(location, e))?;
        let store = LogStore::new();

        tracing::debug!(%location, "Tracker initialized");

        Ok(Self {
            inner: Arc::new(TrackerInner {
                config,
                filter,
                location: RwLock::new(location),
                correlator: Correlator::new(store.clone()),
                store,
                dedup: DedupIndex::new(),
                telemetry_imported: AtomicBool::new(false),
            }),
        })
    }

    /// Create a tracker with the default config
    pub fn with_defaults(location: &str) -> Result<Self> {
        Self::new(TrackerConfig::default(), location)
    }

    /// Get tracker configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    /// Current page location
    pub fn location(&self) -> Url {
        self.inner.location.read().clone()
    }

    /// Follow a page navigation. The log and dedup index are kept.
    pub fn set_location(&self, location: &str) -> Result<()> {
        let url = resolve_url(location, &self.location())?;
        *self.inner.location.write() = url;
        Ok(())
    }

    /// Log store
    pub fn store(&self) -> &LogStore {
        &self.inner.store
    }

    /// Dedup index
    pub fn dedup(&self) -> &DedupIndex {
        &self.inner.dedup
    }

    /// Completion correlator
    pub fn correlator(&self) -> &Correlator {
        &self.inner.correlator
    }

    /// Check the tracking filter for a raw URL
    pub fn should_track(&self, raw_url: &str) -> Result<bool> {
        if raw_url.is_empty() {
            return Ok(false);
        }

        if self.inner.config.ignore_same_origin {
            let location = self.location();
            if resolve_url(raw_url, &location)?.origin() == location.origin() {
                return Ok(false);
            }
        }

        if let Some(ref filter) = self.inner.filter {
            if !filter.is_match(raw_url) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Filter, normalize, admit and append a call
    pub fn try_capture(
        &self,
        call_type: CallType,
        raw_url: &str,
        method: Option<&str>,
        details: CallDetails,
    ) -> Result<Option<RecordHandle>> {
        if !self.should_track(raw_url)? {
            return Ok(None);
        }

        let record = CallRecord::normalize(call_type, raw_url, method, &self.location(), details)?;
        let key = record.key();
        if !self.inner.dedup.admit(&key) {
            tracing::debug!(%key, "Repeat call not logged");
            return Ok(None);
        }

        tracing::debug!(
            call_type = %record.call_type,
            method = %record.method,
            url = %record.url,
            "Call tracked"
        );
        Ok(Some(self.inner.store.append(record)))
    }

    /// Capture a call, containing any tracking failure
    pub fn capture(
        &self,
        call_type: CallType,
        raw_url: &str,
        method: Option<&str>,
        details: CallDetails,
    ) -> Option<RecordHandle> {
        match self.try_capture(call_type, raw_url, method, details) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!(error = %e, %call_type, "Error tracking call");
                None
            }
        }
    }

    /// Wrap a fetch implementation
    pub fn wrap_fetch<F: FetchApi>(&self, inner: F) -> TrackedFetch<F> {
        TrackedFetch::new(self.clone(), inner)
    }

    /// Wrap a connection object
    pub fn wrap_xhr<C: XhrConnection>(&self, inner: C) -> TrackedXhr<C> {
        TrackedXhr::new(self.clone(), inner)
    }

    /// Wrap a socket constructor
    pub fn wrap_websocket<W: WebSocketFactory>(&self, inner: W) -> TrackedWebSocket<W> {
        TrackedWebSocket::new(self.clone(), inner)
    }

    /// Wrap a beacon sender
    pub fn wrap_beacon<B: BeaconApi>(&self, inner: B) -> TrackedBeacon<B> {
        TrackedBeacon::new(self.clone(), inner)
    }

    /// Wrap an event stream constructor
    pub fn wrap_eventsource<E: EventSourceFactory>(&self, inner: E) -> TrackedEventSource<E> {
        TrackedEventSource::new(self.clone(), inner)
    }

    /// Backfill calls from the resource timing buffer.
    ///
    /// Runs at most once per tracker; later calls return `Ok(0)`. An
    /// unreadable buffer is reported and returned as `TelemetryUnavailable`.
    pub fn import_resource_timing(&self, source: &dyn ResourceTimingSource) -> Result<usize> {
        if !self.inner.config.track_performance {
            return Ok(0);
        }
        if self.inner.telemetry_imported.swap(true, Ordering::SeqCst) {
            tracing::debug!("Resource timing already imported");
            return Ok(0);
        }

        let entries = source.resource_entries().map_err(|e| match e {
            Error::TelemetryUnavailable(_) => e,
            other => Error::telemetry(other.to_string()),
        });

        match entries {
            Ok(entries) => {
                let imported = import_entries(self, &entries);
                tracing::info!(imported, scanned = entries.len(), "Imported resource timing");
                Ok(imported)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Performance timing not available");
                Err(e)
            }
        }
    }

    /// All records in insertion order
    pub fn records(&self) -> Vec<CallRecord> {
        self.inner.store.all()
    }

    /// The last `n` records, newest first
    pub fn recent(&self, n: usize) -> Vec<CallRecord> {
        self.inner.store.snapshot_recent(n)
    }

    /// The last `display_limit` records, newest first
    pub fn recent_default(&self) -> Vec<CallRecord> {
        self.recent(self.inner.config.display_limit)
    }

    /// Record count per type
    pub fn count_by_type(&self) -> Vec<(CallType, usize)> {
        self.inner.store.count_by_type()
    }

    /// Record count per domain
    pub fn count_by_domain(&self) -> Vec<(String, usize)> {
        self.inner.store.count_by_domain()
    }

    /// Export-ready JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(self.inner.store.to_json_pretty()?)
    }

    /// Summary report
    pub fn report(&self) -> Report {
        Report::new(self)
    }
}

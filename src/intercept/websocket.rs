// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Persistent socket interceptor

use super::host::WebSocketFactory;
use super::Interceptor;
use crate::error::Result;
use crate::record::{CallDetails, CallType};
use crate::tracker::Tracker;

/// Socket constructor decorator. Sockets are open-ended, so there is no
/// completion correlation.
pub struct TrackedWebSocket<W> {
    tracker: Tracker,
    inner: W,
}

impl<W: WebSocketFactory> TrackedWebSocket<W> {
    pub fn new(tracker: Tracker, inner: W) -> Self {
        Self { tracker, inner }
    }

    /// The wrapped constructor
    pub fn inner(&self) -> &W {
        &self.inner
    }
}

impl<W> Interceptor for TrackedWebSocket<W> {
    const CALL_TYPE: CallType = CallType::WebSocket;

    fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

impl<W: WebSocketFactory> WebSocketFactory for TrackedWebSocket<W> {
    type Socket = W::Socket;

    fn connect(&self, url: &str, protocol: Option<&str>) -> Result<W::Socket> {
        self.observe(
            url,
            None,
            CallDetails::new().with_protocol(protocol.map(String::from)),
        );
        self.inner.connect(url, protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::intercept::mock::{MockSocket, MockWebSocketFactory};

    fn tracker() -> Tracker {
        Tracker::new(TrackerConfig::default(), "https://a.test/x/").unwrap()
    }

    #[test]
    fn test_socket_tracked_with_protocol() {
        let tracker = tracker();
        let ws = tracker.wrap_websocket(MockWebSocketFactory::default());

        let socket = ws.connect("wss://a.test/live", Some("graphql-ws")).unwrap();

        assert_eq!(
            socket,
            MockSocket {
                url: "wss://a.test/live".to_string(),
                protocol: Some("graphql-ws".to_string()),
            }
        );
        let records = tracker.records();
        assert_eq!(records[0].call_type, CallType::WebSocket);
        assert_eq!(records[0].method, "WS");
        assert_eq!(records[0].details.protocol.as_deref(), Some("graphql-ws"));
    }

    #[test]
    fn test_reconnects_logged_once() {
        let tracker = tracker();
        let ws = tracker.wrap_websocket(MockWebSocketFactory::default());

        for _ in 0..3 {
            ws.connect("wss://a.test/live", None).unwrap();
        }

        assert_eq!(tracker.records().len(), 1);
        assert_eq!(ws.inner().connects.lock().len(), 3);
    }

    #[test]
    fn test_malformed_url_fails_open() {
        let tracker = tracker();
        let ws = tracker.wrap_websocket(MockWebSocketFactory::default());

        let socket = ws.connect("ws://[bad", None).unwrap();

        assert_eq!(socket.url, "ws://[bad");
        assert!(tracker.records().is_empty());
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer
//!
//! Request and response types shared by every fetch implementation, plus a
//! reqwest-backed client that tracked fetch calls can delegate to.

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use request::FetchRequest;
pub use response::FetchResponse;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("apitap/", env!("CARGO_PKG_VERSION"));

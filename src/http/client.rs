// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::Url;

use super::response::FetchResponse;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::intercept::{FetchApi, FetchInit, FetchInput, ResourceEntry, ResourceTimingBuffer};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Base for relative request URLs
    pub base_url: Option<Url>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("accept", HeaderValue::from_static("*/*"));
        default_headers.insert(
            "accept-language",
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            default_headers,
            base_url: None,
        }
    }
}

impl HttpClientConfig {
    /// Resolve relative request URLs against `base`
    pub fn base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed fetch implementation
///
/// When a timing buffer is attached, every completed call is recorded the
/// way a browser fills its resource timing buffer.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    timing: Option<ResourceTimingBuffer>,
    /// Time origin for `startTime`
    epoch: Instant,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    ///
    /// Bodies are never decoded, so the declared `content-length` of a
    /// compressed response survives.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .default_headers(config.default_headers.clone())
            .no_gzip()
            .no_brotli()
            .build()?;

        Ok(Self {
            client,
            config,
            timing: None,
            epoch: Instant::now(),
        })
    }

    /// Record resource timing entries into `buffer`
    pub fn with_timing_buffer(mut self, buffer: ResourceTimingBuffer) -> Self {
        self.timing = Some(buffer);
        self
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Resolve a request URL against the configured base
    fn resolve(&self, raw_url: &str) -> Result<Url> {
        match self.config.base_url {
            Some(ref base) => Ok(base.join(raw_url)?),
            None => Ok(Url::parse(raw_url)?),
        }
    }

    /// Execute a resolved request
    async fn execute(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
        timeout: Option<Duration>,
    ) -> Result<FetchResponse> {
        let start = Instant::now();
        let start_time = start.duration_since(self.epoch).as_secs_f64() * 1000.0;

        let mut builder = self.client.request(method, url.clone()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;

        let redirected = response.url() != &url;
        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let elapsed = start.elapsed();

        if let Some(ref timing) = self.timing {
            timing.push(
                ResourceEntry::new(final_url.as_str(), "fetch")
                    .with_timing(start_time, elapsed.as_secs_f64() * 1000.0)
                    .with_transfer_size(body.len() as u64),
            );
        }

        Ok(FetchResponse {
            status,
            headers,
            body,
            url: final_url,
            redirected,
            response_time_ms: elapsed.as_millis() as u64,
        })
    }
}

#[async_trait]
impl FetchApi for HttpClient {
    async fn fetch(&self, input: FetchInput, init: FetchInit) -> Result<FetchResponse> {
        let (raw_url, mut method, mut headers, mut body, timeout) = match input {
            FetchInput::Url(url) => (url, Method::GET, HeaderMap::new(), None, None),
            FetchInput::Request(request) => (
                request.url,
                request.method,
                request.headers,
                request.body,
                request.timeout,
            ),
        };

        if let Some(ref name) = init.method {
            method = Method::from_bytes(name.to_uppercase().as_bytes())
                .map_err(|e| Error::upstream(format!("Invalid method '{}': {}", name, e)))?;
        }
        if let Some(extra) = init.headers {
            for (name, value) in extra {
                let name = HeaderName::try_from(name.as_str())
                    .map_err(|e| Error::upstream(format!("Invalid header name: {}", e)))?;
                let value = HeaderValue::try_from(value.as_str())
                    .map_err(|e| Error::upstream(format!("Invalid header value: {}", e)))?;
                headers.insert(name, value);
            }
        }
        if init.body.is_some() {
            body = init.body;
        }

        let url = self.resolve(&raw_url)?;
        self.execute(method, url, headers, body, timeout).await
    }
}

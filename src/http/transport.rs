//! Transport layer abstraction for HTTP communication.
//!
//! This module provides a pluggable transport layer for sending HTTP requests.
//! The default implementation uses reqwest, but other implementations can be
//! provided for testing or alternative HTTP backends.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, trace};

use super::{HttpRequest, HttpResponse};
use crate::config::SesConfig;
use crate::error::{SesError, SesResult};

/// Trait for HTTP transport implementations.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// Any response that arrives, whatever its status, is returned as `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Transport` or `SesError::Timeout` if no response
    /// was obtained.
    async fn send(&self, request: HttpRequest) -> SesResult<HttpResponse>;
}

/// Reqwest-based HTTP transport implementation.
///
/// TLS certificate chain and hostname validation are always enabled.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Request timeout duration
    /// * `connect_timeout` - Connection timeout duration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use integrations_aws_ses_simple::http::ReqwestTransport;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = ReqwestTransport::new(
    ///     Duration::from_secs(30),
    ///     Duration::from_secs(10)
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(timeout: Duration, connect_timeout: Duration) -> SesResult<Self> {
        Self::build(timeout, connect_timeout, None)
    }

    /// Create a transport using the timeouts and user agent of a config.
    pub fn from_config(config: &SesConfig) -> SesResult<Self> {
        Self::build(
            config.timeout,
            config.connect_timeout,
            config.user_agent.as_deref(),
        )
    }

    fn build(
        timeout: Duration,
        connect_timeout: Duration,
        user_agent: Option<&str>,
    ) -> SesResult<Self> {
        let user_agent = user_agent.map(str::to_string).unwrap_or_else(|| {
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        });

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SesError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                retryable: false,
            })?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying reqwest client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn build_headers(headers: &[(String, String)]) -> SesResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            SesError::Transport {
                message: format!("Invalid header name '{}': {}", name, e),
                source: Some(Box::new(e)),
                retryable: false,
            }
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| SesError::Transport {
            message: format!("Invalid value for header '{}': {}", name, e),
            source: Some(Box::new(e)),
            retryable: false,
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Response headers as owned pairs. Values that are not valid UTF-8 are
/// converted lossily rather than dropped.
fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| {
            (
                k.to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> SesResult<HttpResponse> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            SesError::Transport {
                message: format!("Invalid HTTP method '{}': {}", request.method, e),
                source: Some(Box::new(e)),
                retryable: false,
            }
        })?;
        let headers = build_headers(&request.headers)?;

        trace!(url = %request.url, body_len = request.body.len(), "Sending request");

        let response = self
            .client
            .request(method, &request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response.bytes().await?.to_vec();

        debug!(status, body_len = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

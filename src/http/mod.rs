//! HTTP module for SES Query API communication.
//!
//! This module provides:
//!
//! - **Request/Response**: Plain [`HttpRequest`] and [`HttpResponse`] values
//!   that carry exactly what goes over the wire
//! - **Transport Layer**: The [`HttpTransport`] trait, implemented by
//!   [`ReqwestTransport`] for real traffic and by
//!   [`MockTransport`](crate::mocks::MockTransport) in tests
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   SesClient     │  - Parameter building
//! │                 │  - Request signing
//! │                 │  - Response parsing
//! └────────┬────────┘
//!          │ HttpRequest
//!          ▼
//! ┌─────────────────┐
//! │  HttpTransport  │  - One attempt per request
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - Actual HTTP implementation
//! └─────────────────┘
//! ```

mod transport;

pub use transport::{HttpTransport, ReqwestTransport};

/// HTTP request to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers, in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: String,
}

impl HttpRequest {
    /// Create a `POST` request with an empty body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append multiple headers.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// HTTP response received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response indicates a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Get the AWS request ID from response headers.
    pub fn request_id(&self) -> Option<&str> {
        self.get_header("x-amzn-requestid")
            .or_else(|| self.get_header("x-amz-request-id"))
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

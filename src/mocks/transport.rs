//! Mock HTTP transport for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{SesError, SesResult};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Create a successful response with body.
    pub fn ok_with_body(body: impl Into<Vec<u8>>) -> Self {
        Self::error(200, body)
    }

    /// Create a response with an arbitrary status.
    pub fn error(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

impl From<MockResponse> for HttpResponse {
    fn from(mock: MockResponse) -> Self {
        HttpResponse {
            status: mock.status,
            headers: mock.headers,
            body: mock.body,
        }
    }
}

/// Mock HTTP transport for testing.
///
/// Queued responses are returned in order. Once the queue is empty the
/// default response, if any, is returned for every further request.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            ..Self::default()
        }
    }

    /// Create a mock transport with a default response.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::default()
        }
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> SesResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);

        let response = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                self.default_response.clone()
            } else {
                Some(responses.remove(0))
            }
        };

        response.map(HttpResponse::from).ok_or_else(|| SesError::Transport {
            message: "No mock response available".to_string(),
            source: None,
            retryable: false,
        })
    }
}

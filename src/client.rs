//! SES client implementation.
//!
//! This module provides the main SES client interface and builder.
//!
//! # Architecture
//!
//! Every action follows the same pipeline:
//!
//! 1. Build the action's [`RequestParameters`]
//! 2. Serialize them into a canonical query string and sign it
//! 3. POST the signed body through an [`HttpTransport`]
//! 4. Parse the XML response into a [`ParsedResponse`]
//!
//! A response whose document has a top-level `Error` element is an error,
//! whatever its HTTP status. A non-2xx response without one is an error too.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_aws_ses_simple::{EmailBuilder, SesClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SesClient::new("AKID", "SECRET")?;
//!
//! let request = EmailBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .text("Email body")
//!     .build()?;
//!
//! let response = client.send_email(&request).await?;
//! println!("{:?}", response.lookup_text("SendEmailResult.MessageId"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::config::{SesConfig, SesConfigBuilder};
use crate::error::{map_aws_error, map_http_status, AwsErrorResponse, SesError, SesResult};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::signing::SigV4Signer;
use crate::types::{EmailAddress, RequestParameters, SendEmailRequest};
use crate::xml::{parse_response_bytes, ParsedResponse};

/// Main client for the SES Query API.
///
/// # Thread Safety
///
/// `SesClient` is `Send + Sync`. Calls share no mutable state; each one
/// takes its own timestamp and computes its own signature.
///
/// # Cloning
///
/// The client can be cloned cheaply as it uses `Arc` for shared resources.
/// Clones share the same configuration and transport.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_aws_ses_simple::SesClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SesClient::from_env()?;
///
/// let client_clone = client.clone();
/// tokio::spawn(async move {
///     let _ = client_clone.get_send_quota().await;
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SesClient {
    config: Arc<SesConfig>,
    signer: Arc<SigV4Signer>,
    transport: Arc<dyn HttpTransport>,
}

impl SesClient {
    /// Create a client for the default host, `email.us-east-1.amazonaws.com`.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Configuration` if either credential is empty.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> SesResult<Self> {
        Self::builder()
            .credentials(access_key_id, secret_access_key)
            .build()
    }

    /// Create a client for a specific endpoint host.
    ///
    /// The host also fixes the signing service and region: for
    /// `email.eu-west-1.amazonaws.com` they are `email` and `eu-west-1`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use integrations_aws_ses_simple::{SesClient, AWS_EU_WEST_1};
    ///
    /// let client = SesClient::with_host("AKID", "SECRET", AWS_EU_WEST_1).unwrap();
    /// assert_eq!(client.region(), "eu-west-1");
    /// assert_eq!(client.service(), "email");
    /// ```
    pub fn with_host(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        host: impl Into<String>,
    ) -> SesResult<Self> {
        Self::builder()
            .credentials(access_key_id, secret_access_key)
            .host(host)
            .build()
    }

    /// Create a client from a configuration, using the reqwest transport.
    pub fn from_config(config: SesConfig) -> SesResult<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client from environment variables.
    ///
    /// See [`SesConfig::from_env`] for the variables read.
    pub fn from_env() -> SesResult<Self> {
        let config = SesConfig::from_env()?;
        Self::from_config(config)
    }

    /// Create a client with a custom transport.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use integrations_aws_ses_simple::{SesClient, SesConfig};
    /// use integrations_aws_ses_simple::mocks::MockTransport;
    ///
    /// let config = SesConfig::builder()
    ///     .credentials("AKID", "SECRET")
    ///     .build()
    ///     .unwrap();
    /// let client = SesClient::with_transport(config, Arc::new(MockTransport::new()));
    /// ```
    pub fn with_transport(config: SesConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let signer = SigV4Signer::new(config.credentials.clone(), config.endpoint.clone());
        Self {
            config: Arc::new(config),
            signer: Arc::new(signer),
            transport,
        }
    }

    /// Create a new client builder.
    pub fn builder() -> SesClientBuilder {
        SesClientBuilder::default()
    }

    /// Get the client configuration.
    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    /// The endpoint host requests are signed for.
    pub fn host(&self) -> &str {
        self.config.endpoint.host()
    }

    /// The signing region.
    pub fn region(&self) -> &str {
        self.config.endpoint.region()
    }

    /// The signing service name.
    pub fn service(&self) -> &str {
        self.config.endpoint.service()
    }

    /// Send an email.
    ///
    /// The request can only be obtained from
    /// [`EmailBuilder::build`](crate::builders::EmailBuilder::build), so it
    /// is already validated. On success the response holds
    /// `SendEmailResult.MessageId`.
    pub async fn send_email(&self, request: &SendEmailRequest) -> SesResult<ParsedResponse> {
        self.execute(request.to_parameters()).await
    }

    /// Ask SES to send a verification mail to an address.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Validation` without sending anything if the
    /// address is malformed.
    pub async fn verify_email_address(&self, email_address: &str) -> SesResult<ParsedResponse> {
        let address: EmailAddress = email_address
            .parse()
            .map_err(|e| SesError::validation("email_address", format!("{}", e)))?;

        let mut params = RequestParameters::for_action("VerifyEmailAddress");
        params.insert("EmailAddress", address.into_inner());
        self.execute(params).await
    }

    /// List the addresses verified for this account and region.
    ///
    /// Addresses are under `ListVerifiedEmailAddressesResult.VerifiedEmailAddresses`.
    /// Since repeated siblings overwrite each other, only the last `member`
    /// survives parsing.
    pub async fn list_verified_email_addresses(&self) -> SesResult<ParsedResponse> {
        self.execute(RequestParameters::for_action("ListVerifiedEmailAddresses"))
            .await
    }

    /// Get the sending limits of the account.
    ///
    /// Use [`SendQuota::from_response`](crate::types::SendQuota::from_response)
    /// for a typed view.
    pub async fn get_send_quota(&self) -> SesResult<ParsedResponse> {
        self.execute(RequestParameters::for_action("GetSendQuota"))
            .await
    }

    /// Sign and send a parameter set, then parse and check the response.
    pub async fn execute(&self, params: RequestParameters) -> SesResult<ParsedResponse> {
        let action = params.action().unwrap_or_default().to_string();
        debug!(action = %action, host = %self.host(), "Executing SES action");

        let response = self.send_request(&params).await?;
        let result = interpret_response(&response);

        match &result {
            Ok(_) => debug!(action = %action, status = response.status, "SES action succeeded"),
            Err(e) => warn!(
                action = %action,
                status = response.status,
                code = e.error_code().unwrap_or_default(),
                "SES action failed: {}",
                e
            ),
        }

        result
    }

    /// Sign and send a parameter set, returning the raw response.
    ///
    /// No status or body checks are made.
    pub async fn send_request(&self, params: &RequestParameters) -> SesResult<HttpResponse> {
        let request = self.build_request(params, &Utc::now());
        self.transport.send(request).await
    }

    /// Build the signed HTTP request for a parameter set at a given time.
    pub fn build_request(
        &self,
        params: &RequestParameters,
        timestamp: &DateTime<Utc>,
    ) -> HttpRequest {
        let signed = self.signer.sign_parameters(params, timestamp);
        trace!(body_len = signed.canonical_query_string.len(), "Signed request");

        HttpRequest::post(self.config.request_url())
            .with_headers(signed.headers)
            .with_body(signed.canonical_query_string)
    }
}

fn interpret_response(response: &HttpResponse) -> SesResult<ParsedResponse> {
    let parsed = match parse_response_bytes(&response.body) {
        Ok(parsed) => parsed,
        Err(e) if response.is_success() => return Err(e),
        Err(_) => {
            return Err(map_http_status(
                response.status,
                response.request_id().map(str::to_string),
            ))
        }
    };

    if let Some(mut error) = AwsErrorResponse::from_response(&parsed) {
        if error.request_id.is_none() {
            error.request_id = response.request_id().map(str::to_string);
        }
        return Err(map_aws_error(&error, Some(response.status)));
    }

    if !response.is_success() {
        return Err(map_http_status(
            response.status,
            response.request_id().map(str::to_string),
        ));
    }

    Ok(parsed)
}

impl std::fmt::Debug for SesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for creating SES clients.
///
/// # Example
///
/// ```rust
/// use integrations_aws_ses_simple::{SesClient, AWS_US_WEST_2};
/// use std::time::Duration;
///
/// let client = SesClient::builder()
///     .host(AWS_US_WEST_2)
///     .credentials("AKID", "SECRET")
///     .timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(client.region(), "us-west-2");
/// ```
#[derive(Default)]
pub struct SesClientBuilder {
    config: SesConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SesClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config = self.config.host(host);
        self
    }

    /// Set static credentials.
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.config = self.config.credentials(access_key_id, secret_access_key);
        self
    }

    /// Send requests to this URL instead of `https://<host>/`.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.endpoint_url(url);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.timeout(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.connect_timeout(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config = self.config.user_agent(ua);
        self
    }

    /// Use a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the SES client.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Configuration` if the configuration is invalid, or
    /// `SesError::Transport` if the HTTP client cannot be created.
    pub fn build(self) -> SesResult<SesClient> {
        let config = self.config.build()?;
        match self.transport {
            Some(transport) => Ok(SesClient::with_transport(config, transport)),
            None => SesClient::from_config(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mocks::{MockResponse, MockTransport};
    use chrono::TimeZone;

    const QUOTA: &str = r#"<GetSendQuotaResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <GetSendQuotaResult>
    <Max24HourSend>200.0</Max24HourSend>
    <MaxSendRate>1.0</MaxSendRate>
    <SentLast24Hours>3.0</SentLast24Hours>
  </GetSendQuotaResult>
  <ResponseMetadata><RequestId>quota-1</RequestId></ResponseMetadata>
</GetSendQuotaResponse>"#;

    fn client_with(mock: Arc<MockTransport>) -> SesClient {
        let config = SesConfig::builder()
            .credentials("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
            .build()
            .unwrap();
        SesClient::with_transport(config, mock)
    }

    #[test]
    fn test_new_uses_default_host() {
        let client = SesClient::new("AKID", "SECRET").unwrap();
        assert_eq!(client.host(), "email.us-east-1.amazonaws.com");
        assert_eq!(client.region(), "us-east-1");
        assert_eq!(client.service(), "email");
    }

    #[test]
    fn test_construction_errors() {
        let err = SesClient::new("", "SECRET").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = SesClient::with_host("AKID", "SECRET", "localhost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = SesClient::new("AKID", "super-secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("SesClient"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_build_request() {
        let client = client_with(Arc::new(MockTransport::new()));
        let timestamp = Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 45).unwrap();

        let request =
            client.build_request(&RequestParameters::for_action("GetSendQuota"), &timestamp);

        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://email.us-east-1.amazonaws.com/");
        assert_eq!(request.body, "Action=GetSendQuota");

        let names: Vec<&str> = request.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Content-Type", "X-Amz-Date", "Host", "Authorization"]);
        assert_eq!(request.get_header("X-Amz-Date"), Some("20231215T103045Z"));
        assert!(request
            .get_header("Authorization")
            .unwrap()
            .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20231215/us-east-1/email/aws4_request"));
    }

    #[test]
    fn test_build_request_is_deterministic() {
        let client = client_with(Arc::new(MockTransport::new()));
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let params = RequestParameters::for_action("ListVerifiedEmailAddresses");

        assert_eq!(
            client.build_request(&params, &timestamp),
            client.build_request(&params, &timestamp)
        );
    }

    #[tokio::test]
    async fn test_get_send_quota() {
        let mock = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_with_body(
            QUOTA,
        )]));
        let client = client_with(mock.clone());

        let response = client.get_send_quota().await.unwrap();

        assert_eq!(
            response.lookup_text("GetSendQuotaResult.Max24HourSend"),
            Some("200.0")
        );
        assert_eq!(mock.request_count(), 1);
        assert_eq!(mock.last_request().unwrap().body, "Action=GetSendQuota");
    }

    #[tokio::test]
    async fn test_error_document_with_ok_status() {
        let body = "<ErrorResponse><Error><Code>Throttling</Code><Message>Rate exceeded</Message></Error>\
                    <RequestId>req-7</RequestId></ErrorResponse>";
        let mock = Arc::new(MockTransport::with_default(MockResponse::ok_with_body(body)));
        let client = client_with(mock);

        let err = client.get_send_quota().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.error_code(), Some("Throttling"));
        assert_eq!(err.request_id(), Some("req-7"));
        assert_eq!(err.status(), Some(200));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_request_id_falls_back_to_header() {
        let body = "<ErrorResponse><Error><Code>MessageRejected</Code></Error></ErrorResponse>";
        let mock = Arc::new(MockTransport::with_default(
            MockResponse::error(400, body).with_header("x-amzn-RequestId", "hdr-1"),
        ));
        let client = client_with(mock);

        let err = client.list_verified_email_addresses().await.unwrap_err();
        assert_eq!(err.error_code(), Some("MessageRejected"));
        assert_eq!(err.request_id(), Some("hdr-1"));
    }

    #[tokio::test]
    async fn test_failed_status_without_error_document() {
        let mock = Arc::new(MockTransport::with_default(MockResponse::error(
            503,
            "<html><body>Service Unavailable</body>",
        )));
        let client = client_with(mock);

        let err = client.get_send_quota().await.unwrap_err();
        assert_eq!(err.error_code(), Some("HttpError"));
        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mock = Arc::new(MockTransport::with_default(MockResponse::ok_with_body(
            "<GetSendQuotaResponse><GetSendQuotaResult>",
        )));
        let client = client_with(mock);

        let err = client.get_send_quota().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_verify_rejects_invalid_address() {
        let mock = Arc::new(MockTransport::new());
        let client = client_with(mock.clone());

        let err = client.verify_email_address("not-an-address").await.unwrap_err();
        assert!(matches!(err, SesError::Validation { ref field, .. } if field.as_deref() == Some("email_address")));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_send_request_returns_raw_response() {
        let mock = Arc::new(MockTransport::with_default(MockResponse::error(
            500,
            "not xml at all",
        )));
        let client = client_with(mock);

        let response = client
            .send_request(&RequestParameters::for_action("GetSendQuota"))
            .await
            .unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body_text(), "not xml at all");
    }

    #[test]
    fn test_builder_with_transport() {
        let client = SesClient::builder()
            .host("email.eu-west-1.amazonaws.com")
            .credentials("AKID", "SECRET")
            .endpoint_url("http://localhost:4566/")
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();

        assert_eq!(client.region(), "eu-west-1");
        assert_eq!(client.config().request_url(), "http://localhost:4566/");
    }
}

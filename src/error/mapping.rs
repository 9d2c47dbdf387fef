//! AWS error document mapping for the SES Query API.
//!
//! This module handles extraction of AWS error documents from parsed
//! responses and their mapping to [`SesError::Api`]. It provides
//! functionality to:
//!
//! - Extract the `Error` element of a parsed response
//! - Determine retryability based on error code and HTTP status
//! - Build an error for a failed status that carried no error document
//!
//! # Error Response Format
//!
//! The Query API returns errors in the following XML format:
//!
//! ```xml
//! <ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
//!   <Error>
//!     <Type>Sender</Type>
//!     <Code>MessageRejected</Code>
//!     <Message>Email address is not verified.</Message>
//!   </Error>
//!   <RequestId>b3b4c5e6-0000-0000-0000-000000000000</RequestId>
//! </ErrorResponse>
//! ```

use http::StatusCode;

use super::SesError;
use crate::xml::ParsedResponse;

/// Code used when a failed response carried no error document.
pub(crate) const HTTP_ERROR_CODE: &str = "HttpError";

/// An AWS error document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsErrorResponse {
    /// The AWS error code (e.g. `MessageRejected`).
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Fault side, `Sender` or `Receiver`, when present.
    pub error_type: Option<String>,

    /// AWS request ID for debugging and support.
    pub request_id: Option<String>,
}

impl AwsErrorResponse {
    /// Extract the error document of a parsed response.
    ///
    /// Returns `None` when the response has no top-level `Error` element.
    /// Missing `Code` or `Message` children are reported as `Unknown` and
    /// an empty message rather than rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_aws_ses_simple::error::AwsErrorResponse;
    /// use integrations_aws_ses_simple::xml::parse_response;
    ///
    /// let parsed = parse_response(
    ///     "<ErrorResponse><Error><Code>Throttling</Code><Message>Rate exceeded</Message></Error>\
    ///      <RequestId>req-1</RequestId></ErrorResponse>"
    /// ).unwrap();
    ///
    /// let error = AwsErrorResponse::from_response(&parsed).unwrap();
    /// assert_eq!(error.code, "Throttling");
    /// assert_eq!(error.request_id.as_deref(), Some("req-1"));
    /// ```
    pub fn from_response(response: &ParsedResponse) -> Option<Self> {
        let error = response.get("Error")?;

        let (code, message, error_type) = match error.as_node() {
            Some(node) => (
                node.get_text("Code").unwrap_or("Unknown").to_string(),
                node.get_text("Message").unwrap_or_default().to_string(),
                node.get_text("Type").map(str::to_string),
            ),
            None => (
                "Unknown".to_string(),
                error.as_text().unwrap_or_default().to_string(),
                None,
            ),
        };

        Some(Self {
            code,
            message,
            error_type,
            request_id: find_request_id(response),
        })
    }
}

/// Locate the request ID of a response, wherever the service put it.
fn find_request_id(response: &ParsedResponse) -> Option<String> {
    response
        .get_text("RequestId")
        .or_else(|| response.lookup_text("ResponseMetadata.RequestId"))
        .or_else(|| response.lookup_text("Error.RequestId"))
        .map(str::to_string)
}

/// Map an AWS error document to [`SesError::Api`].
///
/// # Arguments
///
/// * `error` - The extracted error document
/// * `status` - The HTTP status the document arrived with
///
/// # Examples
///
/// ```rust
/// use integrations_aws_ses_simple::error::{map_aws_error, AwsErrorResponse};
///
/// let error = AwsErrorResponse {
///     code: "MessageRejected".to_string(),
///     message: "Email address is not verified.".to_string(),
///     error_type: Some("Sender".to_string()),
///     request_id: Some("abc-123".to_string()),
/// };
///
/// let ses_error = map_aws_error(&error, Some(400));
/// assert!(!ses_error.is_retryable());
/// assert_eq!(ses_error.status(), Some(400));
/// ```
pub fn map_aws_error(error: &AwsErrorResponse, status: Option<u16>) -> SesError {
    let retryable = is_retryable_code(&error.code) || status.map_or(false, is_retryable_status);

    SesError::Api {
        code: error.code.clone(),
        message: error.message.clone(),
        request_id: error.request_id.clone(),
        status,
        retryable,
    }
}

/// Build the error for a non-2xx response that carried no error document.
pub(crate) fn map_http_status(status: u16, request_id: Option<String>) -> SesError {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");

    SesError::Api {
        code: HTTP_ERROR_CODE.to_string(),
        message: format!("HTTP {} {}", status, reason),
        request_id,
        status: Some(status),
        retryable: is_retryable_status(status),
    }
}

/// Error codes that indicate a transient condition on the service side.
pub fn is_retryable_code(code: &str) -> bool {
    matches!(
        code,
        "Throttling"
            | "ThrottlingException"
            | "RequestThrottled"
            | "InternalFailure"
            | "InternalError"
            | "ServiceUnavailable"
            | "ServiceUnavailableException"
    )
}

/// HTTP statuses that indicate a transient condition on the service side.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::xml::parse_response;
    use rstest::rstest;

    const MESSAGE_REJECTED: &str = r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <Error>
    <Type>Sender</Type>
    <Code>MessageRejected</Code>
    <Message>Email address is not verified.</Message>
  </Error>
  <RequestId>b3b4c5e6-1111-2222-3333-444455556666</RequestId>
</ErrorResponse>"#;

    #[test]
    fn test_from_response() {
        let parsed = parse_response(MESSAGE_REJECTED).unwrap();
        let error = AwsErrorResponse::from_response(&parsed).unwrap();

        assert_eq!(error.code, "MessageRejected");
        assert_eq!(error.message, "Email address is not verified.");
        assert_eq!(error.error_type.as_deref(), Some("Sender"));
        assert_eq!(
            error.request_id.as_deref(),
            Some("b3b4c5e6-1111-2222-3333-444455556666")
        );
    }

    #[test]
    fn test_from_response_without_error() {
        let parsed = parse_response(
            "<GetSendQuotaResponse><GetSendQuotaResult/></GetSendQuotaResponse>",
        )
        .unwrap();
        assert!(AwsErrorResponse::from_response(&parsed).is_none());
    }

    #[test]
    fn test_from_response_with_text_error() {
        let parsed = parse_response("<Response><Error>boom</Error></Response>").unwrap();
        let error = AwsErrorResponse::from_response(&parsed).unwrap();

        assert_eq!(error.code, "Unknown");
        assert_eq!(error.message, "boom");
        assert_eq!(error.request_id, None);
    }

    #[rstest]
    #[case("Throttling", 400, true)]
    #[case("ServiceUnavailable", 503, true)]
    #[case("InternalFailure", 500, true)]
    #[case("MessageRejected", 400, false)]
    #[case("InvalidParameterValue", 400, false)]
    #[case("SignatureDoesNotMatch", 403, false)]
    #[case("SomethingNew", 502, true)]
    fn test_map_aws_error_retryability(
        #[case] code: &str,
        #[case] status: u16,
        #[case] retryable: bool,
    ) {
        let error = AwsErrorResponse {
            code: code.to_string(),
            message: "message".to_string(),
            error_type: None,
            request_id: None,
        };

        let mapped = map_aws_error(&error, Some(status));
        assert_eq!(mapped.kind(), ErrorKind::Api);
        assert_eq!(mapped.error_code(), Some(code));
        assert_eq!(mapped.is_retryable(), retryable);
    }

    #[test]
    fn test_map_http_status() {
        let error = map_http_status(403, Some("req-9".to_string()));
        assert_eq!(error.error_code(), Some(HTTP_ERROR_CODE));
        assert_eq!(error.request_id(), Some("req-9"));
        assert_eq!(error.status(), Some(403));
        assert!(error.to_string().contains("HTTP 403 Forbidden"));
        assert!(!error.is_retryable());

        assert!(map_http_status(503, None).is_retryable());
        assert!(map_http_status(599, None).to_string().contains("Unknown Status"));
    }
}

//! Error types for the SES Query API client.
//!
//! Errors are categorized by the stage that produced them so callers can
//! tell a misconfigured client from an unreachable service, a rejected
//! request, or a response that could not be read.
//!
//! # Error Hierarchy
//!
//! The main [`SesError`] enum contains variants for:
//! - Configuration errors (malformed host, missing credentials)
//! - Validation errors (bad input caught before any I/O)
//! - Transport errors and timeouts (no response obtained)
//! - API errors (a response was obtained and it is an error)
//! - Parse errors (the response body is not well-formed XML)
//!
//! [`SesError::kind`] collapses these into the coarse [`ErrorKind`].
//!
//! # Examples
//!
//! ```rust
//! use integrations_aws_ses_simple::error::{ErrorKind, SesError};
//!
//! fn handle_ses_error(error: &SesError) {
//!     match error.kind() {
//!         ErrorKind::Api => {
//!             if let Some(code) = error.error_code() {
//!                 println!("SES rejected the request: {}", code);
//!             }
//!         }
//!         ErrorKind::Transport if error.is_retryable() => println!("try again later"),
//!         _ => println!("giving up: {}", error),
//!     }
//! }
//! ```

mod mapping;

pub use mapping::{is_retryable_code, is_retryable_status, map_aws_error, AwsErrorResponse};
pub(crate) use mapping::map_http_status;

use thiserror::Error;

use crate::builders::BuilderError;
use crate::config::ConfigError;

/// Result type alias for SES operations.
pub type SesResult<T> = Result<T, SesError>;

/// Coarse classification of a [`SesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The client or its input is unusable; raised before any I/O.
    Configuration,
    /// No response was obtained.
    Transport,
    /// A response was obtained and it reports a failure.
    Api,
    /// A response was obtained but could not be read.
    Parse,
}

/// Top-level error type for the SES client.
#[derive(Debug, Error)]
pub enum SesError {
    /// Configuration-related errors.
    ///
    /// These errors occur when the client is built with invalid settings,
    /// such as a host that cannot be split into service and region.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors.
    ///
    /// These errors occur when facade input fails pre-flight checks. No
    /// request is sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation error.
        message: String,
        /// Optional field name that failed validation.
        field: Option<String>,
    },

    /// Transport and network errors.
    ///
    /// These errors occur during HTTP communication with the endpoint,
    /// including connection failures, TLS failures and DNS resolution issues.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// Request timeout errors.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// Errors reported by the service.
    ///
    /// Either the response carried an `Error` document or the HTTP status
    /// was not 2xx.
    #[error("AWS API error: {code} - {message}")]
    Api {
        /// AWS error code (e.g., "MessageRejected"), or `HttpError` when
        /// the body carried no error document.
        code: String,
        /// Human-readable error message.
        message: String,
        /// AWS request ID for debugging.
        request_id: Option<String>,
        /// HTTP status of the response.
        status: Option<u16>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// The response body is not well-formed XML.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },
}

impl SesError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        SesError::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SesError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Classify this error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_aws_ses_simple::error::{ErrorKind, SesError};
    ///
    /// let error = SesError::Timeout { message: "deadline elapsed".to_string() };
    /// assert_eq!(error.kind(), ErrorKind::Transport);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            SesError::Configuration { .. } | SesError::Validation { .. } => {
                ErrorKind::Configuration
            }
            SesError::Transport { .. } | SesError::Timeout { .. } => ErrorKind::Transport,
            SesError::Api { .. } => ErrorKind::Api,
            SesError::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Returns true if the error is retryable.
    ///
    /// Retryable errors include:
    /// - Timeouts
    /// - Network and transport errors marked as retryable
    /// - API errors with a throttling or server-side code, or a 5xx status
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            SesError::Transport { retryable, .. } => *retryable,
            SesError::Timeout { .. } => true,
            SesError::Api { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns the AWS error code if available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_aws_ses_simple::error::SesError;
    ///
    /// let error = SesError::Api {
    ///     code: "MessageRejected".to_string(),
    ///     message: "Email address is not verified".to_string(),
    ///     request_id: Some("abc-123".to_string()),
    ///     status: Some(400),
    ///     retryable: false,
    /// };
    ///
    /// assert_eq!(error.error_code(), Some("MessageRejected"));
    /// assert_eq!(error.request_id(), Some("abc-123"));
    /// ```
    pub fn error_code(&self) -> Option<&str> {
        match self {
            SesError::Api { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SesError::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            SesError::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<ConfigError> for SesError {
    fn from(err: ConfigError) -> Self {
        SesError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<BuilderError> for SesError {
    fn from(err: BuilderError) -> Self {
        SesError::Validation {
            message: err.to_string(),
            field: Some(err.field().to_string()),
        }
    }
}

impl From<reqwest::Error> for SesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SesError::Timeout {
                message: err.to_string(),
            }
        } else {
            // Once a connection is up the request may have reached the service.
            let retryable = err.is_connect();
            SesError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
                retryable,
            }
        }
    }
}

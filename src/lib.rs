//! AWS SES (Simple Email Service) Query API client
//!
//! A small, type-safe client for the classic SES Query API: form-encoded
//! `POST` requests signed with AWS Signature Version 4, answered with XML.
//!
//! # Features
//!
//! - **AWS Signature V4**: Request signing over a canonical query string
//! - **Four actions**: `SendEmail`, `VerifyEmailAddress`,
//!   `ListVerifiedEmailAddresses` and `GetSendQuota`
//! - **Generic XML parsing**: Responses are walked into a nested map
//! - **Pre-flight validation**: Malformed input never reaches the network
//! - **Pluggable transport**: reqwest by default, mocks for tests
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_aws_ses_simple::{EmailBuilder, SesClient, SendQuota};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SesClient::from_env()?;
//!
//!     let request = EmailBuilder::new()
//!         .from("sender@example.com")
//!         .to("recipient@example.com")
//!         .subject("Hello from SES")
//!         .text("This is a test email.")
//!         .build()?;
//!
//!     let response = client.send_email(&request).await?;
//!     println!("Message sent: {:?}", response.lookup_text("SendEmailResult.MessageId"));
//!
//!     let quota = SendQuota::from_response(&client.get_send_quota().await?)?;
//!     println!("{} of {} sent today", quota.sent_last_24_hours, quota.max_24_hour_send);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every action returns [`SesResult`]. An error document in the response
//! body fails the call even when the HTTP status is 200. Callers that only
//! care whether a call worked can use `.ok()`.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber.
//! Credentials, signatures and message bodies are never logged.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod builders;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod mocks;
pub mod signing;
pub mod types;
pub mod xml;

pub use builders::{BuilderError, EmailBuilder};
pub use client::{SesClient, SesClientBuilder};
pub use config::{
    ConfigError, Endpoint, SesConfig, SesConfigBuilder, AWS_EU_WEST_1, AWS_US_EAST_1,
    AWS_US_WEST_2, DEFAULT_HOST,
};
pub use credentials::AwsCredentials;
pub use error::{ErrorKind, SesError, SesResult};
pub use http::{HttpTransport, ReqwestTransport};
pub use signing::SigV4Signer;
pub use types::{
    EmailAddress, RequestParameters, SendEmailRequest, SendEmailResponse, SendQuota,
};
pub use xml::{parse_response, ParsedResponse, XmlValue};

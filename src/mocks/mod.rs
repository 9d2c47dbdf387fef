//! Mock implementations for testing.
//!
//! [`MockTransport`] stands in for the network: it hands out queued
//! responses and records every request the client sends through it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use integrations_aws_ses_simple::{SesClient, SesConfig};
//! use integrations_aws_ses_simple::mocks::{MockResponse, MockTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mock = Arc::new(MockTransport::with_default(MockResponse::ok_with_body(
//!     "<GetSendQuotaResponse><GetSendQuotaResult/></GetSendQuotaResponse>",
//! )));
//! let config = SesConfig::builder().credentials("AKID", "SECRET").build()?;
//! let client = SesClient::with_transport(config, mock.clone());
//!
//! client.get_send_quota().await?;
//! assert_eq!(mock.request_count(), 1);
//! # Ok(())
//! # }
//! ```

mod transport;

pub use transport::{MockResponse, MockTransport};

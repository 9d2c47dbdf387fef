//! Typed views over parsed responses.
//!
//! The client returns every response as a generic [`ParsedResponse`]. These
//! helpers pick out the fields callers usually want.

use crate::error::{SesError, SesResult};
use crate::xml::ParsedResponse;

/// Sending limits and usage of the account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SendQuota {
    /// Maximum number of messages that may be sent in 24 hours.
    pub max_24_hour_send: f64,
    /// Maximum number of messages per second.
    pub max_send_rate: f64,
    /// Messages sent during the previous 24 hours.
    pub sent_last_24_hours: f64,
}

impl SendQuota {
    /// Read the quota out of a `GetSendQuota` response.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Parse` if a field is missing or not a number.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_simple::types::SendQuota;
    /// use integrations_aws_ses_simple::xml::parse_response;
    ///
    /// let parsed = parse_response(
    ///     "<GetSendQuotaResponse><GetSendQuotaResult>\
    ///      <SentLast24Hours>0.0</SentLast24Hours>\
    ///      <Max24HourSend>200.0</Max24HourSend>\
    ///      <MaxSendRate>1.0</MaxSendRate>\
    ///      </GetSendQuotaResult></GetSendQuotaResponse>"
    /// ).unwrap();
    ///
    /// let quota = SendQuota::from_response(&parsed).unwrap();
    /// assert_eq!(quota.max_24_hour_send, 200.0);
    /// assert_eq!(quota.remaining(), 200.0);
    /// ```
    pub fn from_response(response: &ParsedResponse) -> SesResult<Self> {
        Ok(Self {
            max_24_hour_send: read_number(response, "GetSendQuotaResult.Max24HourSend")?,
            max_send_rate: read_number(response, "GetSendQuotaResult.MaxSendRate")?,
            sent_last_24_hours: read_number(response, "GetSendQuotaResult.SentLast24Hours")?,
        })
    }

    /// Messages that may still be sent in the current 24 hour window.
    pub fn remaining(&self) -> f64 {
        (self.max_24_hour_send - self.sent_last_24_hours).max(0.0)
    }
}

/// Outcome of a `SendEmail` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEmailResponse {
    /// Identifier the service assigned to the message.
    pub message_id: String,
    /// Request ID, for support cases.
    pub request_id: Option<String>,
}

impl SendEmailResponse {
    /// Read the message ID out of a `SendEmail` response.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Parse` if there is no `SendEmailResult.MessageId`.
    pub fn from_response(response: &ParsedResponse) -> SesResult<Self> {
        let message_id = read_text(response, "SendEmailResult.MessageId")?.to_string();
        let request_id = response
            .lookup_text("ResponseMetadata.RequestId")
            .map(str::to_string);

        Ok(Self {
            message_id,
            request_id,
        })
    }
}

fn read_text<'a>(response: &'a ParsedResponse, path: &str) -> SesResult<&'a str> {
    response
        .lookup_text(path)
        .ok_or_else(|| SesError::parse(format!("response has no {}", path)))
}

fn read_number(response: &ParsedResponse, path: &str) -> SesResult<f64> {
    let text = read_text(response, path)?;
    text.trim().parse().map_err(|e| {
        SesError::parse(format!("{} is not a number ('{}'): {}", path, text, e))
    })
}

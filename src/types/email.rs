//! Email message types for the SES Query API.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::RequestParameters;

/// Maximum number of recipients per message.
pub const MAX_RECIPIENTS: usize = 50;

/// Maximum subject length in bytes (the RFC 5322 line limit).
pub const MAX_SUBJECT_LENGTH: usize = 998;

/// Character set declared for subject and body parts.
pub const DEFAULT_CHARSET: &str = "UTF-8";

const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Why a string was rejected as an email address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid email address '{address}': {reason}")]
pub struct InvalidEmailAddress {
    /// The rejected input, after trimming.
    pub address: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

/// A syntactically valid `local@domain` email address.
///
/// Parsing trims surrounding whitespace. The check is deliberately
/// conservative: it accepts ordinary mailbox addresses and rejects display
/// names, quoted local parts and IP-literal domains.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_simple::types::EmailAddress;
///
/// let address: EmailAddress = "  user@example.com ".parse().unwrap();
/// assert_eq!(address.as_str(), "user@example.com");
///
/// assert!("user@localhost".parse::<EmailAddress>().is_err());
/// assert!("John <user@example.com>".parse::<EmailAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(local, _)| local)
    }

    /// The part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }

    /// Consume into the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for EmailAddress {
    type Err = InvalidEmailAddress;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let address = input.trim();
        let invalid = |reason| InvalidEmailAddress {
            address: address.to_string(),
            reason,
        };

        if address.is_empty() {
            return Err(invalid("address is empty"));
        }

        let (local, domain) = match address.split_once('@') {
            Some(parts) => parts,
            None => return Err(invalid("missing '@'")),
        };
        if domain.contains('@') {
            return Err(invalid("more than one '@'"));
        }

        validate_local_part(local).map_err(invalid)?;
        validate_domain(domain).map_err(invalid)?;

        Ok(Self(address.to_string()))
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate_local_part(local: &str) -> Result<(), &'static str> {
    if local.is_empty() {
        return Err("local part is empty");
    }
    if local.len() > MAX_LOCAL_PART_LENGTH {
        return Err("local part is longer than 64 bytes");
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err("local part has a misplaced '.'");
    }
    if local
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '(' | ')' | ',' | ';' | ':' | '"' | '[' | ']' | '\\'))
    {
        return Err("local part contains a forbidden character");
    }
    Ok(())
}

fn validate_domain(domain: &str) -> Result<(), &'static str> {
    if domain.is_empty() {
        return Err("domain is empty");
    }
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err("domain is longer than 253 bytes");
    }

    let mut labels = 0;
    for label in domain.split('.') {
        if label.is_empty() {
            return Err("domain has an empty label");
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err("domain label is longer than 63 bytes");
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err("domain contains a forbidden character");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("domain label starts or ends with '-'");
        }
        labels += 1;
    }

    if labels < 2 {
        return Err("domain needs at least two labels");
    }
    Ok(())
}

/// A subject or body part with its declared charset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Content data.
    pub data: String,
    /// Character set.
    pub charset: String,
}

impl Content {
    /// Create new content with UTF-8 charset.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

/// A validated `SendEmail` request.
///
/// Only [`EmailBuilder::build`](crate::builders::EmailBuilder::build) can
/// produce one, so every instance has a valid sender, between one and
/// [`MAX_RECIPIENTS`] valid recipients, a usable subject and at least one
/// non-empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEmailRequest {
    source: EmailAddress,
    to: Vec<EmailAddress>,
    subject: Content,
    text: Option<Content>,
    html: Option<Content>,
}

impl SendEmailRequest {
    pub(crate) fn new(
        source: EmailAddress,
        to: Vec<EmailAddress>,
        subject: Content,
        text: Option<Content>,
        html: Option<Content>,
    ) -> Self {
        Self {
            source,
            to,
            subject,
            text,
            html,
        }
    }

    /// The sender.
    pub fn source(&self) -> &EmailAddress {
        &self.source
    }

    /// The `To` recipients, in the order they were added.
    pub fn to(&self) -> &[EmailAddress] {
        &self.to
    }

    /// The subject.
    pub fn subject(&self) -> &Content {
        &self.subject
    }

    /// The plain text body, if any.
    pub fn text(&self) -> Option<&Content> {
        self.text.as_ref()
    }

    /// The HTML body, if any.
    pub fn html(&self) -> Option<&Content> {
        self.html.as_ref()
    }

    /// Flatten into Query API parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_simple::builders::EmailBuilder;
    ///
    /// let request = EmailBuilder::new()
    ///     .from("sender@example.com")
    ///     .to("recipient@example.com")
    ///     .subject("Hello")
    ///     .text("Hi there")
    ///     .build()
    ///     .unwrap();
    ///
    /// let params = request.to_parameters();
    /// assert_eq!(params.action(), Some("SendEmail"));
    /// assert_eq!(params.get("Destination.ToAddresses.member.1"), Some("recipient@example.com"));
    /// assert_eq!(params.get("Message.Body.Text.Data"), Some("Hi there"));
    /// assert_eq!(params.get("Message.Body.Html.Data"), None);
    /// ```
    pub fn to_parameters(&self) -> RequestParameters {
        let mut params = RequestParameters::for_action("SendEmail");
        params.insert("Source", self.source.as_str());

        for (i, recipient) in self.to.iter().enumerate() {
            params.insert(
                format!("Destination.ToAddresses.member.{}", i + 1),
                recipient.as_str(),
            );
        }

        params.insert("Message.Subject.Data", self.subject.data.as_str());
        params.insert("Message.Subject.Charset", self.subject.charset.as_str());

        if let Some(text) = &self.text {
            params.insert("Message.Body.Text.Data", text.data.as_str());
            params.insert("Message.Body.Text.Charset", text.charset.as_str());
        }
        if let Some(html) = &self.html {
            params.insert("Message.Body.Html.Data", html.data.as_str());
            params.insert("Message.Body.Html.Charset", html.charset.as_str());
        }

        params
    }
}

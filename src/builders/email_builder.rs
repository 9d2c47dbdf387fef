//! Email builder for constructing send email requests.

use crate::builders::BuilderError;
use crate::types::{
    Content, EmailAddress, SendEmailRequest, MAX_RECIPIENTS, MAX_SUBJECT_LENGTH,
};

/// Builder for constructing [`SendEmailRequest`] with a fluent API.
///
/// Setters only record values; every check runs in [`build`](Self::build),
/// before anything is signed or sent.
///
/// # Examples
///
/// ## Simple email with plain text and HTML
///
/// ```rust
/// use integrations_aws_ses_simple::builders::EmailBuilder;
///
/// let request = EmailBuilder::new()
///     .from("sender@example.com")
///     .to("recipient@example.com")
///     .subject("Hello World")
///     .text("This is the plain text version")
///     .html("<p>This is the <strong>HTML</strong> version</p>")
///     .build()?;
/// # Ok::<(), integrations_aws_ses_simple::builders::BuilderError>(())
/// ```
///
/// ## Several recipients
///
/// ```rust
/// use integrations_aws_ses_simple::builders::EmailBuilder;
///
/// let request = EmailBuilder::new()
///     .from("sender@example.com")
///     .to_all(["one@example.com", "two@example.com"])
///     .to("three@example.com")
///     .subject("Meeting Invitation")
///     .html("<p>You're invited to our meeting</p>")
///     .build()?;
///
/// assert_eq!(request.to().len(), 3);
/// # Ok::<(), integrations_aws_ses_simple::builders::BuilderError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct EmailBuilder {
    from: Option<String>,
    to: Vec<String>,
    subject: Option<String>,
    text_body: Option<String>,
    html_body: Option<String>,
}

impl EmailBuilder {
    /// Create a new email builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender email address.
    ///
    /// This is a required field. The address must be verified with SES
    /// before the service will accept mail from it.
    pub fn from(mut self, email: impl Into<String>) -> Self {
        self.from = Some(email.into());
        self
    }

    /// Add a "To" recipient.
    ///
    /// Can be called multiple times to add multiple recipients.
    pub fn to(mut self, email: impl Into<String>) -> Self {
        self.to.push(email.into());
        self
    }

    /// Add several "To" recipients.
    pub fn to_all<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to.extend(emails.into_iter().map(Into::into));
        self
    }

    /// Set the email subject.
    pub fn subject(mut self, text: impl Into<String>) -> Self {
        self.subject = Some(text.into());
        self
    }

    /// Set the plain text body.
    ///
    /// At least one of `text()` or `html()` must be non-empty.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    ///
    /// At least one of `text()` or `html()` must be non-empty.
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// - [`BuilderError::MissingField`] if the sender, recipients, subject
    ///   or body are not set
    /// - [`BuilderError::InvalidValue`] if an address is malformed, there
    ///   are more than [`MAX_RECIPIENTS`] recipients, or the subject is blank
    ///   or longer than [`MAX_SUBJECT_LENGTH`] bytes
    pub fn build(self) -> Result<SendEmailRequest, BuilderError> {
        let from = self
            .from
            .ok_or_else(|| BuilderError::missing_field("source"))?;
        let source: EmailAddress = from
            .parse()
            .map_err(|e| BuilderError::invalid_value("source", format!("{}", e)))?;

        if self.to.is_empty() {
            return Err(BuilderError::missing_field("to"));
        }
        if self.to.len() > MAX_RECIPIENTS {
            return Err(BuilderError::invalid_value(
                "to",
                format!(
                    "{} recipients given, at most {} are allowed",
                    self.to.len(),
                    MAX_RECIPIENTS
                ),
            ));
        }
        let to = self
            .to
            .iter()
            .map(|address| address.parse::<EmailAddress>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BuilderError::invalid_value("to", format!("{}", e)))?;

        let subject = self
            .subject
            .ok_or_else(|| BuilderError::missing_field("subject"))?;
        if subject.trim().is_empty() {
            return Err(BuilderError::invalid_value("subject", "subject is empty"));
        }
        if subject.len() > MAX_SUBJECT_LENGTH {
            return Err(BuilderError::invalid_value(
                "subject",
                format!(
                    "subject is {} bytes, at most {} are allowed",
                    subject.len(),
                    MAX_SUBJECT_LENGTH
                ),
            ));
        }

        let text = non_blank(self.text_body).map(Content::new);
        let html = non_blank(self.html_body).map(Content::new);
        if text.is_none() && html.is_none() {
            return Err(BuilderError::missing_field("body (text or html)"));
        }

        Ok(SendEmailRequest::new(
            source,
            to,
            Content::new(subject),
            text,
            html,
        ))
    }
}

fn non_blank(body: Option<String>) -> Option<String> {
    body.filter(|b| !b.trim().is_empty())
}

//! Builders for constructing SES requests.
//!
//! # Builders
//!
//! - [`EmailBuilder`] - For constructing validated `SendEmail` requests
//!
//! # Examples
//!
//! ```rust
//! use integrations_aws_ses_simple::builders::EmailBuilder;
//!
//! let request = EmailBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello World")
//!     .text("This is a plain text email")
//!     .html("<p>This is an HTML email</p>")
//!     .build()?;
//! # Ok::<(), integrations_aws_ses_simple::builders::BuilderError>(())
//! ```

mod email_builder;

pub use email_builder::EmailBuilder;

use thiserror::Error;

/// Error type for builder operations.
///
/// This error is returned when a builder's `build()` method is called
/// but the builder is in an invalid state (e.g., missing required fields
/// or invalid field values).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field has an invalid value.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue {
        /// The name of the field with the invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

impl BuilderError {
    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => field,
        }
    }
}

//! SES endpoint hosts.
//!
//! An endpoint is identified by its bare host name, e.g.
//! `email.us-east-1.amazonaws.com`. The first dot-separated label names the
//! signing service and the second names the signing region.

use std::fmt;

use super::ConfigError;

/// US East (N. Virginia) endpoint host.
pub const AWS_US_EAST_1: &str = "email.us-east-1.amazonaws.com";

/// US West (Oregon) endpoint host.
pub const AWS_US_WEST_2: &str = "email.us-west-2.amazonaws.com";

/// EU (Ireland) endpoint host.
pub const AWS_EU_WEST_1: &str = "email.eu-west-1.amazonaws.com";

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = AWS_US_EAST_1;

/// A validated endpoint host.
///
/// Construction fails unless the host has at least two non-empty labels, so
/// `service()` and `region()` always return something meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    service_end: usize,
    region_end: usize,
}

impl Endpoint {
    /// Parse and validate an endpoint host.
    ///
    /// # Arguments
    ///
    /// * `host` - Bare host name without scheme, port or path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHost` if the host is empty, contains a
    /// scheme or path, or has fewer than two non-empty labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_simple::config::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("email.eu-west-1.amazonaws.com").unwrap();
    /// assert_eq!(endpoint.service(), "email");
    /// assert_eq!(endpoint.region(), "eu-west-1");
    /// ```
    pub fn parse(host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        let invalid = |message: &str| ConfigError::InvalidHost {
            host: host.clone(),
            message: message.to_string(),
        };

        if host.is_empty() {
            return Err(invalid("host is empty"));
        }
        if host.contains("://") || host.contains('/') {
            return Err(invalid("expected a bare host name without scheme or path"));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(invalid("host contains whitespace"));
        }

        let (service_end, region_end) = label_bounds(&host).map_err(invalid)?;
        Ok(Self {
            host,
            service_end,
            region_end,
        })
    }

    /// The full host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The signing service (first label).
    pub fn service(&self) -> &str {
        &self.host[..self.service_end]
    }

    /// The signing region (second label).
    pub fn region(&self) -> &str {
        &self.host[self.service_end + 1..self.region_end]
    }

    /// The HTTPS URL requests are posted to.
    pub fn url(&self) -> String {
        format!("https://{}/", self.host)
    }
}

/// End offsets of the service and region labels of a host.
fn label_bounds(host: &str) -> Result<(usize, usize), &'static str> {
    let mut labels = host.split('.');
    let service = labels.next().unwrap_or_default();
    let region = labels
        .next()
        .ok_or("expected at least two dot-separated labels")?;
    if service.is_empty() || region.is_empty() {
        return Err("service and region labels must be non-empty");
    }

    let service_end = service.len();
    Ok((service_end, service_end + 1 + region.len()))
}

impl Default for Endpoint {
    fn default() -> Self {
        let (service_end, region_end) =
            label_bounds(DEFAULT_HOST).expect("DEFAULT_HOST has service and region labels");
        Self {
            host: DEFAULT_HOST.to_string(),
            service_end,
            region_end,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

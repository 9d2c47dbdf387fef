//! Configuration module for the SES client.
//!
//! This module provides configuration types and builders for creating and
//! customizing the client, including:
//!
//! - Endpoint host selection (which also fixes the signing region)
//! - Static credentials
//! - An endpoint URL override for local test servers
//! - Timeout settings
//! - User agent customization

use std::time::Duration;

use url::Url;

pub mod endpoint;
pub mod error;

pub use endpoint::{Endpoint, AWS_EU_WEST_1, AWS_US_EAST_1, AWS_US_WEST_2, DEFAULT_HOST};
pub use error::ConfigError;

use crate::credentials::AwsCredentials;

/// Default timeout for the entire request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the SES client.
#[derive(Debug, Clone)]
pub struct SesConfig {
    /// Endpoint host; also determines the signing service and region.
    pub endpoint: Endpoint,

    /// Static credentials used to sign every request.
    pub credentials: AwsCredentials,

    /// URL requests are actually sent to, when it differs from
    /// `https://<host>/`. Signing still uses the endpoint host.
    pub endpoint_url: Option<Url>,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl SesConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_aws_ses_simple::config::{SesConfig, AWS_EU_WEST_1};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SesConfig::builder()
    ///     .host(AWS_EU_WEST_1)
    ///     .credentials("access_key", "secret_key")
    ///     .build()?;
    /// assert_eq!(config.endpoint.region(), "eu-west-1");
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> SesConfigBuilder {
        SesConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// This method reads the following environment variables:
    /// - `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` (required)
    /// - `SES_HOST` for the endpoint host, otherwise
    /// - `AWS_REGION` to form `email.<region>.amazonaws.com`, otherwise the
    ///   default host
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_aws_ses_simple::config::SesConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SesConfig::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::Environment {
                    message: format!("{} must be set", name),
                })
        };

        let access_key_id = require("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = require("AWS_SECRET_ACCESS_KEY")?;

        let host = match lookup("SES_HOST").filter(|h| !h.is_empty()) {
            Some(host) => host,
            None => match lookup("AWS_REGION").filter(|r| !r.is_empty()) {
                Some(region) => format!("email.{}.amazonaws.com", region),
                None => DEFAULT_HOST.to_string(),
            },
        };

        Self::builder()
            .host(host)
            .credentials(access_key_id, secret_access_key)
            .build()
    }

    /// The URL requests are posted to.
    ///
    /// Returns the endpoint URL override if configured, otherwise
    /// `https://<host>/`.
    pub fn request_url(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.to_string(),
            None => self.endpoint.url(),
        }
    }
}

/// Builder for creating SES client configurations.
#[derive(Default)]
pub struct SesConfigBuilder {
    host: Option<String>,
    credentials: Option<AwsCredentials>,
    endpoint_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SesConfigBuilder {
    /// Set the endpoint host (e.g. `email.us-west-2.amazonaws.com`).
    ///
    /// Defaults to [`DEFAULT_HOST`] when not set.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set static credentials.
    ///
    /// # Arguments
    ///
    /// * `access_key_id` - AWS access key ID
    /// * `secret_access_key` - AWS secret access key
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(AwsCredentials::new(access_key_id, secret_access_key));
        self
    }

    /// Set already constructed credentials.
    pub fn aws_credentials(mut self, credentials: AwsCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Send requests to this URL instead of `https://<host>/`.
    ///
    /// Useful for pointing the client at a local test server. The `Host`
    /// header and the signature still use the configured host.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_aws_ses_simple::config::SesConfig;
    ///
    /// let builder = SesConfig::builder()
    ///     .credentials("access_key", "secret_key")
    ///     .endpoint_url("http://localhost:4566/");
    /// ```
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingField` if credentials are not set or empty
    /// - `ConfigError::InvalidHost` if the host cannot be split into service
    ///   and region
    /// - `ConfigError::Invalid` if the endpoint URL does not parse or a
    ///   timeout is zero
    pub fn build(self) -> Result<SesConfig, ConfigError> {
        let credentials = self.credentials.ok_or_else(|| ConfigError::MissingField {
            field: "credentials".to_string(),
        })?;
        credentials.validate()?;

        let endpoint = match self.host {
            Some(host) => Endpoint::parse(host)?,
            None => Endpoint::default(),
        };

        let endpoint_url = self
            .endpoint_url
            .map(|raw| {
                let url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    message: format!("endpoint_url '{}': {}", raw, e),
                })?;
                match url.scheme() {
                    "http" | "https" => Ok(url),
                    other => Err(ConfigError::Invalid {
                        message: format!("endpoint_url scheme must be http or https, got '{}'", other),
                    }),
                }
            })
            .transpose()?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        if timeout.is_zero() || connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "timeouts must be greater than zero".to_string(),
            });
        }

        Ok(SesConfig {
            endpoint,
            credentials,
            endpoint_url,
            timeout,
            connect_timeout,
            user_agent: self.user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_builder_with_required_fields() {
        let config = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .build()
            .unwrap();

        assert_eq!(config.endpoint.host(), DEFAULT_HOST);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.endpoint_url.is_none());
        assert_eq!(config.request_url(), "https://email.us-east-1.amazonaws.com/");
    }

    #[test]
    fn test_builder_with_host() {
        let config = SesConfig::builder()
            .host(AWS_US_WEST_2)
            .credentials("access_key", "secret_key")
            .build()
            .unwrap();

        assert_eq!(config.endpoint.region(), "us-west-2");
        assert_eq!(config.endpoint.service(), "email");
    }

    #[test]
    fn test_builder_with_endpoint_url() {
        let config = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .endpoint_url("http://localhost:4566/")
            .build()
            .unwrap();

        assert_eq!(config.request_url(), "http://localhost:4566/");
        assert_eq!(config.endpoint.host(), DEFAULT_HOST);
    }

    #[test]
    fn test_builder_rejects_bad_endpoint_url() {
        let result = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .endpoint_url("not a url")
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .endpoint_url("ftp://localhost/")
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_builder_with_custom_timeouts() {
        let config = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_builder_with_user_agent() {
        let config = SesConfig::builder()
            .credentials("access_key", "secret_key")
            .user_agent("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.user_agent, Some("MyApp/1.0".to_string()));
    }

    #[test]
    fn test_builder_missing_credentials() {
        match SesConfig::builder().build() {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "credentials"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_empty_credentials() {
        let result = SesConfig::builder().credentials("", "secret_key").build();
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_builder_invalid_host() {
        let result = SesConfig::builder()
            .host("localhost")
            .credentials("access_key", "secret_key")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidHost { .. })));
    }

    #[test]
    fn test_from_lookup_prefers_ses_host() {
        let config = SesConfig::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
            ("SES_HOST", AWS_EU_WEST_1),
            ("AWS_REGION", "us-west-2"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.host(), AWS_EU_WEST_1);
        assert_eq!(config.credentials.access_key_id(), "AKID");
    }

    #[test]
    fn test_from_lookup_falls_back_to_region() {
        let config = SesConfig::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
            ("AWS_REGION", "us-west-2"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.host(), AWS_US_WEST_2);
    }

    #[test]
    fn test_from_lookup_default_host() {
        let config = SesConfig::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.host(), DEFAULT_HOST);
    }

    #[test]
    fn test_from_lookup_missing_secret() {
        let result = SesConfig::from_lookup(lookup_from(&[("AWS_ACCESS_KEY_ID", "AKID")]));
        match result {
            Err(ConfigError::Environment { message }) => {
                assert!(message.contains("AWS_SECRET_ACCESS_KEY"))
            }
            other => panic!("Expected Environment error, got {:?}", other),
        }
    }
}

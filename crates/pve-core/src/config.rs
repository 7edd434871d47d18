//! Connection configuration for the Proxmox VE API.
//!
//! This module provides the validated connection parameters used to construct
//! the API client: endpoint, API token credentials, and TLS trust policy. The
//! configuration is immutable once a client has been built from it.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;
use validator::{Validate, ValidationError};

/// Connection parameters for a Proxmox VE API client.
///
/// All fields except [`ignore_untrusted_ssl_certificate`] are required and
/// must be non-empty. The token secret is held behind [`SecretString`] so it
/// is redacted from debug output.
///
/// [`ignore_untrusted_ssl_certificate`]: ConnectionConfig::ignore_untrusted_ssl_certificate
#[derive(Debug, Deserialize, Validate)]
pub struct ConnectionConfig {
    /// Proxmox VE base URL endpoint (e.g. `https://server:8006`)
    #[validate(url)]
    pub endpoint: String,

    /// Proxmox VE user API token username (e.g. `root@pam`)
    #[validate(length(min = 1))]
    pub api_token_username: String,

    /// Proxmox VE user API token ID
    #[validate(length(min = 1))]
    pub api_token_id: String,

    /// Proxmox VE user API token secret
    #[validate(custom(function = validate_secret_present))]
    pub api_token_secret: SecretString,

    /// Ignore any untrusted / self-signed certificate from the endpoint
    #[serde(default)]
    pub ignore_untrusted_ssl_certificate: bool,
}

fn validate_secret_present(secret: &SecretString) -> Result<(), ValidationError> {
    if secret.expose_secret().is_empty() {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

impl ConnectionConfig {
    /// Create a new connection configuration with required parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or any required
    /// field is empty. All violations are collected into a single
    /// [`Error::ValidationError`] rather than reported one at a time.
    pub fn new(
        endpoint: impl Into<String>,
        api_token_username: impl Into<String>,
        api_token_id: impl Into<String>,
        api_token_secret: SecretString,
    ) -> Result<Self, Error> {
        let config = Self {
            endpoint: endpoint.into(),
            api_token_username: api_token_username.into(),
            api_token_id: api_token_id.into(),
            api_token_secret,
            ignore_untrusted_ssl_certificate: false,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set whether untrusted TLS certificates are accepted.
    #[must_use]
    pub const fn with_ignore_untrusted_ssl_certificate(mut self, ignore: bool) -> Self {
        self.ignore_untrusted_ssl_certificate = ignore;
        self
    }

    /// Parse and validate the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be parsed.
    pub fn parse_endpoint(&self) -> Result<Url, Error> {
        Url::parse(&self.endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint URL: {e}")))
    }
}

//! Provider configuration, validation, and client construction.
//!
//! Configuring the provider happens once per host session: the connection
//! parameters are validated (every problem reported at once, not
//! short-circuited), an API client is constructed, and a single version call
//! is made as a connectivity and credential check. The resulting context is
//! the shared state every lookup borrows.

use crate::diagnostics::Diagnostics;
use crate::lifecycle::Provider;
use crate::schema::{Attribute, Schema};
use crate::value::Value;
use async_trait::async_trait;
use pve_api::PveClient;
use pve_core::config::ConnectionConfig;
use secrecy::SecretString;
use tracing::info;

/// Stable type name of the provider.
pub const PROVIDER_TYPE_NAME: &str = "proxmoxve";

const CONFIGURE_GUIDANCE: &str = "Either target apply the source of the value first, \
     set the value statically in the configuration, or use a variable in the configuration.";

/// Declarative configuration model for the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    /// Proxmox VE base URL endpoint.
    pub endpoint: Value<String>,
    /// Proxmox VE user API token username.
    pub api_token_username: Value<String>,
    /// Proxmox VE user API token ID.
    pub api_token_id: Value<String>,
    /// Proxmox VE user API token secret.
    pub api_token_secret: Value<String>,
    /// Ignore any untrusted / self-signed certificate from the endpoint.
    pub ignore_untrusted_ssl_certificate: Value<bool>,
}

/// Shared session state produced by a successful configure.
#[derive(Clone)]
pub struct ProviderContext {
    /// The shared API client handle. Read-only after construction and safe
    /// to use across concurrent lookups.
    pub client: PveClient,
    /// The configured endpoint, kept for log context.
    pub endpoint: String,
}

/// The Proxmox VE provider.
#[derive(Debug, Default)]
pub struct PveProvider;

impl PveProvider {
    /// Create a new provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for PveProvider {
    type Config = ProviderConfig;
    type Data = ProviderContext;

    fn type_name(&self) -> &'static str {
        PROVIDER_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute(
                "api_token_id",
                Attribute::string()
                    .required()
                    .sensitive()
                    .with_description("Proxmox VE user API token ID"),
            )
            .with_attribute(
                "api_token_secret",
                Attribute::string()
                    .required()
                    .sensitive()
                    .with_description("Proxmox VE user API token secret"),
            )
            .with_attribute(
                "api_token_username",
                Attribute::string()
                    .required()
                    .sensitive()
                    .with_description("Proxmox VE user API token username"),
            )
            .with_attribute(
                "endpoint",
                Attribute::string()
                    .required()
                    .sensitive()
                    .with_description("Proxmox VE base URL endpoint (eg: https://server:port)"),
            )
            .with_attribute(
                "ignore_untrusted_ssl_certificate",
                Attribute::boolean().optional().with_description(
                    "Ignore any untrusted / self-signed certificate from the Proxmox VE endpoint",
                ),
            )
    }

    async fn configure(
        &self,
        config: Self::Config,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self::Data> {
        let required = [
            ("api_token_id", "API Token ID", "API token ID", &config.api_token_id),
            (
                "api_token_secret",
                "API Token Secret",
                "API token secret",
                &config.api_token_secret,
            ),
            (
                "api_token_username",
                "API Token Username",
                "API token username",
                &config.api_token_username,
            ),
            ("endpoint", "Endpoint", "endpoint", &config.endpoint),
        ];

        // a configured value must be a known value
        for (attribute, summary_label, detail_label, value) in required.iter().copied() {
            if value.is_unknown() {
                diagnostics.add_attribute_error(
                    attribute,
                    format!("Unknown Proxmox VE {summary_label}"),
                    format!(
                        "The provider cannot create the Proxmox VE API client as there is \
                         an unknown configuration value for the {detail_label}. \
                         {CONFIGURE_GUIDANCE}"
                    ),
                );
            }
        }
        if diagnostics.has_errors() {
            return None;
        }

        // every required value must be present and non-empty
        for (attribute, summary_label, detail_label, value) in required.iter().copied() {
            let resolved = value.as_known().map_or("", String::as_str);
            if resolved.is_empty() {
                diagnostics.add_attribute_error(
                    attribute,
                    format!("Missing Proxmox VE {summary_label}"),
                    format!(
                        "The provider cannot create the Proxmox VE API client as there is \
                         a missing or empty value for the {detail_label}. \
                         {CONFIGURE_GUIDANCE}"
                    ),
                );
            }
        }
        if diagnostics.has_errors() {
            return None;
        }

        let endpoint = config.endpoint.as_known().cloned().unwrap_or_default();
        let username = config
            .api_token_username
            .as_known()
            .cloned()
            .unwrap_or_default();
        let token_id = config.api_token_id.as_known().cloned().unwrap_or_default();
        let secret = config
            .api_token_secret
            .as_known()
            .cloned()
            .unwrap_or_default();
        let ignore_untrusted = config.ignore_untrusted_ssl_certificate.known_or(false);

        let connection =
            match ConnectionConfig::new(&endpoint, &username, &token_id, SecretString::from(secret))
            {
                Ok(connection) => {
                    connection.with_ignore_untrusted_ssl_certificate(ignore_untrusted)
                }
                Err(err) => {
                    diagnostics.add_error(
                        "Invalid Proxmox VE Provider Configuration",
                        format!("The connection configuration failed validation: {err}"),
                    );
                    return None;
                }
            };

        let client = match PveClient::from_config(connection) {
            Ok(client) => client,
            Err(err) => {
                diagnostics.add_error(
                    "Proxmox VE API: Client Construction Failed",
                    format!("Failed to construct the Proxmox VE API client: {err}"),
                );
                return None;
            }
        };

        match client.version().await {
            Ok(version) => {
                info!(
                    version = %version.version,
                    release = %version.release,
                    repoid = ?version.repoid,
                    endpoint = %endpoint,
                    "connected to Proxmox VE server"
                );
                Some(ProviderContext { client, endpoint })
            }
            Err(err) => {
                diagnostics.add_error(
                    "Proxmox VE API: Get Version Failed",
                    format!("Failed to get the Proxmox VE version details from the API: {err}"),
                );
                None
            }
        }
    }
}

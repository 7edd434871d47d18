//! Asynchronous Proxmox VE API client implementation.

use crate::models::{ApiData, NodeStatus, VersionInfo, VirtualMachine, VmConfig, VmStatus};
use crate::Result;
use pve_core::client::ClientConfig;
use pve_core::config::ConnectionConfig;
use pve_core::types::VmId;
use pve_core::Error;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::info;
use url::Url;
use validator::Validate;

const USER_AGENT: &str = concat!("pve-api/", env!("CARGO_PKG_VERSION"));

/// API token credentials attached to every request.
#[derive(Debug)]
struct ApiToken {
    username: String,
    token_id: String,
    secret: SecretString,
}

impl ApiToken {
    /// Compose the platform's token Authorization header value.
    fn header_value(&self) -> String {
        format!(
            "PVEAPIToken={}!{}={}",
            self.username,
            self.token_id,
            self.secret.expose_secret()
        )
    }
}

/// Builder for [`PveClient`].
#[derive(Debug)]
pub struct PveClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    api_token: Option<ApiToken>,
    accept_invalid_certs: bool,
}

impl PveClientBuilder {
    /// Create a new builder with the provided Proxmox VE base URL.
    ///
    /// The URL should include the protocol and hostname
    /// (e.g. `https://pve.example.com:8006`); the `api2/json` prefix is
    /// appended by the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid Proxmox VE base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            api_token: None,
            accept_invalid_certs: false,
        })
    }

    /// Configure API token authentication.
    ///
    /// The token is sent as `Authorization: PVEAPIToken={username}!{token_id}={secret}`.
    #[must_use]
    pub fn with_api_token(
        mut self,
        username: impl Into<String>,
        token_id: impl Into<String>,
        secret: SecretString,
    ) -> Self {
        self.api_token = Some(ApiToken {
            username: username.into(),
            token_id: token_id.into(),
            secret,
        });
        self
    }

    /// Override the HTTP transport configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Disable TLS certificate verification.
    ///
    /// Only intended for endpoints presenting untrusted or self-signed
    /// certificates.
    #[must_use]
    pub const fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the Proxmox VE client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<PveClient> {
        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build Proxmox VE HTTP client: {err}"))
        })?;

        Ok(PveClient {
            http,
            base_url: self.base_url,
            auth_header: self.api_token.as_ref().map(ApiToken::header_value),
        })
    }
}

/// Asynchronous Proxmox VE API client.
///
/// The client is cheap to clone and safe to share across concurrent lookups;
/// nothing is mutated after construction. Remote calls are attempted exactly
/// once, with no retry.
#[derive(Clone)]
pub struct PveClient {
    http: Client,
    base_url: Url,
    auth_header: Option<String>,
}

impl PveClient {
    /// Create a new unauthenticated client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        PveClientBuilder::new(base_url)?.build()
    }

    /// Create an authenticated client from a validated connection configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or the HTTP
    /// client cannot be constructed.
    pub fn from_config(config: ConnectionConfig) -> Result<Self> {
        config.validate().map_err(Error::from)?;

        PveClientBuilder::new(&config.endpoint)?
            .with_api_token(
                config.api_token_username,
                config.api_token_id,
                config.api_token_secret,
            )
            .danger_accept_invalid_certs(config.ignore_untrusted_ssl_certificate)
            .build()
    }

    /// Access the underlying base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch API version metadata.
    ///
    /// Used as the connectivity and credential check when a client is first
    /// configured.
    pub async fn version(&self) -> Result<VersionInfo> {
        let envelope: ApiData<VersionInfo> = self.get_json("api2/json/version").await?;
        Ok(envelope.data)
    }

    /// Resolve a cluster node by name.
    pub async fn node(&self, name: &str) -> Result<NodeStatus> {
        let path = format!("api2/json/nodes/{name}/status");
        let envelope: ApiData<NodeStatus> = self.get_json(&path).await?;
        Ok(envelope.data)
    }

    /// Fetch a virtual machine's status and configuration by id.
    ///
    /// The configuration endpoint may return an empty payload, in which case
    /// the VM is reported without an attached configuration object.
    pub async fn virtual_machine(&self, node: &str, vmid: VmId) -> Result<VirtualMachine> {
        let status_path = format!("api2/json/nodes/{node}/qemu/{vmid}/status/current");
        let status: ApiData<VmStatus> = self.get_json(&status_path).await?;

        let config_path = format!("api2/json/nodes/{node}/qemu/{vmid}/config");
        let config: ApiData<Option<VmConfig>> = self.get_json(&config_path).await?;

        Ok(VirtualMachine {
            vmid,
            name: status.data.name,
            node: node.to_string(),
            status: status.data.status,
            config: config.data,
        })
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);

        self.base_url.join(normalized).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid Proxmox VE path `{path}`: {err}"))
        })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path)?;
        let mut request = self.http.get(url).header("Accept", "application/json");

        if let Some(auth) = &self.auth_header {
            request = request.header(reqwest::header::AUTHORIZATION, auth.as_str());
        }

        info!(path, "PVE API request");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status_to_error(status, text));
        }

        response.json::<T>().await.map_err(|err| {
            Error::ApiParseError(format!("Failed to parse PVE response for `{path}`: {err}"))
        })
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::AuthFailed(format!("PVE authentication failed: {text}"))
        }
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("PVE temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("PVE server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("PVE error {status}: {text}")),
    }
}

//! Configuration types for the VWS client.
//!
//! This module provides [`VwsConfig`]: the two base URLs, one credentials
//! provider per key role, and transport settings.

mod environments;

pub use environments::{resolve as resolve_environment, Environment, DEFAULT_ENVIRONMENTS_FILE, PRODUCTION};

use crate::credentials::{CredentialsProvider, EnvCredentialsProvider, KeyRole, StaticCredentialsProvider, VwsCredentials};
use crate::error::{ConfigurationError, VwsError};
use crate::transport::default_user_agent;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Production target management endpoint.
pub const PROVISIONING_URL: &str = "https://vws.vuforia.com";

/// Production recognition endpoint.
pub const QUERY_URL: &str = "https://cloudreco.vuforia.com";

/// Configuration for the VWS client.
#[derive(Clone)]
pub struct VwsConfig {
    /// Base URL for target management.
    pub provisioning_url: Url,

    /// Base URL for recognition queries.
    pub query_url: Url,

    /// Server key pair, used for target management.
    pub server_credentials: Option<Arc<dyn CredentialsProvider>>,

    /// Client key pair, used for queries.
    pub client_credentials: Option<Arc<dyn CredentialsProvider>>,

    /// Connection timeout. Unset means no client-side limit.
    pub connect_timeout: Option<Duration>,

    /// Whole-request timeout. Unset means no client-side limit.
    pub read_timeout: Option<Duration>,

    /// Verify TLS certificates.
    pub verify_ssl: bool,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl std::fmt::Debug for VwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VwsConfig")
            .field("provisioning_url", &self.provisioning_url.as_str())
            .field("query_url", &self.query_url.as_str())
            .field("has_server_credentials", &self.server_credentials.is_some())
            .field("has_client_credentials", &self.client_credentials.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Default for VwsConfig {
    fn default() -> Self {
        Self {
            provisioning_url: parse_builtin(PROVISIONING_URL),
            query_url: parse_builtin(QUERY_URL),
            server_credentials: None,
            client_credentials: None,
            connect_timeout: None,
            read_timeout: None,
            verify_ssl: true,
            user_agent: default_user_agent(),
        }
    }
}

fn parse_builtin(url: &str) -> Url {
    Url::parse(url).expect("built-in endpoint URL is valid")
}

impl VwsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> VwsConfigBuilder {
        VwsConfigBuilder::default()
    }

    /// The credentials provider configured for a key role.
    pub fn credentials(&self, role: KeyRole) -> Option<&Arc<dyn CredentialsProvider>> {
        match role {
            KeyRole::Server => self.server_credentials.as_ref(),
            KeyRole::Client => self.client_credentials.as_ref(),
        }
    }
}

/// Builder for VWS configuration.
#[derive(Default)]
pub struct VwsConfigBuilder {
    provisioning_url: Option<Url>,
    query_url: Option<Url>,
    environment: Option<String>,
    environments_file: Option<PathBuf>,
    server_credentials: Option<Arc<dyn CredentialsProvider>>,
    client_credentials: Option<Arc<dyn CredentialsProvider>>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    verify_ssl: Option<bool>,
    user_agent: Option<String>,
    env_error: Option<VwsError>,
}

impl VwsConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target management base URL.
    pub fn provisioning_url(mut self, url: impl Into<String>) -> Result<Self, VwsError> {
        self.provisioning_url = Some(parse_endpoint(url.into())?);
        Ok(self)
    }

    /// Set the recognition base URL.
    pub fn query_url(mut self, url: impl Into<String>) -> Result<Self, VwsError> {
        self.query_url = Some(parse_endpoint(url.into())?);
        Ok(self)
    }

    /// Take base URLs from a named environment.
    ///
    /// Explicitly set URLs win over the environment's.
    pub fn environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    /// Read named environments from this file instead of `environments.json`.
    pub fn environments_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.environments_file = Some(path.into());
        self
    }

    /// Set the credentials provider for a key role.
    pub fn credentials(mut self, role: KeyRole, provider: Arc<dyn CredentialsProvider>) -> Self {
        match role {
            KeyRole::Server => self.server_credentials = Some(provider),
            KeyRole::Client => self.client_credentials = Some(provider),
        }
        self
    }

    /// Use a fixed server key pair.
    pub fn server_credentials(self, credentials: VwsCredentials) -> Self {
        self.credentials(KeyRole::Server, Arc::new(StaticCredentialsProvider::new(credentials)))
    }

    /// Use a fixed client key pair.
    pub fn client_credentials(self, credentials: VwsCredentials) -> Self {
        self.credentials(KeyRole::Client, Arc::new(StaticCredentialsProvider::new(credentials)))
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the whole-request timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A variable that is set but cannot be parsed makes [`Self::build`]
    /// fail. Credentials are picked up only when both variables of a pair
    /// are set.
    pub fn from_env(mut self) -> Self {
        self = self.apply_vars(|name| std::env::var(name).ok());

        for role in [KeyRole::Server, KeyRole::Client] {
            let provider = EnvCredentialsProvider::for_role(role);
            if provider.is_available() {
                self = self.credentials(role, Arc::new(provider));
            }
        }

        self
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("VWS_PROVISIONING_URL") {
            match parse_endpoint(url) {
                Ok(url) => self.provisioning_url = Some(url),
                Err(e) => self.record_env_error(e),
            }
        }
        if let Some(url) = var("VWS_QUERY_URL") {
            match parse_endpoint(url) {
                Ok(url) => self.query_url = Some(url),
                Err(e) => self.record_env_error(e),
            }
        }

        if let Some(name) = var("VWS_ENVIRONMENT") {
            self.environment = Some(name);
        }
        if let Some(path) = var("VWS_ENVIRONMENTS_FILE") {
            self.environments_file = Some(PathBuf::from(path));
        }

        if let Some(val) = var("VWS_CONNECT_TIMEOUT_MS") {
            match parse_millis("VWS_CONNECT_TIMEOUT_MS", &val) {
                Ok(timeout) => self.connect_timeout = Some(timeout),
                Err(e) => self.record_env_error(e),
            }
        }
        if let Some(val) = var("VWS_READ_TIMEOUT_MS") {
            match parse_millis("VWS_READ_TIMEOUT_MS", &val) {
                Ok(timeout) => self.read_timeout = Some(timeout),
                Err(e) => self.record_env_error(e),
            }
        }

        self
    }

    // First failure wins.
    fn record_env_error(&mut self, error: VwsError) {
        self.env_error.get_or_insert(error);
    }

    /// Build the configuration.
    pub fn build(self) -> Result<VwsConfig, VwsError> {
        if let Some(error) = self.env_error {
            return Err(error);
        }

        let defaults = VwsConfig::default();

        let environment = match &self.environment {
            Some(name) => Some(environments::resolve(name, self.environments_file.as_deref())?),
            None => None,
        };

        let provisioning_url = match (self.provisioning_url, &environment) {
            (Some(url), _) => url,
            (None, Some(env)) => parse_endpoint(env.provisioning_url.clone())?,
            (None, None) => defaults.provisioning_url,
        };
        let query_url = match (self.query_url, &environment) {
            (Some(url), _) => url,
            (None, Some(env)) => parse_endpoint(env.query_url.clone())?,
            (None, None) => defaults.query_url,
        };

        require_http("provisioning_url", &provisioning_url)?;
        require_http("query_url", &query_url)?;
        require_nonzero("connect_timeout", self.connect_timeout)?;
        require_nonzero("read_timeout", self.read_timeout)?;

        Ok(VwsConfig {
            provisioning_url,
            query_url,
            server_credentials: self.server_credentials,
            client_credentials: self.client_credentials,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            verify_ssl: self.verify_ssl.unwrap_or(defaults.verify_ssl),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        })
    }
}

fn parse_endpoint(url: String) -> Result<Url, VwsError> {
    Url::parse(&url).map_err(|e| {
        VwsError::Configuration(ConfigurationError::InvalidEndpoint {
            url,
            details: e.to_string(),
        })
    })
}

fn parse_millis(field: &str, value: &str) -> Result<Duration, VwsError> {
    value.trim().parse().map(Duration::from_millis).map_err(|_| {
        VwsError::Configuration(ConfigurationError::InvalidConfiguration {
            field: field.to_string(),
            message: format!("expected a number of milliseconds, got '{}'", value),
        })
    })
}

fn require_http(field: &str, url: &Url) -> Result<(), VwsError> {
    if url.scheme() == "http" || url.scheme() == "https" {
        return Ok(());
    }
    Err(VwsError::Configuration(ConfigurationError::InvalidConfiguration {
        field: field.to_string(),
        message: format!("URL scheme must be http or https, got '{}'", url.scheme()),
    }))
}

fn require_nonzero(field: &str, timeout: Option<Duration>) -> Result<(), VwsError> {
    if timeout == Some(Duration::ZERO) {
        return Err(VwsError::Configuration(ConfigurationError::InvalidConfiguration {
            field: field.to_string(),
            message: "Timeout must be greater than zero".to_string(),
        }));
    }
    Ok(())
}

//! VWS client implementation.
//!
//! This module provides the main client interface and builder.

use crate::config::VwsConfig;
use crate::credentials::KeyRole;
use crate::error::{CredentialsError, VwsError};
use crate::services::{QueryService, TargetsService};
use crate::signing::{HmacSigner, VwsSigner};
use crate::transport::{HttpTransport, ReqwestTransport};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// VWS client trait.
pub trait VwsClient: Send + Sync {
    /// Get the target management service.
    ///
    /// Fails if no server key pair is configured.
    fn targets(&self) -> Result<&TargetsService, VwsError>;

    /// Get the recognition query service.
    ///
    /// Fails if no client key pair is configured.
    fn query(&self) -> Result<&QueryService, VwsError>;

    /// Get the client configuration.
    fn config(&self) -> &VwsConfig;
}

/// VWS client implementation.
pub struct VwsClientImpl {
    config: Arc<VwsConfig>,
    transport: Arc<dyn HttpTransport>,

    targets: OnceCell<TargetsService>,
    query: OnceCell<QueryService>,
}

impl VwsClientImpl {
    /// Create a new client with the given configuration.
    pub fn new(config: VwsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            targets: OnceCell::new(),
            query: OnceCell::new(),
        }
    }

    fn signer(&self, role: KeyRole) -> Result<Arc<dyn VwsSigner>, VwsError> {
        let provider = self.config.credentials(role).cloned().ok_or_else(|| {
            VwsError::Credentials(CredentialsError::NotConfigured {
                role: role.as_str(),
            })
        })?;
        Ok(Arc::new(HmacSigner::new(provider, role)))
    }
}

impl VwsClient for VwsClientImpl {
    fn targets(&self) -> Result<&TargetsService, VwsError> {
        self.targets.get_or_try_init(|| {
            Ok(TargetsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer(KeyRole::Server)?,
            ))
        })
    }

    fn query(&self) -> Result<&QueryService, VwsError> {
        self.query.get_or_try_init(|| {
            Ok(QueryService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer(KeyRole::Client)?,
            ))
        })
    }

    fn config(&self) -> &VwsConfig {
        &self.config
    }
}

impl std::fmt::Debug for VwsClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VwsClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the VWS client.
pub struct VwsClientBuilder {
    config: Option<VwsConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl VwsClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            from_env: false,
            transport: None,
        }
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: VwsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<VwsClientImpl, VwsError> {
        let config = if let Some(config) = self.config {
            config
        } else if self.from_env {
            VwsConfig::builder().from_env().build()?
        } else {
            VwsConfig::default()
        };

        let transport = if let Some(transport) = self.transport {
            transport
        } else {
            let builder = ReqwestTransport::builder()
                .connect_timeout(config.connect_timeout)
                .read_timeout(config.read_timeout)
                .verify_ssl(config.verify_ssl)
                .user_agent(config.user_agent.clone());

            Arc::new(builder.build()?)
        };

        Ok(VwsClientImpl::new(config, transport))
    }
}

impl Default for VwsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

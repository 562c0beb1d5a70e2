//! VWS credentials management.
//!
//! A VWS database has two independent key pairs: a server pair with full
//! read/write access used for target management, and a client pair that may
//! only run recognition queries. [`KeyRole`] names the pair a provider serves.

mod env;

pub use env::EnvCredentialsProvider;

use crate::error::{CredentialsError, VwsError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Which VWS key pair a set of credentials belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Server access keys: target management.
    Server,
    /// Client access keys: recognition queries only.
    Client,
}

impl KeyRole {
    /// Lowercase name used in messages and environment variable prefixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyRole::Server => "server",
            KeyRole::Client => "client",
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A VWS access key / secret key pair.
#[derive(Clone)]
pub struct VwsCredentials {
    access_key: String,
    secret_key: SecretString,
}

impl VwsCredentials {
    /// Create a new credential pair.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::new(secret_key.into()),
        }
    }

    /// Get the access key.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Get the secret key.
    ///
    /// Note: This exposes the secret. It is only meant to key the HMAC.
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    fn validate(&self) -> Result<(), VwsError> {
        if self.access_key.is_empty() {
            return Err(VwsError::Credentials(CredentialsError::Invalid {
                message: "access key is empty".to_string(),
            }));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(VwsError::Credentials(CredentialsError::Invalid {
                message: "secret key is empty".to_string(),
            }));
        }
        Ok(())
    }
}

impl fmt::Debug for VwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VwsCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for credential providers.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Get credentials from this provider.
    async fn get_credentials(&self) -> Result<VwsCredentials, VwsError>;

    /// Provider name for logging/debugging.
    fn name(&self) -> &'static str;
}

/// Credentials supplied explicitly at construction time.
pub struct StaticCredentialsProvider {
    credentials: VwsCredentials,
}

impl StaticCredentialsProvider {
    /// Create a new static credentials provider.
    pub fn new(credentials: VwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn get_credentials(&self) -> Result<VwsCredentials, VwsError> {
        self.credentials.validate()?;
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

impl fmt::Debug for StaticCredentialsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialsProvider")
            .field("credentials", &self.credentials)
            .finish()
    }
}

//! Environment variable credentials provider.

use super::{CredentialsProvider, KeyRole, VwsCredentials};
use crate::error::{CredentialsError, VwsError};
use async_trait::async_trait;
use std::env;

/// Server access key variable.
pub const VWS_SERVER_ACCESS_KEY: &str = "VWS_SERVER_ACCESS_KEY";
/// Server secret key variable.
pub const VWS_SERVER_SECRET_KEY: &str = "VWS_SERVER_SECRET_KEY";
/// Client access key variable.
pub const VWS_CLIENT_ACCESS_KEY: &str = "VWS_CLIENT_ACCESS_KEY";
/// Client secret key variable.
pub const VWS_CLIENT_SECRET_KEY: &str = "VWS_CLIENT_SECRET_KEY";

/// Credentials provider that reads one key pair from environment variables.
///
/// By default the variables are `VWS_SERVER_ACCESS_KEY` / `VWS_SERVER_SECRET_KEY`
/// for [`KeyRole::Server`] and `VWS_CLIENT_ACCESS_KEY` / `VWS_CLIENT_SECRET_KEY`
/// for [`KeyRole::Client`]. Variables are read on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentialsProvider {
    access_key_var: String,
    secret_key_var: String,
}

impl EnvCredentialsProvider {
    /// Create a provider for the given key role using the default variable names.
    pub fn for_role(role: KeyRole) -> Self {
        let (access, secret) = match role {
            KeyRole::Server => (VWS_SERVER_ACCESS_KEY, VWS_SERVER_SECRET_KEY),
            KeyRole::Client => (VWS_CLIENT_ACCESS_KEY, VWS_CLIENT_SECRET_KEY),
        };
        Self::with_vars(access, secret)
    }

    /// Create a provider with custom variable names.
    pub fn with_vars(access_key_var: impl Into<String>, secret_key_var: impl Into<String>) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
        }
    }

    /// Returns true if both variables are present.
    pub fn is_available(&self) -> bool {
        env::var(&self.access_key_var).is_ok() && env::var(&self.secret_key_var).is_ok()
    }

    fn read(&self, var: &str) -> Result<String, VwsError> {
        let value = env::var(var).map_err(|_| {
            VwsError::Credentials(CredentialsError::NotFound {
                variable: var.to_string(),
            })
        })?;

        if value.is_empty() {
            return Err(VwsError::Credentials(CredentialsError::Invalid {
                message: format!("{} is empty", var),
            }));
        }

        Ok(value)
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn get_credentials(&self) -> Result<VwsCredentials, VwsError> {
        let access_key = self.read(&self.access_key_var)?;
        let secret_key = self.read(&self.secret_key_var)?;
        Ok(VwsCredentials::new(access_key, secret_key))
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let originals: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(*k).ok())).collect();

        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = f();

        for (key, original) in originals {
            match original {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        result
    }

    #[test]
    fn test_reads_custom_vars() {
        with_env_vars(
            &[
                ("VWS_TEST_ENV_ACCESS_A", "access-a"),
                ("VWS_TEST_ENV_SECRET_A", "secret-a"),
            ],
            || {
                let provider =
                    EnvCredentialsProvider::with_vars("VWS_TEST_ENV_ACCESS_A", "VWS_TEST_ENV_SECRET_A");
                assert!(provider.is_available());
                let creds = tokio_test::block_on(provider.get_credentials()).unwrap();
                assert_eq!(creds.access_key(), "access-a");
                assert_eq!(creds.secret_key(), "secret-a");
            },
        );
    }

    #[test]
    fn test_missing_var() {
        let provider =
            EnvCredentialsProvider::with_vars("VWS_TEST_ENV_ACCESS_MISSING", "VWS_TEST_ENV_SECRET_MISSING");
        assert!(!provider.is_available());
        let result = tokio_test::block_on(provider.get_credentials());
        match result {
            Err(VwsError::Credentials(CredentialsError::NotFound { variable })) => {
                assert_eq!(variable, "VWS_TEST_ENV_ACCESS_MISSING");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_var() {
        with_env_vars(
            &[
                ("VWS_TEST_ENV_ACCESS_B", "access-b"),
                ("VWS_TEST_ENV_SECRET_B", ""),
            ],
            || {
                let provider =
                    EnvCredentialsProvider::with_vars("VWS_TEST_ENV_ACCESS_B", "VWS_TEST_ENV_SECRET_B");
                let result = tokio_test::block_on(provider.get_credentials());
                assert!(matches!(
                    result,
                    Err(VwsError::Credentials(CredentialsError::Invalid { .. }))
                ));
            },
        );
    }

    #[test]
    fn test_role_defaults() {
        let server = EnvCredentialsProvider::for_role(KeyRole::Server);
        assert_eq!(server.access_key_var, VWS_SERVER_ACCESS_KEY);
        let client = EnvCredentialsProvider::for_role(KeyRole::Client);
        assert_eq!(client.secret_key_var, VWS_CLIENT_SECRET_KEY);
    }
}

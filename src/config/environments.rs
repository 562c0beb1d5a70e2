//! Named deployment environments.
//!
//! An environments file is a JSON object keyed by environment name:
//!
//! ```json
//! { "staging": { "query_url": "https://...", "provisioning_url": "https://..." } }
//! ```

use super::{PROVISIONING_URL, QUERY_URL};
use crate::error::{ConfigurationError, VwsError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the built-in environment.
pub const PRODUCTION: &str = "production";

/// File consulted when no environments file is given.
pub const DEFAULT_ENVIRONMENTS_FILE: &str = "environments.json";

/// Base URLs of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Environment {
    /// Recognition endpoint.
    pub query_url: String,
    /// Target management endpoint.
    pub provisioning_url: String,
}

impl Environment {
    /// The public Vuforia endpoints.
    pub fn production() -> Self {
        Self {
            query_url: QUERY_URL.to_string(),
            provisioning_url: PROVISIONING_URL.to_string(),
        }
    }
}

/// Look up an environment by name.
///
/// `production` never touches the file system.
pub fn resolve(name: &str, file: Option<&Path>) -> Result<Environment, VwsError> {
    if name == PRODUCTION {
        return Ok(Environment::production());
    }

    let path = file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENVIRONMENTS_FILE));
    let mut environments = load(&path).map_err(|message| unknown(name, message))?;

    environments
        .remove(name)
        .ok_or_else(|| unknown(name, format!("not defined in {}", path.display())))
}

fn load(path: &Path) -> Result<HashMap<String, Environment>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn unknown(name: &str, message: String) -> VwsError {
    VwsError::Configuration(ConfigurationError::UnknownEnvironment {
        name: name.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn environments_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_production_is_builtin() {
        let env = resolve(PRODUCTION, Some(Path::new("/nonexistent/environments.json"))).unwrap();
        assert_eq!(env, Environment::production());
        assert_eq!(env.provisioning_url, "https://vws.vuforia.com");
    }

    #[test]
    fn test_named_environment_from_file() {
        let file = environments_file(
            r#"{"staging": {"query_url": "https://q.staging.test", "provisioning_url": "https://p.staging.test"}}"#,
        );
        let env = resolve("staging", Some(file.path())).unwrap();
        assert_eq!(env.query_url, "https://q.staging.test");
        assert_eq!(env.provisioning_url, "https://p.staging.test");
    }

    #[test]
    fn test_missing_name() {
        let file = environments_file(r#"{}"#);
        let err = resolve("staging", Some(file.path())).unwrap_err();
        assert!(matches!(
            err,
            VwsError::Configuration(ConfigurationError::UnknownEnvironment { ref name, .. }) if name == "staging"
        ));
    }

    #[test]
    fn test_unparsable_file() {
        let file = environments_file("not json");
        assert!(resolve("staging", Some(file.path())).is_err());
    }
}

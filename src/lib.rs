//! Vuforia Web Services Integration Module
//!
//! Type-safe client for the Vuforia Web Services (VWS) cloud recognition API.
//!
//! # Features
//!
//! - **Target Management**: create, get, update, delete, list, summaries, duplicates
//! - **Cloud Recognition**: image queries against the recognition endpoint
//! - **VuMark**: instance generation for VuMark templates
//! - **VWS Signing**: HMAC-SHA1 request authentication
//! - **Key Separation**: server and client key pairs are never mixed
//!
//! Every call is a single signed request. A call succeeds only when the
//! status is 2xx *and* the body's `result_code` is the one the operation
//! expects; anything else is a [`VwsError`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vuforia_vws::{CreateTargetRequest, VwsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vuforia_vws::VwsError> {
//!     // Reads VWS_SERVER_ACCESS_KEY / VWS_SERVER_SECRET_KEY
//!     let client = vuforia_vws::create_client_from_env()?;
//!
//!     let image = std::fs::read("poster.jpg").expect("image");
//!     let created = client
//!         .targets()?
//!         .create(CreateTargetRequest::new("poster", image, 0.5))
//!         .await?;
//!
//!     println!("Created target {}", created.target_id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mocks;
pub mod multipart;
pub mod operations;
pub mod pipeline;
pub mod response;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::{VwsClient, VwsClientBuilder, VwsClientImpl};
pub use config::{VwsConfig, VwsConfigBuilder};
pub use credentials::{
    CredentialsProvider, EnvCredentialsProvider, KeyRole, StaticCredentialsProvider, VwsCredentials,
};
pub use error::{
    ConfigurationError, CredentialsError, ResultCode, TransportError, ValidationError, VwsError,
};
pub use operations::{Endpoint, Operation, RequestBody};
pub use response::ResultEnvelope;
pub use services::{PollPolicy, QueryService, TargetsService};
pub use signing::{HmacSigner, SignableRequest, VwsSigner};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    // Request types
    CreateTargetRequest,
    GenerateInstanceRequest,
    QueryRequest,
    UpdateTargetRequest,
    // Response types
    Acknowledged,
    DatabaseSummary,
    DuplicatesResponse,
    InstanceOutput,
    QueryMatch,
    QueryResponse,
    TargetCreated,
    TargetData,
    TargetList,
    TargetRecord,
    TargetRecordResponse,
    TargetSummary,
    // Common types
    IncludeTargetData,
    InstanceFormat,
    TargetStatus,
};

/// Create a new VWS client from environment variables.
///
/// This will attempt to read configuration from:
/// - `VWS_SERVER_ACCESS_KEY` / `VWS_SERVER_SECRET_KEY` for the server key pair
/// - `VWS_CLIENT_ACCESS_KEY` / `VWS_CLIENT_SECRET_KEY` for the client key pair
/// - `VWS_PROVISIONING_URL` / `VWS_QUERY_URL` for custom endpoints
/// - `VWS_ENVIRONMENT` / `VWS_ENVIRONMENTS_FILE` for named environments
/// - `VWS_CONNECT_TIMEOUT_MS` / `VWS_READ_TIMEOUT_MS` for timeouts
///
/// # Example
///
/// ```rust,no_run
/// let client = vuforia_vws::create_client_from_env()?;
/// # Ok::<(), vuforia_vws::VwsError>(())
/// ```
pub fn create_client_from_env() -> Result<impl VwsClient> {
    VwsClientBuilder::new().from_env().build()
}

/// Create a new VWS client with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use vuforia_vws::{VwsConfig, VwsCredentials};
///
/// let config = VwsConfig::builder()
///     .server_credentials(VwsCredentials::new("server-access-key", "server-secret-key"))
///     .build()?;
///
/// let client = vuforia_vws::create_client(config)?;
/// # Ok::<(), vuforia_vws::VwsError>(())
/// ```
pub fn create_client(config: VwsConfig) -> Result<impl VwsClient> {
    VwsClientBuilder::new().config(config).build()
}

/// Result type alias for VWS operations.
pub type Result<T> = std::result::Result<T, VwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        let _ = std::any::type_name::<VwsError>();
        let _ = std::any::type_name::<VwsConfig>();
        let _ = std::any::type_name::<VwsCredentials>();
        let _ = std::any::type_name::<CreateTargetRequest>();
        let _ = std::any::type_name::<QueryRequest>();
        let _ = std::any::type_name::<Operation>();
    }

    #[test]
    fn test_create_client_without_credentials() {
        let client = create_client(VwsConfig::default()).unwrap();
        assert!(client.targets().is_err());
        assert!(client.query().is_err());
    }
}

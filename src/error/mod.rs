//! Error types for the VWS integration.
//!
//! Errors are ordered by where they are detected: input validation happens
//! before any network I/O, transport failures surface while sending, and the
//! remaining kinds come out of response validation (HTTP status, body shape,
//! and finally the service `result_code`).

mod result_code;

pub use result_code::ResultCode;

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the VWS integration.
#[derive(Debug, Error)]
pub enum VwsError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Malformed input rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Network and connection failures.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-2xx status.
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, decoded lossily as UTF-8.
        body: String,
    },

    /// The service answered 2xx but the body is not a result envelope.
    #[error("Malformed response (status {status}): {details}")]
    MalformedResponse {
        /// HTTP status code.
        status: u16,
        /// Raw response body, decoded lossily as UTF-8.
        raw_body: String,
        /// What failed to parse.
        details: String,
    },

    /// A well-formed response whose `result_code` is not the expected token.
    #[error("Remote rejection: {result_code}")]
    RemoteRejection {
        /// The service result code, verbatim.
        result_code: String,
        /// Transaction ID reported by the service, if any.
        transaction_id: Option<String>,
        /// The full parsed response body.
        body: serde_json::Value,
    },
}

impl VwsError {
    /// Returns the HTTP status code if the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            VwsError::Http { status, .. } => Some(*status),
            VwsError::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the verbatim service result code for remote rejections.
    pub fn result_code(&self) -> Option<&str> {
        match self {
            VwsError::RemoteRejection { result_code, .. } => Some(result_code),
            _ => None,
        }
    }

    /// Returns the result code of a remote rejection as a [`ResultCode`].
    pub fn remote_code(&self) -> Option<ResultCode> {
        self.result_code().map(ResultCode::from)
    }

    /// Returns true if the request never left the client.
    pub fn is_validation(&self) -> bool {
        matches!(self, VwsError::Validation(_))
    }

    /// Returns true for network-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, VwsError::Transport(_))
    }

    /// Returns true if repeating the same call may succeed.
    ///
    /// The client never retries on its own; this is a hint for callers that
    /// implement their own policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            VwsError::Transport(e) => e.is_retryable(),
            VwsError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            VwsError::RemoteRejection { result_code, .. } => {
                ResultCode::from(result_code.as_str()).is_transient()
            }
            _ => false,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid base URL.
    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Details about the parse failure.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Named environment could not be resolved.
    #[error("Unknown environment '{name}': {message}")]
    UnknownEnvironment {
        /// Environment name.
        name: String,
        /// Why the lookup failed.
        message: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials were configured for the requested key role.
    #[error("No {role} credentials configured")]
    NotConfigured {
        /// The key role ("server" or "client").
        role: &'static str,
    },

    /// Credentials could not be found in the environment.
    #[error("Credentials not found: {variable} is not set")]
    NotFound {
        /// The missing environment variable.
        variable: String,
    },

    /// Credentials are present but unusable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why credentials are invalid.
        message: String,
    },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A content type was supplied for a request with no body.
    #[error("Content-Type '{content_type}' must not be set when the request body is empty")]
    ContentTypeWithoutBody {
        /// The offending content type.
        content_type: String,
    },

    /// A required field is missing or empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A field has a value the protocol cannot represent.
    #[error("Invalid field {field}: {message}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Why the value is invalid.
        message: String,
    },

    /// The request URL could not be built.
    #[error("Invalid request URL '{url}': {details}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parse failure details.
        details: String,
    },
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// The timeout that elapsed, when known.
        duration: Option<Duration>,
    },

    /// Connection could not be established or was dropped.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Details about the failure.
        message: String,
    },

    /// TLS setup or handshake failed.
    #[error("TLS error: {message}")]
    Tls {
        /// Details about the failure.
        message: String,
    },

    /// The response body could not be read.
    #[error("Failed to read response body: {message}")]
    BodyRead {
        /// Details about the failure.
        message: String,
    },
}

impl TransportError {
    /// Returns true if the failure is likely transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout { .. } | TransportError::ConnectionFailed { .. }
        )
    }
}

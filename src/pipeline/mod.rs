//! The build, sign, send, validate pipeline shared by every operation.

use crate::credentials::KeyRole;
use crate::error::{ConfigurationError, ValidationError, VwsError};
use crate::operations::Operation;
use crate::response::{self, ResultEnvelope};
use crate::signing::VwsSigner;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Sends operations to one base URL with one key pair.
pub struct RequestPipeline {
    base_url: Url,
    role: KeyRole,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn VwsSigner>,
}

impl RequestPipeline {
    /// Create a pipeline.
    ///
    /// `role` must be the key role `signer` was built for; operations that
    /// need the other key pair are refused.
    pub fn new(
        base_url: Url,
        role: KeyRole,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn VwsSigner>,
    ) -> Self {
        Self {
            base_url,
            role,
            transport,
            signer,
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The key role requests are signed with.
    pub fn role(&self) -> KeyRole {
        self.role
    }

    /// Validate, encode, sign and send an operation, returning the raw response.
    #[instrument(
        skip(self, operation),
        fields(
            operation = operation.name(),
            method = %operation.method(),
            path = %operation.path(),
            role = %self.role
        )
    )]
    pub async fn dispatch(&self, operation: &Operation) -> Result<HttpResponse, VwsError> {
        if operation.key_role() != self.role {
            return Err(VwsError::Configuration(ConfigurationError::InvalidConfiguration {
                field: "key_role".to_string(),
                message: format!(
                    "{} requires the {} key pair, this client signs with the {} key pair",
                    operation.name(),
                    operation.key_role(),
                    self.role
                ),
            }));
        }

        operation.validate()?;
        let body = operation.body()?;
        let url = self.build_url(&operation.path())?;
        let method = operation.method();

        let (content_type, bytes) = body.into_parts();
        let signed = self
            .signer
            .sign(
                method.as_str(),
                &url,
                content_type.as_deref(),
                bytes.as_deref(),
            )
            .await?;

        let mut request =
            HttpRequest::new(signed.method, signed.url.as_str()).with_headers(signed.headers);
        if let Some(accept) = operation.accept() {
            request = request.with_header("accept", accept);
        }
        if let Some(body) = signed.body {
            request = request.with_body(body);
        }

        let response = self.transport.send(request).await?;
        debug!(status = response.status, body_size = response.body.len(), "Received response");
        Ok(response)
    }

    /// Run an operation and validate its result code.
    pub async fn execute(&self, operation: &Operation) -> Result<ResultEnvelope, VwsError> {
        let response = self.dispatch(operation).await?;
        response::validate(&response, operation.expected_result_code())
    }

    fn build_url(&self, path: &str) -> Result<Url, VwsError> {
        let url_str = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&url_str).map_err(|e| {
            VwsError::Validation(ValidationError::InvalidUrl {
                url: url_str,
                details: e.to_string(),
            })
        })
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("base_url", &self.base_url.as_str())
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

//! Request signer backed by a credentials provider.

use super::*;
use crate::credentials::{CredentialsProvider, KeyRole};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// A signed request ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method, uppercase.
    pub method: String,
    /// Full request URL.
    pub url: Url,
    /// `date`, `authorization` and, for requests with a body, `content-type`.
    pub headers: HashMap<String, String>,
    /// Request body (if any).
    pub body: Option<Bytes>,
}

/// Trait for VWS request signers.
#[async_trait]
pub trait VwsSigner: Send + Sync {
    /// Sign a request, stamping it with the current time.
    ///
    /// `content_type` is the full wire value; it is reduced to its bare form
    /// for the signature only.
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, VwsError>;
}

/// HMAC-SHA1 signer for one VWS key pair.
pub struct HmacSigner {
    credentials_provider: Arc<dyn CredentialsProvider>,
    role: KeyRole,
}

impl HmacSigner {
    /// Create a new signer for the given key role.
    pub fn new(credentials_provider: Arc<dyn CredentialsProvider>, role: KeyRole) -> Self {
        Self {
            credentials_provider,
            role,
        }
    }

    /// The key role this signer uses.
    pub fn role(&self) -> KeyRole {
        self.role
    }

    /// Sign a request with an explicit timestamp.
    pub async fn sign_at(
        &self,
        method: &str,
        url: &Url,
        content_type: Option<&str>,
        body: Option<&[u8]>,
        timestamp: &DateTime<Utc>,
    ) -> Result<SignedRequest, VwsError> {
        let content_type = content_type.unwrap_or("");
        let body_bytes = body.unwrap_or(&[]);
        let date = format_http_date(timestamp);

        let signable = SignableRequest {
            method,
            path: url.path(),
            content_type,
            body: body_bytes,
            date: &date,
        };
        signable.validate()?;

        let credentials = self.credentials_provider.get_credentials().await?;
        let signature = sign(credentials.secret_key(), &signable)?;

        debug!(
            method = %method,
            path = %url.path(),
            content_type = %bare_content_type(content_type),
            body_size = body_bytes.len(),
            key_role = %self.role,
            "Signed request"
        );

        let mut headers = HashMap::new();
        headers.insert("date".to_string(), date);
        headers.insert(
            "authorization".to_string(),
            authorization_header(credentials.access_key(), &signature),
        );
        if !content_type.is_empty() {
            headers.insert("content-type".to_string(), content_type.to_string());
        }

        Ok(SignedRequest {
            method: method.to_uppercase(),
            url: url.clone(),
            headers,
            body: body.filter(|b| !b.is_empty()).map(Bytes::copy_from_slice),
        })
    }
}

#[async_trait]
impl VwsSigner for HmacSigner {
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, VwsError> {
        self.sign_at(method, url, content_type, body, &Utc::now()).await
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("role", &self.role)
            .field("provider", &self.credentials_provider.name())
            .finish_non_exhaustive()
    }
}

//! Mock signer for testing.

use crate::error::VwsError;
use crate::signing::{SignedRequest, VwsSigner};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Fixed `authorization` header produced by [`MockSigner`].
pub const MOCK_AUTHORIZATION: &str = "VWS mock-access-key:bW9jay1zaWduYXR1cmU=";

/// Fixed `date` header produced by [`MockSigner`].
pub const MOCK_DATE: &str = "Tue, 01 Jan 2019 00:00:00 GMT";

/// Recorded sign request.
#[derive(Debug, Clone)]
pub struct SignRequest {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: Url,
    /// Full content type, as passed in.
    pub content_type: Option<String>,
    /// Body size in bytes.
    pub body_len: usize,
}

/// Signer that stamps fixed headers and records its inputs.
pub struct MockSigner {
    headers: Mutex<HashMap<String, String>>,
    error: Mutex<Option<VwsError>>,
    sign_count: AtomicUsize,
    sign_requests: Mutex<Vec<SignRequest>>,
}

impl MockSigner {
    /// Create a new mock signer.
    pub fn new() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("authorization".to_string(), MOCK_AUTHORIZATION.to_string());
        default_headers.insert("date".to_string(), MOCK_DATE.to_string());

        Self {
            headers: Mutex::new(default_headers),
            error: Mutex::new(None),
            sign_count: AtomicUsize::new(0),
            sign_requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock signer whose next call fails.
    pub fn with_error(error: VwsError) -> Self {
        let signer = Self::new();
        signer.set_error(Some(error));
        signer
    }

    /// Set an error to return from the next call.
    pub fn set_error(&self, error: Option<VwsError>) {
        *self.error.lock() = error;
    }

    /// Get the number of sign calls.
    pub fn sign_count(&self) -> usize {
        self.sign_count.load(Ordering::Relaxed)
    }

    /// Get recorded sign requests.
    pub fn sign_requests(&self) -> Vec<SignRequest> {
        self.sign_requests.lock().clone()
    }

    /// Get the last sign request.
    pub fn last_sign_request(&self) -> Option<SignRequest> {
        self.sign_requests.lock().last().cloned()
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VwsSigner for MockSigner {
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        content_type: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, VwsError> {
        self.sign_count.fetch_add(1, Ordering::Relaxed);

        self.sign_requests.lock().push(SignRequest {
            method: method.to_string(),
            url: url.clone(),
            content_type: content_type.map(String::from),
            body_len: body.map_or(0, <[u8]>::len),
        });

        if let Some(error) = self.error.lock().take() {
            return Err(error);
        }

        let mut headers = self.headers.lock().clone();
        if let Some(content_type) = content_type.filter(|c| !c.is_empty()) {
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

impl std::fmt::Debug for MockSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSigner")
            .field("sign_count", &self.sign_count())
            .finish()
    }
}

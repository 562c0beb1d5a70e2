use crate::error::{ValidationError, VwsError};
use crate::multipart::MultipartForm;
use crate::types::QueryRequest;
use bytes::Bytes;
use serde::Serialize;

/// JSON content type.
pub const APPLICATION_JSON: &str = "application/json";

/// An encoded request body and the `Content-Type` sent with it on the wire.
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    content_type: Option<String>,
    bytes: Option<Bytes>,
}

impl RequestBody {
    /// No body and no content type.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compact JSON.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, VwsError> {
        let bytes = serde_json::to_vec(payload).map_err(|e| {
            VwsError::Validation(ValidationError::InvalidField {
                field: "body",
                message: e.to_string(),
            })
        })?;
        Ok(Self {
            content_type: Some(APPLICATION_JSON.to_string()),
            bytes: Some(Bytes::from(bytes)),
        })
    }

    /// An encoded multipart form.
    pub fn multipart(form: MultipartForm) -> Self {
        let content_type = form.content_type();
        Self {
            content_type: Some(content_type),
            bytes: Some(form.into_bytes()),
        }
    }

    pub(crate) fn query_form(request: &QueryRequest) -> Self {
        let form = MultipartForm::new()
            .file(
                "image",
                request.filename.clone(),
                "application/octet-stream",
                request.image.clone(),
            )
            .text("max_num_results", request.max_num_results.to_string())
            .text("include_target_data", request.include_target_data.as_str());
        Self::multipart(form)
    }

    /// Full content type, parameters included.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> Option<&Bytes> {
        self.bytes.as_ref()
    }

    /// Returns true if there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.bytes.as_ref().map_or(true, |b| b.is_empty())
    }

    /// Split into content type and bytes.
    pub fn into_parts(self) -> (Option<String>, Option<Bytes>) {
        (self.content_type, self.bytes)
    }
}

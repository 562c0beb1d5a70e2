//! Response validation.
//!
//! A VWS call succeeds only if all three checks pass, in this order:
//! the HTTP status is 2xx, the body is a JSON object carrying a string
//! `result_code`, and that code equals the token the operation expects.

use crate::error::VwsError;
use crate::transport::HttpResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// A validated response body.
#[derive(Debug, Clone)]
pub struct ResultEnvelope {
    /// HTTP status of the response.
    pub status: u16,
    /// The service result code.
    pub result_code: String,
    /// Transaction ID, if reported.
    pub transaction_id: Option<String>,
    /// The full parsed body, `result_code` included.
    pub body: Value,
}

impl ResultEnvelope {
    /// Decode the body into a typed response.
    ///
    /// A body that validated but does not match the expected shape is a
    /// protocol mismatch and surfaces as [`VwsError::MalformedResponse`].
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, VwsError> {
        let status = self.status;
        let raw_body = self.body.to_string();
        serde_json::from_value(self.body).map_err(|e| VwsError::MalformedResponse {
            status,
            raw_body,
            details: e.to_string(),
        })
    }
}

/// Validate a response against the result code an operation expects.
pub fn validate(response: &HttpResponse, expected_result_code: &str) -> Result<ResultEnvelope, VwsError> {
    check_status(response)?;

    let body: Value = serde_json::from_slice(&response.body).map_err(|e| {
        VwsError::MalformedResponse {
            status: response.status,
            raw_body: response.body_text(),
            details: e.to_string(),
        }
    })?;

    let result_code = match body.get("result_code").and_then(Value::as_str) {
        Some(code) => code.to_string(),
        None => {
            return Err(VwsError::MalformedResponse {
                status: response.status,
                raw_body: response.body_text(),
                details: "missing string field `result_code`".to_string(),
            })
        }
    };

    let transaction_id = body
        .get("transaction_id")
        .and_then(Value::as_str)
        .map(String::from);

    if result_code != expected_result_code {
        warn!(
            status = response.status,
            result_code = %result_code,
            expected = %expected_result_code,
            "Service rejected request"
        );
        return Err(VwsError::RemoteRejection {
            result_code,
            transaction_id,
            body,
        });
    }

    Ok(ResultEnvelope {
        status: response.status,
        result_code,
        transaction_id,
        body,
    })
}

/// Fail with [`VwsError::Http`] unless the status is 2xx.
pub fn check_status(response: &HttpResponse) -> Result<(), VwsError> {
    if response.is_success() {
        return Ok(());
    }

    warn!(status = response.status, "Service returned error status");
    Err(VwsError::Http {
        status: response.status,
        body: response.body_text(),
    })
}

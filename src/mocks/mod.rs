//! Mock implementations for testing.
//!
//! [`MockTransport`] replays canned responses and records what was sent;
//! [`MockSigner`] stamps fixed auth headers. [`TestFixtures`] holds response
//! bodies shaped like the service's.

mod signer;
mod transport;

pub use signer::{MockSigner, SignRequest, MOCK_AUTHORIZATION, MOCK_DATE};
pub use transport::{MockResponse, MockResponseBuilder, MockTransport};

use crate::credentials::VwsCredentials;
use crate::types::{CreateTargetRequest, QueryRequest};
use serde_json::json;

/// Test fixtures for VWS operations.
pub struct TestFixtures;

impl TestFixtures {
    /// Target ID used throughout the fixtures.
    pub const TARGET_ID: &'static str = "550e8400e29b41d4a716446655440000";

    /// Transaction ID used throughout the fixtures.
    pub const TRANSACTION_ID: &'static str = "e29b41d4a716446655440000";

    /// Sample server credentials.
    pub fn server_credentials() -> VwsCredentials {
        VwsCredentials::new("server-access-key", "server-secret-key")
    }

    /// Sample client credentials.
    pub fn client_credentials() -> VwsCredentials {
        VwsCredentials::new("client-access-key", "client-secret-key")
    }

    /// Minimal PNG signature bytes, enough to stand in for an image.
    pub fn sample_image() -> &'static [u8] {
        b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"
    }

    /// A create request without optional fields.
    pub fn sample_create_request() -> CreateTargetRequest {
        CreateTargetRequest::new("tarmac", Self::sample_image(), 320.0)
    }

    /// A query request with defaults.
    pub fn sample_query_request() -> QueryRequest {
        QueryRequest::new(Self::sample_image())
    }

    /// Body with only a result code and transaction ID.
    pub fn result_json(result_code: &str) -> String {
        json!({
            "result_code": result_code,
            "transaction_id": Self::TRANSACTION_ID,
        })
        .to_string()
    }

    /// Body of a successful create.
    pub fn target_created_json() -> String {
        json!({
            "result_code": "TargetCreated",
            "transaction_id": Self::TRANSACTION_ID,
            "target_id": Self::TARGET_ID,
        })
        .to_string()
    }

    /// Body of a successful get.
    pub fn target_record_json(status: &str) -> String {
        json!({
            "result_code": "Success",
            "transaction_id": Self::TRANSACTION_ID,
            "target_record": {
                "target_id": Self::TARGET_ID,
                "active_flag": true,
                "name": "tarmac",
                "width": 320.0,
                "tracking_rating": 4,
                "reco_rating": "",
            },
            "status": status,
        })
        .to_string()
    }

    /// Body of a successful list.
    pub fn target_list_json(ids: &[&str]) -> String {
        json!({
            "result_code": "Success",
            "transaction_id": Self::TRANSACTION_ID,
            "results": ids,
        })
        .to_string()
    }

    /// Body of a target summary with the given status.
    pub fn target_summary_json(status: &str) -> String {
        json!({
            "result_code": "Success",
            "transaction_id": Self::TRANSACTION_ID,
            "status": status,
            "database_name": "RecognitionDB",
            "target_name": "tarmac",
            "upload_date": "2019-01-01",
            "active_flag": true,
            "tracking_rating": if status == "success" { 4 } else { -1 },
            "total_recos": 0,
            "current_month_recos": 0,
            "previous_month_recos": 0,
        })
        .to_string()
    }

    /// Body of a database summary.
    pub fn database_summary_json() -> String {
        json!({
            "result_code": "Success",
            "transaction_id": Self::TRANSACTION_ID,
            "name": "RecognitionDB",
            "active_images": 2,
            "inactive_images": 0,
            "failed_images": 1,
            "processing_images": 0,
            "target_quota": 1000,
            "request_quota": 100000,
            "request_usage": 42,
            "reco_threshold": 1000,
            "total_recos": 7,
            "current_month_recos": 3,
            "previous_month_recos": 4,
        })
        .to_string()
    }

    /// Body of a duplicates response.
    pub fn duplicates_json(similar: &[&str]) -> String {
        json!({
            "result_code": "Success",
            "transaction_id": Self::TRANSACTION_ID,
            "similar_targets": similar,
        })
        .to_string()
    }

    /// Body of a query response matching [`Self::TARGET_ID`].
    pub fn query_match_json() -> String {
        json!({
            "result_code": "Success",
            "query_id": "f6b4b0c4a5f34a4bbf6e1c07f0b0c9e1",
            "results": [{
                "target_id": Self::TARGET_ID,
                "target_data": {
                    "name": "tarmac",
                    "application_metadata": "bWV0YQ==",
                    "target_timestamp": 1546300800,
                },
            }],
        })
        .to_string()
    }

    /// Body of a query response with no match.
    pub fn query_empty_json() -> String {
        json!({
            "result_code": "Success",
            "query_id": "0b0c9e1f6b4b0c4a5f34a4bbf6e1c07f",
            "results": [],
        })
        .to_string()
    }
}

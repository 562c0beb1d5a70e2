//! Typed success responses.
//!
//! Each type is decoded from a validated [`ResultEnvelope`](crate::response::ResultEnvelope).
//! Fields the service may omit are optional or defaulted so that new or
//! missing keys do not turn a success into an error.

use super::common::TargetStatus;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Response to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCreated {
    /// ID assigned to the new target.
    pub target_id: String,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Response to update or delete, which carry no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledged {
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Stored attributes of a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Target ID.
    pub target_id: String,
    /// Whether the target is active.
    #[serde(default)]
    pub active_flag: bool,
    /// Target name.
    pub name: String,
    /// Width in scene units.
    pub width: f64,
    /// Tracking rating, 0-5, or -1 while processing or on failure.
    #[serde(default)]
    pub tracking_rating: Option<i32>,
    /// Recognition rating, reserved by the service.
    #[serde(default)]
    pub reco_rating: Option<String>,
}

/// Response to get.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRecordResponse {
    /// The target record.
    pub target_record: TargetRecord,
    /// Processing status.
    #[serde(default)]
    pub status: TargetStatus,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Response to list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetList {
    /// IDs of every target in the database.
    #[serde(default)]
    pub results: Vec<String>,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Target summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSummary {
    /// Processing status.
    #[serde(default)]
    pub status: TargetStatus,
    /// Database the target belongs to.
    #[serde(default)]
    pub database_name: Option<String>,
    /// Target name.
    #[serde(default)]
    pub target_name: Option<String>,
    /// Upload date, `YYYY-MM-DD`.
    #[serde(default)]
    pub upload_date: Option<String>,
    /// Whether the target is active.
    #[serde(default)]
    pub active_flag: Option<bool>,
    /// Tracking rating.
    #[serde(default)]
    pub tracking_rating: Option<i32>,
    /// Total recognitions.
    #[serde(default)]
    pub total_recos: Option<u64>,
    /// Recognitions in the current month.
    #[serde(default)]
    pub current_month_recos: Option<u64>,
    /// Recognitions in the previous month.
    #[serde(default)]
    pub previous_month_recos: Option<u64>,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Database summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSummary {
    /// Database name.
    #[serde(default)]
    pub name: Option<String>,
    /// Number of active targets.
    #[serde(default)]
    pub active_images: Option<u64>,
    /// Number of inactive targets.
    #[serde(default)]
    pub inactive_images: Option<u64>,
    /// Number of targets that failed processing.
    #[serde(default)]
    pub failed_images: Option<u64>,
    /// Number of targets still processing.
    #[serde(default)]
    pub processing_images: Option<u64>,
    /// Target quota.
    #[serde(default)]
    pub target_quota: Option<u64>,
    /// Request quota.
    #[serde(default)]
    pub request_quota: Option<u64>,
    /// Requests used so far.
    #[serde(default)]
    pub request_usage: Option<u64>,
    /// Recognition quota.
    #[serde(default)]
    pub reco_threshold: Option<u64>,
    /// Total recognitions.
    #[serde(default)]
    pub total_recos: Option<u64>,
    /// Recognitions in the current month.
    #[serde(default)]
    pub current_month_recos: Option<u64>,
    /// Recognitions in the previous month.
    #[serde(default)]
    pub previous_month_recos: Option<u64>,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Response to duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicatesResponse {
    /// IDs of targets similar to the given one.
    #[serde(default)]
    pub similar_targets: Vec<String>,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Target data attached to a query match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetData {
    /// Target name.
    #[serde(default)]
    pub name: Option<String>,
    /// Base64 application metadata.
    #[serde(default)]
    pub application_metadata: Option<String>,
    /// Last modification time, seconds since the epoch.
    #[serde(default)]
    pub target_timestamp: Option<i64>,
}

/// One recognized target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    /// Matched target ID.
    pub target_id: String,
    /// Target data, depending on `include_target_data`.
    #[serde(default)]
    pub target_data: Option<TargetData>,
}

/// Response to a recognition query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Matches, best first. Empty when nothing was recognized.
    #[serde(default)]
    pub results: Vec<QueryMatch>,
    /// Query ID.
    #[serde(default)]
    pub query_id: Option<String>,
    /// Transaction ID.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl QueryResponse {
    /// The best match, if any.
    pub fn best_match(&self) -> Option<&QueryMatch> {
        self.results.first()
    }
}

/// A rendered VuMark instance.
#[derive(Debug, Clone)]
pub struct InstanceOutput {
    /// Content type reported by the service.
    pub content_type: Option<String>,
    /// Rendered bytes.
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_record_response() {
        let value = json!({
            "result_code": "Success",
            "transaction_id": "e29b41d4a716446655440000",
            "target_record": {
                "target_id": "550e8400e29b41d4a716446655440000",
                "active_flag": true,
                "name": "tarmac",
                "width": 100.0,
                "tracking_rating": 4,
                "reco_rating": ""
            },
            "status": "success"
        });
        let response: TargetRecordResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.target_record.name, "tarmac");
        assert_eq!(response.target_record.tracking_rating, Some(4));
        assert_eq!(response.status, TargetStatus::Success);
    }

    #[test]
    fn test_query_response_empty_results() {
        let value = json!({
            "result_code": "Success",
            "query_id": "q-1",
            "results": []
        });
        let response: QueryResponse = serde_json::from_value(value).unwrap();
        assert!(response.results.is_empty());
        assert!(response.best_match().is_none());
    }

    #[test]
    fn test_query_response_with_target_data() {
        let value = json!({
            "result_code": "Success",
            "results": [
                {
                    "target_id": "t-1",
                    "target_data": {
                        "name": "poster",
                        "application_metadata": "bWV0YQ==",
                        "target_timestamp": 1546300800
                    }
                },
                { "target_id": "t-2" }
            ]
        });
        let response: QueryResponse = serde_json::from_value(value).unwrap();
        let best = response.best_match().unwrap();
        assert_eq!(best.target_id, "t-1");
        assert_eq!(
            best.target_data.as_ref().and_then(|d| d.name.as_deref()),
            Some("poster")
        );
        assert!(response.results[1].target_data.is_none());
    }

    #[test]
    fn test_summary_tolerates_missing_fields() {
        let summary: TargetSummary =
            serde_json::from_value(json!({"result_code": "Success", "status": "processing"})).unwrap();
        assert_eq!(summary.status, TargetStatus::Processing);
        assert!(summary.tracking_rating.is_none());
    }
}

//! Tests for the targets service.

use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use vuforia_vws::mocks::{MockResponse, MockTransport, TestFixtures};
use vuforia_vws::*;

fn create_test_service_with_transport(transport: Arc<MockTransport>) -> TargetsService {
    let config = Arc::new(
        VwsConfig::builder()
            .provisioning_url("https://vws.example.com")
            .unwrap()
            .build()
            .unwrap(),
    );
    let provider = Arc::new(StaticCredentialsProvider::new(TestFixtures::server_credentials()));
    let signer = Arc::new(HmacSigner::new(provider, KeyRole::Server));
    TargetsService::new(config, transport, signer)
}

fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_ref().unwrap()).unwrap()
}

#[tokio::test]
async fn test_create_target() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::created(TestFixtures::target_created_json()));

    let service = create_test_service_with_transport(transport.clone());
    let created = service.create(TestFixtures::sample_create_request()).await.unwrap();

    assert_eq!(created.target_id, TestFixtures::TARGET_ID);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "https://vws.example.com/targets");
    assert_eq!(request.get_header("content-type"), Some("application/json"));
    assert!(request.get_header("date").unwrap().ends_with(" GMT"));
    assert!(request
        .get_header("authorization")
        .unwrap()
        .starts_with("VWS server-access-key:"));
}

#[tokio::test]
async fn test_create_payload_has_only_required_fields() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::created(
        TestFixtures::target_created_json(),
    )));
    let service = create_test_service_with_transport(transport.clone());

    service.create(TestFixtures::sample_create_request()).await.unwrap();

    let body = body_json(&transport.last_request().unwrap());
    let mut keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["image", "name", "width"]);
}

#[tokio::test]
async fn test_create_with_optional_fields() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::created(
        TestFixtures::target_created_json(),
    )));
    let service = create_test_service_with_transport(transport.clone());

    let request = TestFixtures::sample_create_request()
        .with_metadata("bWV0YQ==")
        .with_active(false);
    service.create(request).await.unwrap();

    let body = body_json(&transport.last_request().unwrap());
    assert_eq!(body["application_metadata"], "bWV0YQ==");
    assert_eq!(body["active_flag"], false);
}

#[tokio::test]
async fn test_create_rejects_success_code() {
    // Only TargetCreated means a target was created
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::result_json("Success")));

    let service = create_test_service_with_transport(transport);
    let err = service.create(TestFixtures::sample_create_request()).await.unwrap_err();

    assert_eq!(err.result_code(), Some("Success"));
}

#[tokio::test]
async fn test_create_invalid_input_not_sent() {
    let transport = Arc::new(MockTransport::new());
    let service = create_test_service_with_transport(transport.clone());

    let err = service
        .create(CreateTargetRequest::new("box", Bytes::new(), 1.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_target_id_that_escapes_its_segment_not_sent() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::json(
        TestFixtures::result_json("Success"),
    )));
    let service = create_test_service_with_transport(transport.clone());

    for id in ["..", ".", "a\\b", "..\\summary", "../summary"] {
        let err = service.delete(id).await.unwrap_err();
        assert!(err.is_validation(), "{:?} was not rejected", id);
    }
    assert!(service.target_summary("..").await.unwrap_err().is_validation());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_get_target() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::target_record_json("success")));

    let service = create_test_service_with_transport(transport.clone());
    let response = service.get(TestFixtures::TARGET_ID).await.unwrap();

    assert_eq!(response.target_record.name, "tarmac");
    assert_eq!(response.status, TargetStatus::Success);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.url,
        format!("https://vws.example.com/targets/{}", TestFixtures::TARGET_ID)
    );
    assert!(request.body.is_none());
    assert!(request.get_header("content-type").is_none());
}

#[tokio::test]
async fn test_get_unknown_target_is_rejection() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(r#"{"result_code": "UnknownTarget"}"#));

    let service = create_test_service_with_transport(transport);
    let err = service.get("missing").await.unwrap_err();

    match &err {
        VwsError::RemoteRejection { result_code, .. } => assert_eq!(result_code, "UnknownTarget"),
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.remote_code(), Some(ResultCode::UnknownTarget));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_get_with_created_code_is_rejection() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::target_created_json()));

    let service = create_test_service_with_transport(transport);
    let err = service.get(TestFixtures::TARGET_ID).await.unwrap_err();

    assert_eq!(err.result_code(), Some("TargetCreated"));
}

#[tokio::test]
async fn test_update_sends_only_set_fields() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::result_json("Success")));

    let service = create_test_service_with_transport(transport.clone());
    let ack = service
        .update(
            TestFixtures::TARGET_ID,
            UpdateTargetRequest::new().with_active(false),
        )
        .await
        .unwrap();

    assert_eq!(ack.transaction_id.as_deref(), Some(TestFixtures::TRANSACTION_ID));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(body_json(&request), serde_json::json!({"active_flag": false}));
}

#[tokio::test]
async fn test_empty_update_is_forwarded() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::result_json("Success")));

    let service = create_test_service_with_transport(transport.clone());
    service
        .update(TestFixtures::TARGET_ID, UpdateTargetRequest::new())
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.body, Some(Bytes::from_static(b"{}")));
    assert_eq!(request.get_header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_delete_target() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::result_json("Success")));

    let service = create_test_service_with_transport(transport.clone());
    service.delete(TestFixtures::TARGET_ID).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "DELETE");
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_delete_surfaces_service_response_verbatim() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::error(404, TestFixtures::result_json("UnknownTarget")));

    let service = create_test_service_with_transport(transport);
    let err = service.delete(TestFixtures::TARGET_ID).await.unwrap_err();

    match err {
        VwsError::Http { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("UnknownTarget"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_list_targets() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::target_list_json(&["a", "b"])));

    let service = create_test_service_with_transport(transport.clone());
    let list = service.list().await.unwrap();

    assert_eq!(list.results, vec!["a", "b"]);
    assert_eq!(transport.last_request().unwrap().url, "https://vws.example.com/targets");
}

#[tokio::test]
async fn test_target_summary() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::target_summary_json("processing")));

    let service = create_test_service_with_transport(transport.clone());
    let summary = service.target_summary(TestFixtures::TARGET_ID).await.unwrap();

    assert_eq!(summary.status, TargetStatus::Processing);
    assert_eq!(summary.tracking_rating, Some(-1));
    assert_eq!(
        transport.last_request().unwrap().url,
        format!("https://vws.example.com/summary/{}", TestFixtures::TARGET_ID)
    );
}

#[tokio::test]
async fn test_database_summary() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::database_summary_json()));

    let service = create_test_service_with_transport(transport.clone());
    let summary = service.database_summary().await.unwrap();

    assert_eq!(summary.name.as_deref(), Some("RecognitionDB"));
    assert_eq!(summary.failed_images, Some(1));
    assert_eq!(transport.last_request().unwrap().url, "https://vws.example.com/summary");
}

#[tokio::test]
async fn test_duplicates() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::json(TestFixtures::duplicates_json(&["dup-1"])));

    let service = create_test_service_with_transport(transport.clone());
    let duplicates = service.duplicates(TestFixtures::TARGET_ID).await.unwrap();

    assert_eq!(duplicates.similar_targets, vec!["dup-1"]);
    assert!(transport
        .last_request()
        .unwrap()
        .url
        .ends_with(&format!("/duplicates/{}", TestFixtures::TARGET_ID)));
}

#[tokio::test]
async fn test_malformed_success_body() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::ok_with_body("<html>maintenance</html>"));

    let service = create_test_service_with_transport(transport);
    let err = service.list().await.unwrap_err();

    assert!(matches!(err, VwsError::MalformedResponse { status: 200, .. }));
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let transport = Arc::new(MockTransport::new());
    let service = create_test_service_with_transport(transport);

    let err = service.list().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_generate_instance() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(
        MockResponse::ok_with_body(&b"<svg/>"[..]).with_header("content-type", "image/svg+xml"),
    );

    let service = create_test_service_with_transport(transport.clone());
    let instance = service
        .generate_instance("vumark-template", GenerateInstanceRequest::new("0042"))
        .await
        .unwrap();

    assert_eq!(instance.data, Bytes::from_static(b"<svg/>"));
    assert_eq!(instance.content_type.as_deref(), Some("image/svg+xml"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "https://vws.example.com/targets/vumark-template/instances");
    assert_eq!(request.get_header("accept"), Some("image/svg+xml"));
    assert_eq!(body_json(&request), serde_json::json!({"instance_id": "0042"}));
}

#[tokio::test]
async fn test_generate_instance_error_status() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_response(MockResponse::error(422, TestFixtures::result_json("InvalidInstanceId")));

    let service = create_test_service_with_transport(transport);
    let err = service
        .generate_instance("vumark-template", GenerateInstanceRequest::new("zz"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(422));
}

#[tokio::test]
async fn test_poll_until_processed_stops_when_settled() {
    let transport = Arc::new(
        MockTransport::builder()
            .respond(MockResponse::json(TestFixtures::target_summary_json("processing")))
            .respond(MockResponse::json(TestFixtures::target_summary_json("processing")))
            .respond(MockResponse::json(TestFixtures::target_summary_json("success")))
            .build(),
    );

    let service = create_test_service_with_transport(transport.clone());
    let summary = service
        .poll_until_processed(
            TestFixtures::TARGET_ID,
            PollPolicy::new(Duration::from_millis(1), 10),
        )
        .await
        .unwrap();

    assert_eq!(summary.status, TargetStatus::Success);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_poll_until_processed_returns_last_summary_when_exhausted() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::json(
        TestFixtures::target_summary_json("processing"),
    )));

    let service = create_test_service_with_transport(transport.clone());
    let summary = service
        .poll_until_processed(
            TestFixtures::TARGET_ID,
            PollPolicy::new(Duration::from_millis(1), 3),
        )
        .await
        .unwrap();

    assert_eq!(summary.status, TargetStatus::Processing);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_poll_until_processed_stops_on_error() {
    let transport = Arc::new(
        MockTransport::builder()
            .respond(MockResponse::json(TestFixtures::target_summary_json("processing")))
            .respond(MockResponse::json(TestFixtures::result_json("UnknownTarget")))
            .build(),
    );

    let service = create_test_service_with_transport(transport.clone());
    let err = service
        .poll_until_processed(
            TestFixtures::TARGET_ID,
            PollPolicy::new(Duration::from_millis(1), 10),
        )
        .await
        .unwrap_err();

    assert_eq!(err.result_code(), Some("UnknownTarget"));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_poll_requires_an_attempt() {
    let service = create_test_service_with_transport(Arc::new(MockTransport::new()));
    let err = service
        .poll_until_processed("t", PollPolicy::new(Duration::from_millis(1), 0))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_concurrent_reports() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::json(
        TestFixtures::target_summary_json("success"),
    )));
    let service = create_test_service_with_transport(transport.clone());

    let ids = ["t1", "t2", "t3", "t4"];
    let results = futures::future::join_all(ids.iter().map(|id| service.target_summary(id))).await;

    assert!(results.iter().all(|r| r.is_ok()));
    let mut urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    urls.sort();
    assert_eq!(
        urls,
        ids.iter()
            .map(|id| format!("https://vws.example.com/summary/{}", id))
            .collect::<Vec<_>>()
    );
}

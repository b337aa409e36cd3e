#![allow(clippy::unwrap_used)]
// Integration tests for `ConsoleClient` using wiremock.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dialdeck_api::{
    CallStatus, CampaignCreate, CampaignStatus, ConsoleClient, Error, RetryConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ConsoleClient) {
    let server = MockServer::start().await;
    let client = ConsoleClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn campaign_body(id: Uuid, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "test campaign",
        "status": status,
        "concurrencyLimit": 10,
        "priority": 5,
        "retryConfig": {
            "maxRetries": 3,
            "syncInitialBackoffMs": 1000,
            "syncBackoffMultiplier": 2.0,
            "callbackRetryDelayMs": 30000,
            "callbackTimeoutMs": 120000
        },
        "businessHours": null,
        "metrics": {
            "totalCalls": 100,
            "pendingCalls": 60,
            "inProgressCalls": 10,
            "completedCalls": 25,
            "failedCalls": 5,
            "permanentlyFailedCalls": 0,
            "totalRetries": 12
        }
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_campaigns() {
    let (server, client) = setup().await;

    let id_a = Uuid::new_v4();
    let id_b = Uuid::new_v4();
    let body = json!([
        campaign_body(id_a, "Alpha", "PENDING"),
        campaign_body(id_b, "Beta", "IN_PROGRESS"),
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v1/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let campaigns = client.list_campaigns().await.unwrap();

    assert_eq!(campaigns.len(), 2);
    assert_eq!(campaigns[0].id, id_a);
    assert_eq!(campaigns[0].status, CampaignStatus::Pending);
    assert_eq!(campaigns[1].name, "Beta");
    assert_eq!(campaigns[1].metrics.total_calls, 100);
}

#[tokio::test]
async fn test_global_metrics() {
    let (server, client) = setup().await;

    let body = json!({
        "totalCampaigns": 4,
        "activeCampaigns": 2,
        "completedCampaigns": 1,
        "totalCalls": 5000,
        "pendingCalls": 1200,
        "inProgressCalls": 40,
        "completedCalls": 3600,
        "failedCalls": 150,
        "permanentlyFailedCalls": 10,
        "totalRetries": 320,
        "workerPoolSize": 20,
        "activeWorkerThreads": 14,
        "workerThreadUtilizationPercent": 70.0,
        "queueDepth": 35,
        "totalConcurrencySlots": 80,
        "activeConcurrencySlots": 40,
        "concurrencyUtilizationPercent": 50.0,
        "callsPerSecond": 3.2,
        "avgCallDurationSeconds": 6.5
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let metrics = client.global_metrics().await.unwrap();

    assert_eq!(metrics.total_campaigns, 4);
    assert_eq!(metrics.queue_depth, 35);
    assert!((metrics.calls_per_second - 3.2).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_create_campaign_sends_contract_shape() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();
    let req = CampaignCreate {
        name: "Launch".into(),
        description: Some("spring launch".into()),
        phone_numbers: vec!["+15551230001".into(), "+15551230002".into()],
        concurrency_limit: 10,
        priority: 5,
        retry_config: RetryConfig::default(),
        business_hours: None,
    };

    // The exact JSON the backend must see — camelCase, no businessHours key.
    let expected = json!({
        "name": "Launch",
        "description": "spring launch",
        "phoneNumbers": ["+15551230001", "+15551230002"],
        "concurrencyLimit": 10,
        "priority": 5,
        "retryConfig": {
            "maxRetries": 3,
            "syncInitialBackoffMs": 1000,
            "syncBackoffMultiplier": 2.0,
            "callbackRetryDelayMs": 30000,
            "callbackTimeoutMs": 120000
        }
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/campaigns"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(campaign_body(id, "Launch", "PENDING")))
        .mount(&server)
        .await;

    let created = client.create_campaign(&req).await.unwrap();
    assert_eq!(created.id, id);
    assert_eq!(created.status, CampaignStatus::Pending);
}

#[tokio::test]
async fn test_start_campaign_returns_updated_record() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/campaigns/{id}/start")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(campaign_body(id, "Alpha", "IN_PROGRESS")),
        )
        .mount(&server)
        .await;

    let updated = client.start_campaign(id).await.unwrap();
    assert_eq!(updated.status, CampaignStatus::InProgress);
}

#[tokio::test]
async fn test_list_calls_with_filter() {
    let (server, client) = setup().await;

    let campaign_id = Uuid::new_v4();
    let call_id = Uuid::new_v4();
    let body = json!([{
        "id": call_id,
        "campaignId": campaign_id,
        "phoneNumber": "+15551234567",
        "status": "FAILED",
        "retryCount": 2,
        "lastAttemptedAt": "2024-03-01T12:00:00Z",
        "failureReason": "NO_ANSWER",
        "callDurationSeconds": null
    }]);

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/campaigns/{campaign_id}/calls")))
        .and(query_param("page", "2"))
        .and(query_param("size", "50"))
        .and(query_param("status", "FAILED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let calls = client
        .list_calls(campaign_id, 2, 50, Some(CallStatus::Failed))
        .await
        .unwrap();

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].status, CallStatus::Failed);
    assert_eq!(calls[0].retry_count, 2);
    assert_eq!(calls[0].failure_reason.as_deref(), Some("NO_ANSWER"));
}

#[tokio::test]
async fn test_list_calls_omits_status_for_all_filter() {
    let (server, client) = setup().await;

    let campaign_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/campaigns/{campaign_id}/calls")))
        .and(query_param("page", "0"))
        .and(query_param("size", "50"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let calls = client.list_calls(campaign_id, 0, 50, None).await.unwrap();
    assert!(calls.is_empty());
}

#[tokio::test]
async fn test_trigger_call() {
    let (server, client) = setup().await;

    let call_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/api/v1/calls"))
        .and(body_json(json!({ "phoneNumber": "+15559876543" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": call_id,
            "phoneNumber": "+15559876543",
            "status": "PENDING",
            "retryCount": 0
        })))
        .mount(&server)
        .await;

    let call = client.trigger_call("+15559876543").await.unwrap();
    assert_eq!(call.id, call_id);
    assert_eq!(call.status, CallStatus::Pending);
}

#[tokio::test]
async fn test_import_numbers_batch() {
    let (server, client) = setup().await;

    let campaign_id = Uuid::new_v4();
    let numbers = vec!["+15551110001".to_owned(), "+15551110002".to_owned()];

    Mock::given(method("POST"))
        .and(path(format!("/api/v1/campaigns/{campaign_id}/import/batch")))
        .and(body_json(json!({
            "phoneNumbers": ["+15551110001", "+15551110002"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalReceived": 2,
            "totalImported": 2,
            "duplicatesSkipped": 0,
            "invalidSkipped": 0,
            "status": "COMPLETED"
        })))
        .mount(&server)
        .await;

    let result = client
        .import_numbers_batch(campaign_id, &numbers)
        .await
        .unwrap();
    assert_eq!(result.total_imported, 2);
    assert_eq!(result.status, "COMPLETED");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_404_carries_body_message() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/campaigns/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Campaign not found"))
        .mount(&server)
        .await;

    let result = client.get_campaign(id).await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Campaign not found");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_error_500_empty_body_uses_canonical_reason() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_campaigns().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(result.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_error_rejected_transition_surfaces_as_api_error() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/campaigns/{id}/pause")))
        .respond_with(
            ResponseTemplate::new(409).set_body_string("Cannot pause a COMPLETED campaign"),
        )
        .mount(&server)
        .await;

    let result = client.pause_campaign(id).await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 409);
            assert!(message.contains("COMPLETED"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_campaigns().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

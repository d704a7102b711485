//! Manufacturing API client against a wiremock server
//!
//! The plant service answers `GET /{route}/{id}` with JSON and reports bad ids
//! through an `error` field, sometimes with a non-2xx status.

use loader_controller::api::{ApiError, Endpoint, HttpManufacturingApi, ManufacturingApi, WorkOrderInfo};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn api_for(server: &MockServer) -> HttpManufacturingApi {
    HttpManufacturingApi::new(&server.uri(), Duration::from_secs(1)).unwrap()
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_work_order_lookup() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/wo/9934386",
        ResponseTemplate::new(200).set_body_json(json!({"error": false, "press": "136", "rmat": "4455"})),
    )
    .await;

    let info = api_for(&server).await.work_order("9934386").await.unwrap();

    assert_eq!(
        info,
        WorkOrderInfo {
            press: "136".to_string(),
            raw_material: "4455".to_string()
        }
    );
}

#[tokio::test]
async fn test_truthy_error_field_is_a_rejection() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/wo/1111",
        ResponseTemplate::new(200).set_body_json(json!({"error": "Work order not found"})),
    )
    .await;

    let err = api_for(&server).await.work_order("1111").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            endpoint: Endpoint::WorkOrder,
            id: "1111".to_string()
        }
    );
    assert!(err.is_rejection());
}

#[tokio::test]
async fn test_error_body_is_read_whatever_the_status() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/serial/00000000",
        ResponseTemplate::new(404).set_body_json(json!({"error": true})),
    )
    .await;

    let err = api_for(&server).await.serial("00000000").await.unwrap_err();

    assert!(err.is_rejection());
}

#[tokio::test]
async fn test_falsy_error_values_are_not_rejections() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/serial/07234585",
        ResponseTemplate::new(200).set_body_json(json!({"error": "", "itemno": "4455"})),
    )
    .await;

    let info = api_for(&server).await.serial("07234585").await.unwrap();

    assert_eq!(info.item_number, "4455");
}

#[tokio::test]
async fn test_missing_field_is_not_a_rejection() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/wo/9934386",
        ResponseTemplate::new(200).set_body_json(json!({"error": false, "press": "136"})),
    )
    .await;

    let err = api_for(&server).await.work_order("9934386").await.unwrap_err();

    assert!(matches!(err, ApiError::MissingField { field: "rmat", .. }));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn test_html_error_page_is_a_decode_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/wo/9934386",
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;

    let err = api_for(&server).await.work_order("9934386").await.unwrap_err();

    match err {
        ApiError::Decode { message, .. } => assert!(message.contains("502")),
        other => panic!("expected decode failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_monitor_reports_current_work_order() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/wo_monitor/9934386",
        ResponseTemplate::new(200).set_body_json(json!({"error": 0, "wo_id": "9940001"})),
    )
    .await;

    let current = api_for(&server)
        .await
        .current_work_order("9934386")
        .await
        .unwrap();

    assert_eq!(current, "9940001");
}

#[tokio::test]
async fn test_ids_are_sent_as_one_path_segment() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/serial/12%2F34",
        ResponseTemplate::new(200).set_body_json(json!({"itemno": "4455"})),
    )
    .await;

    let info = api_for(&server).await.serial("12/34").await.unwrap();

    assert_eq!(info.item_number, "4455");
}

#[tokio::test]
async fn test_slow_service_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wo/9934386"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"press": "136", "rmat": "4455"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).await.work_order("9934386").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_failure() {
    // Nothing listens on the discard port
    let api = HttpManufacturingApi::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

    let err = api.work_order("9934386").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}

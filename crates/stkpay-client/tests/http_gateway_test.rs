//! Contract tests for HttpGateway and the tracker against a wiremock gateway.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/api/v1/payments/stk-push` | `initiate_*` |
//! | POST   | `/api/v1/subscriptions/{product}/stk-push` | `flow_*` |
//! | GET    | `/api/v1/payments/{id}/status` | `status_*`, `tracker_*` |

use std::time::Duration;

use serde_json::json;
use stkpay_client::{
    CancelToken, GatewayConfig, GatewayError, HttpGateway, PaymentGateway, PaymentTracker,
    TrackerOptions,
};
use stkpay_core::{CheckoutFlow, Msisdn, Outcome, PaymentId, PaymentStatus, TrackerState};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GatewayConfig {
    GatewayConfig::new(server.uri().parse().unwrap())
}

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(config(server)).unwrap()
}

fn fast() -> TrackerOptions {
    TrackerOptions::default().with_poll_interval(Duration::from_millis(5))
}

fn msisdn() -> Msisdn {
    Msisdn::parse("0712345678").unwrap()
}

async fn mount_status_once(server: &MockServer, id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/payments/{id}/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"status": status}})))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

// ── POST initiate ────────────────────────────────────────────────────

#[tokio::test]
async fn initiate_sends_normalized_number_and_unwraps_double_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/payments/stk-push"))
        .and(body_json(json!({"phoneNumber": "254712345678"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"data": {"data": {"paymentId": "ws_CO_001"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = gateway(&server).initiate_charge(&msisdn()).await.unwrap();
    assert_eq!(handle.payment_id.as_str(), "ws_CO_001");
}

#[tokio::test]
async fn initiate_unwraps_single_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/payments/stk-push"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"paymentId": "p-2"}})))
        .mount(&server)
        .await;

    let handle = gateway(&server).initiate_charge(&msisdn()).await.unwrap();
    assert_eq!(handle.payment_id.as_str(), "p-2");
}

#[tokio::test]
async fn initiate_sends_bearer_token_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paymentId": "p-3"})))
        .expect(1)
        .mount(&server)
        .await;

    let gw = HttpGateway::new(config(&server).with_token("test-token")).unwrap();
    assert!(gw.initiate_charge(&msisdn()).await.is_ok());
}

#[tokio::test]
async fn initiate_without_payment_id_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"data": {}}})))
        .mount(&server)
        .await;

    let result = gateway(&server).initiate_charge(&msisdn()).await;
    assert!(matches!(result, Err(GatewayError::MissingPaymentId { .. })));
}

#[tokio::test]
async fn initiate_without_payment_id_surfaces_gateway_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/payments/stk-push"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"data": {"success": false, "message": "Subscriber not registered for M-Pesa"}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway(&server).initiate_charge(&msisdn()).await.unwrap_err();
    assert_eq!(
        err.upstream_message().as_deref(),
        Some("Subscriber not registered for M-Pesa")
    );

    let outcome = PaymentTracker::new(gateway(&server))
        .with_options(fast())
        .initiate_and_track("0712345678")
        .await;
    assert_eq!(
        outcome,
        Outcome::initiation_error("Subscriber not registered for M-Pesa")
    );
}

#[tokio::test]
async fn status_id_with_spaces_is_path_escaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/payments/ws%20CO%201/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"status": "PENDING"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = PaymentId::new("ws CO 1").unwrap();
    let status = gateway(&server).payment_status(&id).await.unwrap();
    assert_eq!(status, PaymentStatus::Pending);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/api/v1/payments/ws%20CO%201/status");
}

#[tokio::test]
async fn initiate_maps_api_error_with_upstream_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid phone number"})),
        )
        .mount(&server)
        .await;

    let err = gateway(&server).initiate_charge(&msisdn()).await.unwrap_err();
    match &err {
        GatewayError::Api { status, .. } => assert_eq!(*status, 400),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.upstream_message().as_deref(), Some("Invalid phone number"));
}

#[tokio::test]
async fn initiate_maps_non_json_body_to_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let result = gateway(&server).initiate_charge(&msisdn()).await;
    assert!(matches!(result, Err(GatewayError::Deserialization { .. })));
}

#[tokio::test]
async fn initiate_against_closed_port_is_transport_error() {
    let gw = HttpGateway::new(GatewayConfig::local(1).unwrap()).unwrap();
    let result = gw.initiate_charge(&msisdn()).await;
    assert!(matches!(result, Err(GatewayError::Http { .. })));
}

#[tokio::test]
async fn flow_binds_product_initiate_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/subscriptions/vip/stk-push"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"paymentId": "vip-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let flow = CheckoutFlow::new("vip", "/api/v1/subscriptions/vip/stk-push", "/vip", false);
    let gw = HttpGateway::for_flow(config(&server), &flow).unwrap();
    let handle = gw.initiate_charge(&msisdn()).await.unwrap();
    assert_eq!(handle.payment_id.as_str(), "vip-1");
}

// ── GET status ───────────────────────────────────────────────────────

#[tokio::test]
async fn status_normalizes_both_success_spellings() {
    let server = MockServer::start().await;
    mount_status_once(&server, "a", "COMPLETED").await;
    mount_status_once(&server, "b", "SUCCESS").await;

    let gw = gateway(&server);
    for id in ["a", "b"] {
        let status = gw.payment_status(&PaymentId::new(id).unwrap()).await.unwrap();
        assert_eq!(status, PaymentStatus::Success);
    }
}

#[tokio::test]
async fn status_without_field_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let result = gateway(&server)
        .payment_status(&PaymentId::new("x").unwrap())
        .await;
    assert!(matches!(result, Err(GatewayError::MissingStatus { .. })));
}

// ── Tracker end to end ───────────────────────────────────────────────

#[tokio::test]
async fn tracker_succeeds_after_pending_then_completed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"data": {"paymentId": "p1"}}})))
        .expect(1)
        .mount(&server)
        .await;
    mount_status_once(&server, "p1", "PENDING").await;
    mount_status_once(&server, "p1", "PENDING").await;
    mount_status_once(&server, "p1", "COMPLETED").await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast());
    let report = tracker
        .initiate_and_track_with("0712345678", |_| {}, &CancelToken::never())
        .await;
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.state, TrackerState::Succeeded);
}

#[tokio::test]
async fn tracker_survives_a_transient_5xx() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"paymentId": "p2"}})))
        .mount(&server)
        .await;
    mount_status_once(&server, "p2", "PENDING").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/payments/p2/status"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status_once(&server, "p2", "COMPLETED").await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast().with_max_attempts(3));
    assert_eq!(tracker.initiate_and_track("0712345678").await, Outcome::Success);
}

#[tokio::test]
async fn tracker_times_out_on_endless_pending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"paymentId": "p3"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/payments/p3/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"status": "PENDING"}})))
        .expect(3)
        .mount(&server)
        .await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast().with_max_attempts(3));
    assert_eq!(tracker.initiate_and_track("0712345678").await, Outcome::Timeout);
}

#[tokio::test]
async fn tracker_reports_failure_on_cancelled_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"paymentId": "p4"})))
        .mount(&server)
        .await;
    mount_status_once(&server, "p4", "CANCELLED").await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast());
    assert_eq!(
        tracker.initiate_and_track("0712345678").await,
        Outcome::Failed {
            reason: "Payment was cancelled or failed".into()
        }
    );
}

#[tokio::test]
async fn tracker_rejects_malformed_number_without_network_calls() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast());
    let outcome = tracker.initiate_and_track("712345678").await;
    assert!(matches!(outcome, Outcome::InitiationError { .. }));
}

#[tokio::test]
async fn tracker_missing_payment_id_never_queries_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"data": {}}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast());
    let outcome = tracker.initiate_and_track("0712345678").await;
    assert!(matches!(outcome, Outcome::InitiationError { .. }));
}

#[tokio::test]
async fn tracker_uses_upstream_message_for_initiation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502)
                .set_body_json(json!({"data": {"message": "M-Pesa is temporarily unavailable"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tracker = PaymentTracker::new(gateway(&server)).with_options(fast());
    assert_eq!(
        tracker.initiate_and_track("0712345678").await,
        Outcome::initiation_error("M-Pesa is temporarily unavailable")
    );
}

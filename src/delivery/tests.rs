use super::attempter::{DeliveryAttempter, DeliveryError, Outcome};
use super::gateway::HttpGateway;
use super::mqtt::payload_bytes;
use crate::config::DeliverySettings;
use crate::record::Record;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Option<(Option<String>, Vec<u8>)>>>;

async fn spawn_gateway_stub(status: StatusCode) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));
    let state = captured.clone();

    async fn handle(
        State((captured, status)): State<(Captured, StatusCode)>,
        headers: HeaderMap,
        body: Bytes,
    ) -> StatusCode {
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        *captured.lock().unwrap() = Some((api_key, body.to_vec()));
        status
    }

    let app = Router::new()
        .route("/relay", post(handle))
        .with_state((state, status));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/relay"), captured)
}

fn stamped(source: &str, payload: Value) -> (Record, Vec<u8>) {
    let mut record = Record::new(source, payload);
    record.stamp();
    let raw = serde_json::to_vec(&record).unwrap();
    (record, raw)
}

#[tokio::test]
async fn test_no_configured_transports_is_a_trivial_success() {
    let attempter = DeliveryAttempter::new(None, None);
    let (record, raw) = stamped("sensor1", json!({"temp": 5}));

    assert_eq!(attempter.transport_count(), 0);
    assert_eq!(attempter.deliver(&record, &raw).await, Outcome::Delivered);
}

#[tokio::test]
async fn test_gateway_forward_posts_raw_record_with_api_key() {
    let (url, captured) = spawn_gateway_stub(StatusCode::ACCEPTED).await;
    let gateway = HttpGateway::new(
        url,
        Some("secret".into()),
        202,
        Duration::from_secs(2),
    )
    .unwrap();

    let (_, raw) = stamped("sensor1", json!({"temp": 5}));
    gateway.forward(&raw).await.unwrap();

    let (api_key, body) = captured.lock().unwrap().clone().unwrap();
    assert_eq!(api_key.as_deref(), Some("secret"));
    assert_eq!(body, raw);
}

#[tokio::test]
async fn test_gateway_rejects_unexpected_status() {
    let (url, _captured) = spawn_gateway_stub(StatusCode::INTERNAL_SERVER_ERROR).await;
    let gateway = HttpGateway::new(url, None, 202, Duration::from_secs(2)).unwrap();

    let (_, raw) = stamped("sensor1", Value::Null);
    let result = gateway.forward(&raw).await;
    assert!(matches!(result, Err(DeliveryError::GatewayStatus(500))));
}

#[tokio::test]
async fn test_failing_gateway_fails_the_attempt() {
    let (url, _captured) = spawn_gateway_stub(StatusCode::BAD_GATEWAY).await;
    let gateway = HttpGateway::new(url, None, 202, Duration::from_secs(2)).unwrap();
    let attempter = DeliveryAttempter::new(Some(gateway), None);

    let (record, raw) = stamped("sensor1", Value::Null);
    assert_eq!(attempter.deliver(&record, &raw).await, Outcome::Failed);
}

#[tokio::test]
async fn test_unreachable_gateway_fails_within_the_timeout() {
    // Nothing listens on this port; the connect error comes back quickly.
    let gateway = HttpGateway::new(
        "http://127.0.0.1:9/relay".into(),
        None,
        202,
        Duration::from_millis(500),
    )
    .unwrap();
    let attempter = DeliveryAttempter::new(Some(gateway), None);

    let (record, raw) = stamped("sensor1", Value::Null);
    assert_eq!(attempter.deliver(&record, &raw).await, Outcome::Failed);
}

#[test]
fn test_from_settings_honours_absent_transports() {
    let settings = DeliverySettings {
        gateway_url: None,
        api_key: None,
        success_status: 202,
        mqtt_host: None,
        mqtt_port: 1883,
        send_timeout_secs: 2,
    };
    let attempter = DeliveryAttempter::from_settings(&settings, "dev1").unwrap();
    assert_eq!(attempter.transport_count(), 0);

    let settings = DeliverySettings {
        gateway_url: Some("http://gateway.example/relay".into()),
        mqtt_host: Some("broker.example".into()),
        ..settings
    };
    let attempter = DeliveryAttempter::from_settings(&settings, "dev1").unwrap();
    assert_eq!(attempter.transport_count(), 2);
}

#[test]
fn test_string_payload_is_published_raw() {
    let record = Record::new("sensor1", Value::String("21.5 celsius".into()));
    assert_eq!(payload_bytes(&record).unwrap(), b"21.5 celsius".to_vec());
}

#[test]
fn test_structured_payload_is_published_as_json() {
    let record = Record::new("sensor1", json!({"temp": 5}));
    assert_eq!(payload_bytes(&record).unwrap(), br#"{"temp":5}"#.to_vec());
}

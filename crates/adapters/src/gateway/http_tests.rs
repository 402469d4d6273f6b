// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn endpoint_url_joins_without_double_slash() {
    assert_eq!(
        endpoint_url("https://crm.example.com/", "tablePage"),
        "https://crm.example.com/apis/tablePage"
    );
    assert_eq!(
        endpoint_url("http://localhost:8080", "run"),
        "http://localhost:8080/apis/run"
    );
}

#[test]
fn envelope_data_is_returned() {
    let data = unwrap_envelope(r#"{"data": {"List": [], "VirtualCount": 0}, "error": null}"#).unwrap();
    assert_eq!(data["VirtualCount"], 0);
}

#[test]
fn envelope_without_error_field_is_success() {
    assert_eq!(unwrap_envelope(r#"{"data": 7}"#).unwrap(), json!(7));
}

#[test]
fn envelope_error_is_remote() {
    let err = unwrap_envelope(r#"{"data": null, "error": "permission denied"}"#).unwrap_err();
    assert_eq!(err, GatewayError::Remote("permission denied".to_string()));
}

#[test]
fn structured_envelope_error_is_remote() {
    let err = unwrap_envelope(r#"{"error": {"code": 500}}"#).unwrap_err();
    assert!(matches!(err, GatewayError::Remote(msg) if msg.contains("500")));
}

#[test]
fn non_json_body_is_decode_error() {
    let err = unwrap_envelope("<html>Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[parameterized(
    bare = { json!(42), Some(42) },
    string = { json!("43"), Some(43) },
    object = { json!({"id": 44}), Some(44) },
    pascal = { json!({"Id": 45}), Some(45) },
    null = { json!(null), None },
    text = { json!("abc"), None },
)]
fn record_id_shapes(data: Value, expected: Option<RecordId>) {
    assert_eq!(parse_record_id(&data).ok(), expected);
}

#[parameterized(
    bare = { json!("f-1"), Some("f-1") },
    numeric = { json!(9), Some("9") },
    file_id_key = { json!({"fileId": "f-2"}), Some("f-2") },
    id_key = { json!({"id": "f-3"}), Some("f-3") },
    blank = { json!(""), None },
)]
fn file_id_shapes(data: Value, expected: Option<&str>) {
    assert_eq!(
        parse_file_id(&data).ok(),
        expected.map(|s| FileId(s.to_string()))
    );
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Port 9 (discard) is not listening on loopback in test environments
    let gateway = HttpGateway::new("http://127.0.0.1:9", Duration::from_secs(2), None);
    let err = gateway.run("calculateLeadScore", vec![json!(1)]).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)), "got {:?}", err);
}

#[test]
fn base_url_is_normalized() {
    let gateway = HttpGateway::new("https://crm.example.com///", Duration::from_secs(1), None);
    assert_eq!(gateway.base_url(), "https://crm.example.com");
}

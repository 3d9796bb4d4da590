#![allow(clippy::unwrap_used)]
// Integration tests for `UbusClient` using wiremock.
//
// Login requests are told apart from subsystem calls with body-substring
// matchers; mocks are mounted login-first so the first match wins.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rubus_api::{Error, RpcCall, TransportConfig, UbusClient, UbusConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(server: &MockServer) -> UbusClient {
    let endpoint = Url::parse(&format!("{}/ubus", server.uri())).unwrap();
    let password: secrecy::SecretString = "test-password".to_string().into();
    UbusClient::new(UbusConfig {
        endpoint,
        username: "root".into(),
        password,
        transport: TransportConfig::default(),
    })
    .unwrap()
}

/// Mount a login mock answering with the given token and expiry.
async fn mount_login(server: &MockServer, token: &str, expires: u64) {
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [0, { "ubus_rpc_session": token, "expires": expires }]
        })))
        .mount(server)
        .await;
}

// ── Login / session tests ───────────────────────────────────────────

#[tokio::test]
async fn connect_returns_token_and_embeds_it_in_calls() {
    let server = MockServer::start().await;
    mount_login(&server, "abc123", 60).await;

    // The call mock requires the token in the params, so a stale or
    // missing token would fall through to a 404.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("\"system\""))
        .and(body_string_contains("abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": [0, { "uptime": 42 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = client.connect().await.unwrap();
    assert_eq!(token.as_deref(), Some("abc123"));
    assert!(client.is_connected().await);

    let info = client.system_info().await.unwrap().unwrap();
    assert_eq!(info["uptime"], 42);
}

#[tokio::test]
async fn rejected_login_is_a_state_not_an_error() {
    let server = MockServer::start().await;

    // ubus reports bad credentials as status 6 inside the result array.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [6]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = client.connect().await.unwrap();
    assert!(token.is_none());
    assert!(!client.is_connected().await);

    // Dispatching anyway surfaces a distinguishable auth failure.
    let result = client.system_info().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn login_without_token_leaves_session_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [0, {}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.connect().await.unwrap().is_none());
    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn expired_session_renews_exactly_once() {
    let server = MockServer::start().await;

    // First login hands out a token already inside the renewal margin.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [0, { "ubus_rpc_session": "tok1", "expires": 10 }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Re-login must happen exactly once across the two calls below.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": [0, { "ubus_rpc_session": "tok2", "expires": 3600 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Calls after renewal must carry the NEW token.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("\"system\""))
        .and(body_string_contains("tok2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": [0, { "uptime": 1 }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.connect().await.unwrap().as_deref(), Some("tok1"));

    // 10s lifetime < 15s margin: the next dispatch crosses the boundary.
    assert!(client.system_info().await.unwrap().is_some());
    assert!(client.system_info().await.unwrap().is_some());

    server.verify().await;
}

// ── Classification tests ────────────────────────────────────────────

#[tokio::test]
async fn ubus_permission_code_in_result_returns_none() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    // Restricted UCI section: `{"result":[6]}` -- absent data, not a fault.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("\"uci\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": [6]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let result = client.uci_get("firewall", None).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn jsonrpc_access_denied_raises_permission_denied() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("\"system\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": { "code": -32002, "message": "Access denied" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let result = client.system_info().await;
    assert!(
        matches!(result, Err(Error::PermissionDenied { .. })),
        "expected PermissionDenied, got: {result:?}"
    );
}

#[tokio::test]
async fn other_jsonrpc_errors_raise_protocol() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("\"system\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": { "code": -32602, "message": "Invalid params" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    match client.system_info().await {
        Err(Error::Protocol { code, ref message }) => {
            assert_eq!(code, -32602);
            assert!(message.contains("Invalid params"));
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn http_error_status_is_transient_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.connect().await;

    match result {
        Err(e @ Error::Http { status: 502 }) => assert!(e.is_transient()),
        other => panic!("expected Http 502, got: {other:?}"),
    }
}

// ── list / batch tests ──────────────────────────────────────────────

#[tokio::test]
async fn list_result_is_passed_through_unwrapped() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("hostapd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": { "hostapd.wlan0": {}, "hostapd.wlan1": {} }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let result = client.list_hostapd().await.unwrap().unwrap();
    assert!(result.get("hostapd.wlan0").is_some());
}

#[tokio::test]
async fn batch_elements_classify_like_single_calls() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("assoclist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "jsonrpc": "2.0", "id": 2,
              "result": [0, { "results": [ { "mac": "aa:bb:cc:dd:ee:ff" } ] }] },
            { "jsonrpc": "2.0", "id": 3, "result": [3] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let calls = UbusClient::station_batch(&["wlan0".into(), "wlan1".into()], false);
    let results = client.batch_call(&calls).await.unwrap();

    assert_eq!(results.len(), 2);
    let first = results[0].as_ref().unwrap().as_ref().unwrap();
    assert_eq!(first["results"][0]["mac"], "aa:bb:cc:dd:ee:ff");
    // Status 3 (no data) classifies to absent, same as a single call.
    assert!(results[1].as_ref().unwrap().is_none());
}

#[tokio::test]
async fn batch_denied_on_first_element_denies_whole_batch() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    // Router degrades the whole batch to one bare permission error.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("get_clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": { "code": -32002, "message": "Access denied" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let calls =
        UbusClient::station_batch(&["hostapd.wlan0".into(), "hostapd.wlan1".into()], true);
    let results = client.batch_call(&calls).await.unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(
            matches!(result, Err(Error::PermissionDenied { .. })),
            "expected PermissionDenied, got: {result:?}"
        );
    }
}

#[tokio::test]
async fn empty_batch_issues_no_request() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let results = client.batch_call(&[]).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn kick_device_targets_the_hostapd_subsystem() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("hostapd.wlan0"))
        .and(body_string_contains("del_client"))
        .and(body_string_contains("AA:BB:CC:DD:EE:FF"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": [0]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let result = client
        .kick_device("wlan0", "AA:BB:CC:DD:EE:FF", 60_000, 5)
        .await
        .unwrap();
    // Success with no payload: the caller polls station lists to confirm.
    assert!(result.is_none());

    server.verify().await;
}

#[tokio::test]
async fn logout_clears_the_session_locally() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    let client = client_for(&server);
    client.connect().await.unwrap();
    assert!(client.is_connected().await);

    client.logout().await;
    assert!(!client.is_connected().await);
}

// ── Batch/single equivalence ────────────────────────────────────────

#[tokio::test]
async fn batch_and_single_agree_per_index() {
    let server = MockServer::start().await;
    mount_login(&server, "tok", 3600).await;

    let wlan0_payload = json!({ "results": [ { "mac": "aa:aa:aa:aa:aa:aa" } ] });
    let wlan1_payload = json!({ "results": [] });

    // Batch mock first: only batch requests mention wlan1.
    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("wlan1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "jsonrpc": "2.0", "id": 10, "result": [0, wlan0_payload.clone()] },
            { "jsonrpc": "2.0", "id": 11, "result": [0, wlan1_payload] }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ubus"))
        .and(body_string_contains("wlan0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 9, "result": [0, wlan0_payload]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.connect().await.unwrap();

    let single = client.iwinfo_assoclist("wlan0").await.unwrap();
    let calls = UbusClient::station_batch(&["wlan0".into(), "wlan1".into()], false);
    let batch = client.batch_call(&calls).await.unwrap();

    assert_eq!(single, *batch[0].as_ref().unwrap());
    assert_eq!(
        batch[1].as_ref().unwrap().as_ref().unwrap()["results"],
        json!([])
    );
}

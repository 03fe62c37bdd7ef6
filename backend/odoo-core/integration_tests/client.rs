use crate::helpers::{fault_body, success_body};

use odoo_core::config::{ConnectionConfig, RelayConfig};
use odoo_core::error::RpcError;
use odoo_core::{ClientEvent, ClientEventListener, Endpoint, OdooClient, Value};

use common::RedactedSecret;

use std::sync::{Arc, Mutex};

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder(Mutex<Vec<ClientEvent>>);

impl ClientEventListener for Recorder {
    fn on_event(&self, event: &ClientEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn connection(url: &str) -> ConnectionConfig {
    ConnectionConfig::from_lookup(|name| {
        match name {
            "ODOO_URL" => Some(url.to_string()),
            "ODOO_DB" => Some(String::from("sanjose")),
            "ODOO_LOGIN" => Some(String::from("portal@sanjose.test")),
            "ODOO_API_KEY" => Some(String::from("k3y")),
            _ => None,
        }
    })
    .unwrap()
}

/// **VALUE**: End to end over HTTP: a CORS-blocked direct path falls back to
/// a forwarder and the client starts preferring relays.
#[tokio::test]
async fn given_direct_blocked_when_authenticating_then_forwarder_delivers_and_preference_flips() {
    // GIVEN: Direct endpoint refuses; forwarder on the same server relays
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Blocked by CORS"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/forward"))
        .and(body_string_contains("<methodName>authenticate</methodName>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>7</int>")))
        .expect(1)
        .mount(&server)
        .await;

    let relays = RelayConfig::from_toml_str(&format!(
        r#"
[[relay]]
name = "direct"
kind = "direct"

[[relay]]
name = "corsproxy"
kind = "forwarding"
url = "{}/forward?url={{url}}"
"#,
        server.uri()
    ))
    .unwrap();

    let conn = connection(&server.uri());
    let recorder = Arc::new(Recorder::default());
    let client = OdooClient::from_config(&conn, &relays)
        .unwrap()
        .with_listener(recorder.clone());

    // WHEN: Authenticating
    let uid = client.authenticate(&conn.login, &conn.api_key).await.unwrap();

    // THEN: uid from the forwarder; relay now preferred
    assert_eq!(uid, 7);
    assert!(client.prefers_relay());
    assert!(recorder.0.lock().unwrap().contains(&ClientEvent::RelayPreferenceChanged {
        prefer_relay: true,
        strategy: Some(String::from("corsproxy")),
    }));
}

#[tokio::test]
async fn given_fault_over_http_when_authenticating_then_fault_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fault_body(1, "database sanjose does not exist")))
        .mount(&server)
        .await;

    let client = OdooClient::from_config(&connection(&server.uri()), &RelayConfig::default()).unwrap();

    let result = client
        .authenticate("portal@sanjose.test", &RedactedSecret::new("k3y"))
        .await;

    match result {
        Err(RpcError::Fault { message, .. }) => assert!(message.contains("does not exist")),
        other => panic!("Expected fault, got {other:?}"),
    }
}

#[tokio::test]
async fn given_server_down_when_calling_then_returns_connectivity_error() {
    // GIVEN: A server that answers 502 to everything
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = OdooClient::from_config(&connection(&server.uri()), &RelayConfig::default()).unwrap();

    // WHEN: Calling
    let result = client.call(Endpoint::Common, "version", &[]).await;

    // THEN: Connectivity, retryable
    let error = result.unwrap_err();
    assert!(error.is_connectivity(), "got {error:?}");
}

#[tokio::test]
async fn given_authenticated_client_when_querying_then_records_come_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>7</int>")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/object"))
        .and(body_string_contains("<string>pos.session</string>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(
            "<array><data><value><struct><member><name>id</name><value><int>1</int></value></member></struct></value></data></array>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = OdooClient::from_config(&connection(&server.uri()), &RelayConfig::default()).unwrap();
    client
        .authenticate("portal@sanjose.test", &RedactedSecret::new("k3y"))
        .await
        .unwrap();

    let records = client
        .query_records("pos.session", Vec::<Value>::new(), &["name"], &Default::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("id"), Some(&Value::Int(1)));
}

use crate::helpers::{TEST_TIMEOUT, success_body};

use odoo_core::error::RelayFailure;
use odoo_core::relay::{DirectStrategy, ForwardingRelay, HostedRelay};
use odoo_core::{RelayKind, RelayStrategy};

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENVELOPE: &str = "<methodCall><methodName>version</methodName><params></params></methodCall>";
const ERP_TARGET: &str = "https://erp.sanjose.test/xmlrpc/2/common";

/// **VALUE**: Direct delivery posts the envelope untouched as `text/xml`.
#[tokio::test]
async fn given_direct_strategy_when_delivering_then_posts_xml_to_target() {
    // GIVEN: An ERP endpoint expecting the exact envelope
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .and(header("content-type", "text/xml"))
        .and(body_string(ENVELOPE))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>1</int>")))
        .expect(1)
        .mount(&server)
        .await;

    let strategy = DirectStrategy::new("direct", Client::new(), TEST_TIMEOUT);
    let target = Url::parse(&format!("{}/xmlrpc/2/common", server.uri())).unwrap();

    // WHEN: Delivering
    let raw = strategy.deliver(ENVELOPE, &target).await.unwrap();

    // THEN: Raw status and body come back unjudged
    assert!(raw.status.is_success());
    assert!(raw.body.contains("methodResponse"));
    assert_eq!(strategy.kind(), RelayKind::Direct);
}

#[tokio::test]
async fn given_error_status_when_delivering_directly_then_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("CORS policy"))
        .mount(&server)
        .await;

    let strategy = DirectStrategy::new("direct", Client::new(), TEST_TIMEOUT);
    let target = Url::parse(&server.uri()).unwrap();

    let raw = strategy.deliver(ENVELOPE, &target).await.unwrap();

    assert_eq!(raw.status.0, 403);
    assert_eq!(raw.body, "CORS policy");
}

/// **VALUE**: A strategy gives up after its own timeout.
///
/// **BUG THIS CATCHES**: A hung relay blocking the call forever instead of
/// letting the client move on to the next strategy.
#[tokio::test]
async fn given_slow_server_when_delivering_then_times_out() {
    // GIVEN: Server slower than the strategy timeout
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(success_body("<int>1</int>"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let strategy = DirectStrategy::new("direct", Client::new(), Duration::from_millis(200));
    let target = Url::parse(&server.uri()).unwrap();

    // WHEN: Delivering
    let result = strategy.deliver(ENVELOPE, &target).await;

    // THEN: Transport failure flagged as a timeout
    match result {
        Err(RelayFailure::Transport { is_timeout, .. }) => assert!(is_timeout),
        other => panic!("Expected transport timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn given_forwarding_relay_when_delivering_then_target_is_url_encoded_in_query() {
    // GIVEN: A forwarder reading the target from ?url=
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forward"))
        .and(query_param("url", ERP_TARGET))
        .and(body_string(ENVELOPE))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>1</int>")))
        .expect(1)
        .mount(&server)
        .await;

    let relay = ForwardingRelay::new(
        "corsproxy",
        format!("{}/forward?url={{url}}", server.uri()),
        Client::new(),
        TEST_TIMEOUT,
    );

    // WHEN: Delivering
    let raw = relay.deliver(ENVELOPE, &Url::parse(ERP_TARGET).unwrap()).await.unwrap();

    // THEN: Forwarder answered
    assert!(raw.status.is_success());
}

#[test]
fn given_forwarding_template_when_building_relay_url_then_target_is_fully_encoded() {
    let relay = ForwardingRelay::new(
        "corsproxy",
        "https://corsproxy.test/?url={url}",
        Client::new(),
        TEST_TIMEOUT,
    );

    let url = relay.relay_url(&Url::parse(ERP_TARGET).unwrap()).unwrap();

    assert_eq!(
        url.as_str(),
        "https://corsproxy.test/?url=https%3A%2F%2Ferp.sanjose.test%2Fxmlrpc%2F2%2Fcommon"
    );
}

#[tokio::test]
async fn given_hosted_relay_when_delivering_then_posts_url_and_body_as_json() {
    // GIVEN: The portal's relay endpoint
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/odoo-proxy"))
        .and(body_json(json!({ "url": ERP_TARGET, "body": ENVELOPE })))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>1</int>")))
        .expect(1)
        .mount(&server)
        .await;

    let relay = HostedRelay::new(
        "hosted",
        Url::parse(&format!("{}/api/odoo-proxy", server.uri())).unwrap(),
        Client::new(),
        TEST_TIMEOUT,
    );

    // WHEN: Delivering
    let raw = relay.deliver(ENVELOPE, &Url::parse(ERP_TARGET).unwrap()).await.unwrap();

    // THEN: Relayed XML comes back
    assert!(raw.body.contains("<int>1</int>"));
    assert_eq!(relay.kind(), RelayKind::Hosted);
}

#[tokio::test]
async fn given_hosted_relay_error_when_delivering_then_json_error_body_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Proxy failure", "details": "ETIMEDOUT" })),
        )
        .mount(&server)
        .await;

    let relay = HostedRelay::new("hosted", Url::parse(&server.uri()).unwrap(), Client::new(), TEST_TIMEOUT);

    let raw = relay.deliver(ENVELOPE, &Url::parse(ERP_TARGET).unwrap()).await.unwrap();

    assert_eq!(raw.status.0, 500);
    assert_eq!(odoo_core::relay::failure_detail(&raw.body), "Proxy failure: ETIMEDOUT");
}

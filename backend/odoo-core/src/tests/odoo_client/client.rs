// Unit tests for the fallback loop, session gating and relay preference
// All network paths are in-process scripted strategies

use crate::codec::{DecodeMode, FaultCode, Value};
use crate::error::RpcError;
use crate::odoo_client::{ClientEvent, Endpoint, OdooClient, QueryOptions};
use crate::relay::{RelayKind, RelayTable};
use crate::tests::fakes::{RecordingListener, ScriptedStrategy, Step, fault_body, success_body};

use common::RedactedSecret;

use std::sync::Arc;

const BASE_URL: &str = "https://erp.sanjose.test";
const DATABASE: &str = "sanjose";

struct Harness {
    client: OdooClient,
    listener: Arc<RecordingListener>,
}

fn harness(strategies: &[&Arc<ScriptedStrategy>]) -> Harness {
    harness_with_table(strategies, RelayTable::new())
}

fn harness_with_table(strategies: &[&Arc<ScriptedStrategy>], mut table: RelayTable) -> Harness {
    for strategy in strategies {
        table = table.with_shared((*strategy).clone());
    }
    let listener = Arc::new(RecordingListener::default());
    let client = OdooClient::new(BASE_URL, DATABASE, table)
        .unwrap()
        .with_listener(listener.clone());
    Harness { client, listener }
}

fn strategy(name: &str, kind: RelayKind, steps: impl IntoIterator<Item = Step>) -> Arc<ScriptedStrategy> {
    Arc::new(ScriptedStrategy::new(name, kind, steps))
}

fn ok(value_xml: &str) -> Step {
    Step::Reply(200, success_body(value_xml))
}

fn secret() -> RedactedSecret {
    RedactedSecret::new("service-key")
}

// ============================================
// ENDPOINTS
// ============================================

#[test]
fn given_base_url_with_trailing_slash_when_resolving_endpoints_then_paths_are_joined_once() {
    let client = OdooClient::new("https://erp.sanjose.test/", DATABASE, RelayTable::new()).unwrap();

    assert_eq!(
        client.endpoint_url(Endpoint::Common).unwrap().as_str(),
        "https://erp.sanjose.test/xmlrpc/2/common"
    );
    assert_eq!(
        client.endpoint_url(Endpoint::Object).unwrap().as_str(),
        "https://erp.sanjose.test/xmlrpc/2/object"
    );
}

#[test]
fn given_invalid_base_url_when_creating_client_then_returns_url_parse_error() {
    let result = OdooClient::new("not a url", DATABASE, RelayTable::new());

    assert!(matches!(result, Err(RpcError::UrlParse { .. })));
}

// ============================================
// FALLBACK LOOP
// ============================================

/// **VALUE**: A failing direct path falls through to the next relay.
///
/// **WHY THIS MATTERS**: This is the whole point of the relay table: the
/// browser-blocked direct POST must not stop the call.
#[tokio::test]
async fn given_direct_unreachable_when_calling_then_falls_back_to_relay() {
    // GIVEN: Direct fails, forwarder answers
    let direct = strategy("direct", RelayKind::Direct, [Step::Unreachable]);
    let relay = strategy("corsproxy", RelayKind::Forwarding, [ok("<int>1</int>")]);
    let h = harness(&[&direct, &relay]);

    // WHEN: Calling
    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    // THEN: Relay's value, both tried once, in order
    assert_eq!(result.unwrap(), Value::Int(1));
    assert_eq!(direct.calls(), 1);
    assert_eq!(relay.calls(), 1);

    let events = h.listener.events();
    assert_eq!(events[0], ClientEvent::Connecting { strategy: "direct".into() });
    assert!(matches!(&events[1], ClientEvent::StrategyFailed { strategy, .. } if strategy == "direct"));
    assert_eq!(events[2], ClientEvent::Connecting { strategy: "corsproxy".into() });
}

#[tokio::test]
async fn given_error_status_empty_body_and_html_when_calling_then_each_is_a_soft_failure() {
    // GIVEN: Three relays answering with things that are not envelopes
    let bad_gateway = strategy("direct", RelayKind::Direct, [Step::Reply(502, String::from("Bad Gateway"))]);
    let empty = strategy("empty", RelayKind::Forwarding, [Step::Reply(200, String::new())]);
    let html = strategy("html", RelayKind::Forwarding, [Step::Reply(200, String::from("<html>blocked</html>"))]);
    let hosted = strategy("hosted", RelayKind::Hosted, [ok("<string>ok</string>")]);
    let h = harness(&[&bad_gateway, &empty, &html, &hosted]);

    // WHEN: Calling
    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    // THEN: The hosted relay's answer wins
    assert_eq!(result.unwrap(), Value::from("ok"));
    assert_eq!(
        h.listener
            .events()
            .iter()
            .filter(|e| matches!(e, ClientEvent::StrategyFailed { .. }))
            .count(),
        3
    );
}

#[tokio::test]
async fn given_truncated_envelope_when_calling_then_next_strategy_is_tried() {
    let broken = strategy(
        "direct",
        RelayKind::Direct,
        [Step::Reply(200, String::from("<methodResponse><params>"))],
    );
    let relay = strategy("hosted", RelayKind::Hosted, [ok("<int>3</int>")]);
    let h = harness(&[&broken, &relay]);

    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    assert_eq!(result.unwrap(), Value::Int(3));
}

/// **VALUE**: A fault is an answer, not a connectivity problem.
///
/// **BUG THIS CATCHES**: Retrying a `create` through the next relay after the
/// ERP already rejected it, doubling side effects or masking the real error.
#[tokio::test]
async fn given_fault_from_first_strategy_when_calling_then_later_strategies_are_not_tried() {
    // GIVEN: Direct answers with a fault
    let direct = strategy("direct", RelayKind::Direct, [Step::Reply(200, fault_body(2, "Access Denied"))]);
    let relay = strategy("corsproxy", RelayKind::Forwarding, [ok("<int>1</int>")]);
    let h = harness(&[&direct, &relay]);

    // WHEN: Calling
    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    // THEN: Fault surfaces, relay untouched
    match result {
        Err(RpcError::Fault { code, message, .. }) => {
            assert_eq!(code, FaultCode::Numeric(2));
            assert_eq!(message, "Access Denied");
        }
        other => panic!("Expected fault, got {other:?}"),
    }
    assert_eq!(relay.calls(), 0);
}

#[tokio::test]
async fn given_every_strategy_failing_when_calling_then_returns_connectivity_with_last_failure() {
    let direct = strategy("direct", RelayKind::Direct, [Step::Unreachable]);
    let relay = strategy("corsproxy", RelayKind::Forwarding, [Step::Reply(503, String::from("down for maintenance"))]);
    let h = harness(&[&direct, &relay]);

    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    match result {
        Err(error @ RpcError::Connectivity { .. }) => {
            assert!(error.is_connectivity());
            let RpcError::Connectivity { attempts, last_failure, .. } = error else {
                unreachable!()
            };
            assert_eq!(attempts, 2);
            assert!(last_failure.contains("down for maintenance"), "got: {last_failure}");
        }
        other => panic!("Expected connectivity error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_empty_relay_table_when_calling_then_returns_connectivity_without_attempts() {
    let h = harness(&[]);

    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    assert!(matches!(
        result,
        Err(RpcError::Connectivity { attempts: 0, ref last_failure, .. }) if last_failure.contains("no relay strategy")
    ));
}

/// **WHY THIS MATTERS**: An envelope the codec rejects will be rejected no
/// matter which relay carries it, so trying the others only wastes time.
#[tokio::test]
async fn given_unknown_tag_in_strict_mode_when_calling_then_fails_without_fallback() {
    let direct = strategy("direct", RelayKind::Direct, [ok("<base64>AA==</base64>")]);
    let relay = strategy("corsproxy", RelayKind::Forwarding, [ok("<int>1</int>")]);
    let h = harness(&[&direct, &relay]);

    let result = h.client.call(Endpoint::Common, "version", &[]).await;

    assert!(matches!(result, Err(RpcError::Codec { .. })));
    assert_eq!(relay.calls(), 0);
}

#[tokio::test]
async fn given_unknown_tag_in_permissive_mode_when_calling_then_returns_text() {
    let direct = strategy("direct", RelayKind::Direct, [ok("<base64>AA==</base64>")]);
    let h = harness(&[&direct]);
    let client = h.client.with_decode_mode(DecodeMode::Permissive);

    let result = client.call(Endpoint::Common, "version", &[]).await;

    assert_eq!(result.unwrap(), Value::from("AA=="));
}

#[tokio::test]
async fn given_unencodable_param_when_calling_then_nothing_is_sent() {
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>1</int>")]);
    let h = harness(&[&direct]);

    let result = h
        .client
        .call(Endpoint::Object, "execute_kw", &[Value::Double(f64::NAN)])
        .await;

    assert!(matches!(result, Err(RpcError::Codec { .. })));
    assert_eq!(direct.calls(), 0);
}

// ============================================
// RELAY PREFERENCE
// ============================================

/// **VALUE**: Once a relay gets through, the next call starts with relays.
#[tokio::test]
async fn given_relay_delivery_when_calling_again_then_relay_is_tried_first() {
    // GIVEN: Direct keeps failing, relay works
    let direct = strategy("direct", RelayKind::Direct, [Step::Unreachable]);
    let relay = strategy("corsproxy", RelayKind::Forwarding, [ok("<int>1</int>")]);
    let h = harness(&[&direct, &relay]);

    // WHEN: Two calls
    h.client.call(Endpoint::Common, "version", &[]).await.unwrap();
    h.client.call(Endpoint::Common, "version", &[]).await.unwrap();

    // THEN: Direct only tried on the first
    assert!(h.client.prefers_relay());
    assert_eq!(direct.calls(), 1);
    assert_eq!(relay.calls(), 2);
    assert!(h.listener.events().contains(&ClientEvent::RelayPreferenceChanged {
        prefer_relay: true,
        strategy: Some(String::from("corsproxy")),
    }));
}

#[tokio::test]
async fn given_relay_preferred_when_direct_succeeds_then_preference_switches_back() {
    // GIVEN: Relay preferred but the relay is down; direct works
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>1</int>")]);
    let relay = strategy("corsproxy", RelayKind::Forwarding, [Step::Unreachable]);
    let h = harness(&[&direct, &relay]);
    let client = h.client.with_prefer_relay(true);

    // WHEN: Calling
    client.call(Endpoint::Common, "version", &[]).await.unwrap();

    // THEN: Relay tried first, then direct, and preference is off again
    assert_eq!(relay.calls(), 1);
    assert!(!client.prefers_relay());
    assert!(h.listener.events().contains(&ClientEvent::RelayPreferenceChanged {
        prefer_relay: false,
        strategy: Some(String::from("direct")),
    }));
}

#[test]
fn given_same_preference_when_setting_then_no_event_is_emitted() {
    let h = harness(&[]);

    h.client.set_prefer_relay(false);
    h.client.set_prefer_relay(true);
    h.client.set_prefer_relay(true);

    assert_eq!(
        h.listener.events(),
        vec![ClientEvent::RelayPreferenceChanged {
            prefer_relay: true,
            strategy: None,
        }]
    );
}

#[tokio::test]
async fn given_failure_threshold_when_strategy_keeps_failing_then_it_is_disabled_and_skipped() {
    // GIVEN: Threshold 1, a dead hosted relay ahead of direct
    let hosted = strategy("hosted", RelayKind::Hosted, [Step::Unreachable]);
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>1</int>")]);
    let h = harness_with_table(&[&hosted, &direct], RelayTable::new().with_failure_threshold(1));

    // WHEN: Two calls
    h.client.call(Endpoint::Common, "version", &[]).await.unwrap();
    h.client.call(Endpoint::Common, "version", &[]).await.unwrap();

    // THEN: Hosted tried once and reported disabled
    assert_eq!(hosted.calls(), 1);
    assert!(h.listener.events().contains(&ClientEvent::StrategyDisabled {
        strategy: String::from("hosted"),
    }));
}

// ============================================
// AUTHENTICATION AND SESSION GATING
// ============================================

#[tokio::test]
async fn given_positive_uid_when_authenticating_then_session_is_stored() {
    // GIVEN: ERP answers uid 7
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>7</int>")]);
    let h = harness(&[&direct]);

    // WHEN: Authenticating
    let uid = h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    // THEN: Session holds uid 7 and the envelope went to the common endpoint
    assert_eq!(uid, 7);
    assert_eq!(h.client.session_uid().await, Some(7));
    assert!(h.listener.events().contains(&ClientEvent::Authenticated { uid: 7 }));

    let (target, envelope) = &direct.deliveries()[0];
    assert_eq!(target, "https://erp.sanjose.test/xmlrpc/2/common");
    assert!(envelope.contains("<methodName>authenticate</methodName>"));
    assert!(envelope.contains("<string>sanjose</string>"));
    assert!(envelope.contains("<string>service-key</string>"));
}

/// **VALUE**: Anything but a positive integer is a failed login.
///
/// **BUG THIS CATCHES**: Storing `false` or `0` as an identity and sending
/// model calls that the ERP will reject with a confusing fault.
#[tokio::test]
async fn given_non_identity_results_when_authenticating_then_returns_invalid_credentials() {
    for reply in ["<boolean>0</boolean>", "<int>0</int>", "<int>-1</int>", "<string>7</string>"] {
        // GIVEN: ERP answers with something that is not a uid
        let direct = strategy("direct", RelayKind::Direct, [ok(reply)]);
        let h = harness(&[&direct]);

        // WHEN: Authenticating
        let result = h.client.authenticate("portal@sanjose.test", &secret()).await;

        // THEN: Rejected, no session
        assert!(
            matches!(result, Err(RpcError::InvalidCredentials { .. })),
            "{reply} should be rejected"
        );
        assert_eq!(h.client.session_uid().await, None);
    }
}

/// **VALUE**: Model calls without a session fail before any network I/O.
#[tokio::test]
async fn given_no_session_when_querying_then_fails_without_delivering() {
    // GIVEN: Unauthenticated client
    let direct = strategy("direct", RelayKind::Direct, [ok("<array><data/></array>")]);
    let h = harness(&[&direct]);

    // WHEN: Querying
    let result = h
        .client
        .query_records("product.product", Vec::<Value>::new(), &["name"], &QueryOptions::default())
        .await;

    // THEN: NotAuthenticated and zero deliveries
    assert!(matches!(result, Err(RpcError::NotAuthenticated { .. })));
    assert_eq!(direct.calls(), 0);
}

#[tokio::test]
async fn given_cleared_session_when_creating_then_returns_not_authenticated() {
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>7</int>")]);
    let h = harness(&[&direct]);
    h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    h.client.clear_session().await;
    let result = h
        .client
        .create_record("stock.picking", Value::from([("origin", Value::from("x"))]), &Default::default())
        .await;

    assert!(matches!(result, Err(RpcError::NotAuthenticated { .. })));
    assert_eq!(direct.calls(), 1);
}

// ============================================
// MODEL CALLS
// ============================================

#[tokio::test]
async fn given_session_when_querying_then_execute_kw_carries_uid_secret_and_keywords() {
    // GIVEN: Authenticated as uid 7; search_read answers one record
    let direct = strategy(
        "direct",
        RelayKind::Direct,
        [
            ok("<int>7</int>"),
            ok("<array><data><value><struct><member><name>id</name><value><int>3</int></value></member></struct></value></data></array>"),
        ],
    );
    let h = harness(&[&direct]);
    h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    // WHEN: Querying
    let records = h
        .client
        .query_records("pos.session", Vec::<Value>::new(), &["name"], &QueryOptions::default())
        .await
        .unwrap();

    // THEN: One record, envelope addressed to the object endpoint
    assert_eq!(records.len(), 1);
    let (target, envelope) = &direct.deliveries()[1];
    assert_eq!(target, "https://erp.sanjose.test/xmlrpc/2/object");
    assert!(envelope.contains("<methodName>execute_kw</methodName>"));
    assert!(envelope.contains("<param><value><int>7</int></value></param>"));
    assert!(envelope.contains("<string>search_read</string>"));
    assert!(envelope.contains("<member><name>limit</name><value><int>80</int></value></member>"));
    assert!(envelope.contains("<member><name>order</name><value><string>id desc</string></value></member>"));
}

#[tokio::test]
async fn given_search_read_returning_non_list_when_querying_then_returns_unexpected_result() {
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>7</int>"), ok("<boolean>1</boolean>")]);
    let h = harness(&[&direct]);
    h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    let result = h
        .client
        .query_records("pos.session", Vec::<Value>::new(), &["name"], &QueryOptions::default())
        .await;

    assert!(matches!(result, Err(RpcError::UnexpectedResult { .. })));
}

#[tokio::test]
async fn given_session_when_creating_then_returns_new_id() {
    let direct = strategy("direct", RelayKind::Direct, [ok("<int>7</int>"), ok("<int>512</int>")]);
    let h = harness(&[&direct]);
    h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    let id = h
        .client
        .create_record("stock.picking", Value::from([("origin", Value::from("x"))]), &Default::default())
        .await
        .unwrap();

    assert_eq!(id, 512);
    let (_, envelope) = &direct.deliveries()[1];
    assert!(envelope.contains("<string>create</string>"));
}

/// **VALUE**: The product search carries the location as context and the
/// `|` search prefix only when there is a search term.
#[tokio::test]
async fn given_search_term_when_querying_products_in_stock_then_domain_and_context_are_set() {
    // GIVEN: Authenticated client
    let direct = strategy(
        "direct",
        RelayKind::Direct,
        [ok("<int>7</int>"), ok("<array><data/></array>")],
    );
    let h = harness(&[&direct]);
    h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    // WHEN: Searching location 12 for "para"
    let products = h.client.query_products_in_stock(12, " para ").await.unwrap();

    // THEN: Empty result; envelope holds the filter, context and page size
    assert!(products.is_empty());
    let (_, envelope) = &direct.deliveries()[1];
    assert!(envelope.contains("<value><string>|</string></value>"));
    assert!(envelope.contains("<string>default_code</string>"));
    assert!(envelope.contains("<string>para</string>"));
    assert!(envelope.contains("<member><name>location</name><value><int>12</int></value></member>"));
    assert!(envelope.contains("<member><name>limit</name><value><int>40</int></value></member>"));
}

#[tokio::test]
async fn given_blank_search_when_querying_products_in_stock_then_only_type_filter_is_sent() {
    let direct = strategy(
        "direct",
        RelayKind::Direct,
        [ok("<int>7</int>"), ok("<array><data/></array>")],
    );
    let h = harness(&[&direct]);
    h.client.authenticate("portal@sanjose.test", &secret()).await.unwrap();

    h.client.query_products_in_stock(12, "   ").await.unwrap();

    let (_, envelope) = &direct.deliveries()[1];
    assert!(!envelope.contains("<string>|</string>"));
    assert!(envelope.contains("<string>product</string>"));
}

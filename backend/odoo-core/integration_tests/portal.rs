use crate::helpers::{list_xml, record_xml, success_body};

use odoo_core::OdooClient;
use odoo_core::config::RelayConfig;
use odoo_core::portal::{dashboard_counters, login_by_email, pos_sessions, stock_on_hand};

use common::RedactedSecret;
use models::{PosSessionState, UserRole};

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn erp() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>2</int>")))
        .mount(&server)
        .await;
    server
}

async fn answer(server: &MockServer, model: &str, value_xml: String) {
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/object"))
        .and(body_string_contains(format!("<string>{model}</string>")))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(&value_xml)))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> OdooClient {
    let relays = RelayConfig::default();
    let http = reqwest::Client::new();
    OdooClient::new(&server.uri(), "sanjose", relays.build_table(&http).unwrap()).unwrap()
}

/// **VALUE**: The full login flow against an HTTP ERP: service account,
/// user lookup, employee lookup.
#[tokio::test]
async fn given_employee_email_when_logging_in_then_portal_user_is_resolved() {
    // GIVEN: ERP knows the user but has no employee record
    let server = erp().await;
    answer(
        &server,
        "res.users",
        list_xml(&[record_xml(&[
            ("id", "<int>9</int>"),
            ("name", "<string>Rosa Quispe</string>"),
            ("login", "<string>rosa@sanjose.test</string>"),
            ("company_id", "<boolean>0</boolean>"),
            ("partner_id", "<boolean>0</boolean>"),
        ])]),
    )
    .await;
    answer(&server, "hr.employee", list_xml(&[])).await;
    let client = client(&server);

    // WHEN: Logging in
    let user = login_by_email(&client, "portal", &RedactedSecret::new("k3y"), "rosa@sanjose.test")
        .await
        .unwrap();

    // THEN: User name, employee role, default company
    assert_eq!(user.name, "Rosa Quispe");
    assert_eq!(user.role, UserRole::Employee);
    assert_eq!(user.company_id, 1);
    assert_eq!(user.company_name, "CADENA DE BOTICAS SAN JOSE S.A.C.");
    assert_eq!(user.partner_id, None);
}

#[tokio::test]
async fn given_products_with_stock_when_listing_stock_then_products_are_typed() {
    let server = erp().await;
    answer(
        &server,
        "product.product",
        list_xml(&[record_xml(&[
            ("id", "<int>42</int>"),
            ("name", "<string>Paracetamol 500mg</string>"),
            ("default_code", "<string>PAR500</string>"),
            ("qty_available", "<double>120.0</double>"),
            ("list_price", "<double>0.8</double>"),
        ])]),
    )
    .await;
    let client = client(&server);
    client.authenticate("portal", &RedactedSecret::new("k3y")).await.unwrap();

    let products = stock_on_hand(&client, "").await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].default_code.as_deref(), Some("PAR500"));
    assert_eq!(products[0].qty_available, 120.0);
}

#[tokio::test]
async fn given_pos_sessions_when_listing_then_states_are_parsed() {
    let server = erp().await;
    answer(
        &server,
        "pos.session",
        list_xml(&[record_xml(&[
            ("id", "<int>5</int>"),
            ("name", "<string>POS/00005</string>"),
            ("user_id", "<array><data><value><int>9</int></value><value><string>Rosa</string></value></data></array>"),
            ("start_at", "<string>2026-03-14 08:00:00</string>"),
            ("state", "<string>opened</string>"),
        ])]),
    )
    .await;
    let client = client(&server);
    client.authenticate("portal", &RedactedSecret::new("k3y")).await.unwrap();

    let sessions = pos_sessions(&client).await.unwrap();

    assert_eq!(sessions[0].state, PosSessionState::Opened);
    assert_eq!(sessions[0].user.as_ref().map(|u| u.id), Some(9));
}

#[tokio::test]
async fn given_pending_pickings_when_loading_dashboard_then_counters_are_computed() {
    let server = erp().await;
    let relation = |id: i64, name: &str| {
        format!("<array><data><value><int>{id}</int></value><value><string>{name}</string></value></data></array>")
    };
    let (main, b1, b2, b3) = (
        relation(8, "PR/Stock"),
        relation(12, "B1/Stock"),
        relation(3, "B2/Stock"),
        relation(4, "B3/Stock"),
    );
    answer(
        &server,
        "stock.picking",
        list_xml(&[
            record_xml(&[
                ("id", "<int>1</int>"),
                ("location_id", main.as_str()),
                ("location_dest_id", b1.as_str()),
                ("state", "<string>draft</string>"),
            ]),
            record_xml(&[
                ("id", "<int>2</int>"),
                ("location_id", b2.as_str()),
                ("location_dest_id", b3.as_str()),
                ("state", "<string>assigned</string>"),
            ]),
        ]),
    )
    .await;
    let client = client(&server);
    client.authenticate("portal", &RedactedSecret::new("k3y")).await.unwrap();

    let counters = dashboard_counters(&client).await.unwrap();

    assert_eq!(counters.pending_total, 2);
    assert_eq!(counters.main_internal, 1);
    assert_eq!(counters.branch_inbound, 1);
}

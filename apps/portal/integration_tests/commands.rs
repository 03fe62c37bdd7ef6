use crate::helpers::{cli, context, list_xml, mount_authenticate, mount_model, record_xml, success_body};

use odoo_core::config::RelayConfig;

use portal::commands;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn relation(id: i64, name: &str) -> String {
    format!("<array><data><value><int>{id}</int></value><value><string>{name}</string></value></data></array>")
}

#[tokio::test]
async fn given_stock_command_with_json_output_when_run_then_prints_products() {
    // GIVEN: An ERP with one product in stock
    let server = MockServer::start().await;
    mount_authenticate(&server).await;
    mount_model(
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
    let ctx = context(&server, &RelayConfig::default());

    // WHEN: Running `portal -o json stock`
    let output = commands::run(&cli(&["-o", "json", "stock"]), &ctx).await.unwrap();

    // THEN: JSON array with the product
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["id"], 42);
    assert_eq!(parsed[0]["default_code"], "PAR500");
}

/// **VALUE**: A transient outage on the only strategy is retried once at the
/// command level instead of failing the command.
///
/// **BUG THIS CATCHES**: Would catch the retry being dropped, or a forced
/// preference outliving a retry that the direct strategy served.
#[tokio::test]
async fn given_first_delivery_fails_when_running_dashboard_then_retried_and_counted() {
    // GIVEN: The first request to the ERP gets a 502, later ones succeed
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_authenticate(&server).await;
    let (main, b1) = (relation(8, "PR/Stock"), relation(12, "B1/Stock"));
    mount_model(
        &server,
        "stock.picking",
        list_xml(&[record_xml(&[
            ("id", "<int>1</int>"),
            ("location_id", main.as_str()),
            ("location_dest_id", b1.as_str()),
            ("state", "<string>draft</string>"),
        ])]),
    )
    .await;
    let ctx = context(&server, &RelayConfig::default());

    // WHEN: Running `portal dashboard`
    let output = commands::run(&cli(&["dashboard"]), &ctx).await.unwrap();

    // THEN: Counters printed; direct delivered the retry, so direct is preferred again
    assert!(output.contains("Pending pickings:        1"));
    assert!(output.contains("Branch B1 inbound:       1"));
    assert!(!ctx.client.prefers_relay());
}

#[tokio::test]
async fn given_erp_unreachable_when_running_then_connectivity_error_after_retry() {
    // GIVEN: Every request fails
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    let ctx = context(&server, &RelayConfig::default());

    // WHEN
    let err = commands::run(&cli(&["pos"]), &ctx).await.unwrap_err();

    // THEN: One direct attempt, one retry; preference put back
    assert!(err.is_connectivity());
    assert!(!ctx.client.prefers_relay());
}

/// **VALUE**: `request` resolves the user, falls back to the default route,
/// prices lines from the source location and creates the picking.
#[tokio::test]
async fn given_request_without_route_when_run_then_picking_created_on_default_route() {
    // GIVEN: User, locations, product and picking type lookups, then create
    let server = MockServer::start().await;
    mount_authenticate(&server).await;
    mount_model(
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
    mount_model(&server, "hr.employee", list_xml(&[])).await;
    mount_model(
        &server,
        "stock.location",
        list_xml(&[
            record_xml(&[
                ("id", "<int>8</int>"),
                ("name", "<string>Stock</string>"),
                ("complete_name", "<string>PRINCIPAL1/Stock</string>"),
            ]),
            record_xml(&[
                ("id", "<int>12</int>"),
                ("name", "<string>Stock</string>"),
                ("complete_name", "<string>B1/Stock</string>"),
            ]),
        ]),
    )
    .await;
    mount_model(
        &server,
        "product.product",
        list_xml(&[record_xml(&[
            ("id", "<int>42</int>"),
            ("name", "<string>Paracetamol 500mg</string>"),
            ("qty_available", "<double>120.0</double>"),
            ("list_price", "<double>0.8</double>"),
        ])]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/object"))
        .and(body_string_contains("<string>stock.picking.type</string>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(&list_xml(&[
            record_xml(&[("id", "<int>5</int>")]),
        ]))))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/object"))
        .and(body_string_contains("<string>create</string>"))
        .and(body_string_contains("<name>location_dest_id</name>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>31</int>")))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = context(&server, &RelayConfig::default());

    // WHEN
    let output = commands::run(
        &cli(&["request", "--email", "rosa@sanjose.test", "--line", "42:3"]),
        &ctx,
    )
    .await
    .unwrap();

    // THEN
    assert_eq!(output, "Transfer request created: picking 31\n");
}

#[tokio::test]
async fn given_request_for_unknown_product_when_run_then_error_names_product() {
    let server = MockServer::start().await;
    mount_authenticate(&server).await;
    mount_model(
        &server,
        "res.users",
        list_xml(&[record_xml(&[
            ("id", "<int>9</int>"),
            ("name", "<string>Rosa Quispe</string>"),
            ("login", "<string>rosa@sanjose.test</string>"),
        ])]),
    )
    .await;
    mount_model(&server, "hr.employee", list_xml(&[])).await;
    mount_model(&server, "product.product", list_xml(&[])).await;
    let ctx = context(&server, &RelayConfig::default());

    let err = commands::run(
        &cli(&[
            "request", "--email", "rosa@sanjose.test", "--from", "8", "--to", "12", "--line", "77:1",
        ]),
        &ctx,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("product 77 not found"));
}

/// **VALUE**: A create that fails on the wire is reported, not replayed.
///
/// **BUG THIS CATCHES**: Would catch the relay retry wrapping the create,
/// which duplicates the picking when the ERP applied it before the failure.
#[tokio::test]
async fn given_create_fails_with_connectivity_when_requesting_then_create_is_sent_once() {
    // GIVEN: Every read succeeds; the create gets a 504
    let server = MockServer::start().await;
    mount_authenticate(&server).await;
    mount_model(
        &server,
        "res.users",
        list_xml(&[record_xml(&[
            ("id", "<int>9</int>"),
            ("name", "<string>Rosa Quispe</string>"),
            ("login", "<string>rosa@sanjose.test</string>"),
        ])]),
    )
    .await;
    mount_model(&server, "hr.employee", list_xml(&[])).await;
    mount_model(
        &server,
        "product.product",
        list_xml(&[record_xml(&[
            ("id", "<int>42</int>"),
            ("name", "<string>Paracetamol 500mg</string>"),
            ("qty_available", "<double>120.0</double>"),
            ("list_price", "<double>0.8</double>"),
        ])]),
    )
    .await;
    mount_model(&server, "stock.picking.type", list_xml(&[record_xml(&[("id", "<int>5</int>")])])).await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/object"))
        .and(body_string_contains("<string>create</string>"))
        .respond_with(ResponseTemplate::new(504))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    let ctx = context(&server, &RelayConfig::default());

    // WHEN
    let err = commands::run(
        &cli(&[
            "request", "--email", "rosa@sanjose.test", "--from", "8", "--to", "12", "--line", "42:3",
        ]),
        &ctx,
    )
    .await
    .unwrap_err();

    // THEN: Connectivity surfaced; the mock's expect(1) checks a single create
    assert!(err.is_connectivity());
    assert!(!ctx.client.prefers_relay());
}

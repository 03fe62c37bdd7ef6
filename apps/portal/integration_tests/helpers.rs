use odoo_core::config::{ConnectionConfig, RelayConfig};

use portal::cli::Cli;
use portal::commands::Context;

use clap::Parser;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn success_body(value_xml: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><params><param><value>{value_xml}</value></param></params></methodResponse>"
    )
}

pub fn record_xml(members: &[(&str, &str)]) -> String {
    let members: String = members
        .iter()
        .map(|(name, value)| format!("<member><name>{name}</name><value>{value}</value></member>"))
        .collect();
    format!("<value><struct>{members}</struct></value>")
}

pub fn list_xml(records: &[String]) -> String {
    format!("<array><data>{}</data></array>", records.concat())
}

pub fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("portal").chain(args.iter().copied())).unwrap()
}

pub fn context(server: &MockServer, relays: &RelayConfig) -> Context {
    let uri = server.uri();
    let connection = ConnectionConfig::from_lookup(|name| match name {
        "ODOO_URL" => Some(uri.clone()),
        "ODOO_DB" => Some(String::from("sanjose")),
        "ODOO_LOGIN" => Some(String::from("portal@sanjose.test")),
        "ODOO_API_KEY" => Some(String::from("k3y")),
        _ => None,
    })
    .unwrap();

    Context::new(connection, relays).unwrap()
}

/// Service account login always succeeds with uid 2.
pub async fn mount_authenticate(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/common"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body("<int>2</int>")))
        .mount(server)
        .await;
}

pub async fn mount_model(server: &MockServer, model: &str, value_xml: String) {
    Mock::given(method("POST"))
        .and(path("/xmlrpc/2/object"))
        .and(body_string_contains(format!("<string>{model}</string>")))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(&value_xml)))
        .mount(server)
        .await;
}

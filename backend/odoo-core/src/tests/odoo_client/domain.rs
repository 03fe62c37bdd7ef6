// Unit tests for filter domains and query keywords

use crate::codec::Value;
use crate::odoo_client::{CreateOptions, Domain, QueryOptions};

fn leaf(field: &str, operator: &str, value: Value) -> Value {
    Value::Array(vec![Value::from(field), Value::from(operator), value])
}

#[test]
fn given_or_prefix_when_building_domain_then_operator_precedes_its_operands() {
    // GIVEN / WHEN: type = product AND (name ilike x OR default_code ilike x)
    let domain: Value = Domain::new()
        .leaf("type", "=", "product")
        .or()
        .leaf("name", "ilike", "x")
        .leaf("default_code", "ilike", "x")
        .into();

    // THEN: Flat prefix list
    assert_eq!(
        domain,
        Value::Array(vec![
            leaf("type", "=", Value::from("product")),
            Value::from("|"),
            leaf("name", "ilike", Value::from("x")),
            leaf("default_code", "ilike", Value::from("x")),
        ])
    );
}

#[test]
fn given_empty_domain_when_converting_then_matches_every_record() {
    let domain = Domain::new();

    assert!(domain.is_empty());
    assert_eq!(Value::from(domain), Value::Array(Vec::new()));
}

#[test]
fn given_negation_and_conjunction_when_building_then_prefixes_are_kept() {
    let domain = Domain::new()
        .negate()
        .leaf("active", "=", false)
        .and()
        .leaf("usage", "=", "internal")
        .leaf("company_id", "=", 1);

    assert_eq!(domain.len(), 5);
}

#[test]
fn given_default_query_options_when_building_keywords_then_uses_80_and_id_desc() {
    // GIVEN: Defaults
    let options = QueryOptions::default();

    // WHEN: Building keywords for two fields
    let keywords = options.keywords(&["name", "state"]);

    // THEN: fields, limit, order; no offset or context
    assert_eq!(keywords.get("limit"), Some(&Value::Int(80)));
    assert_eq!(keywords.get("order").and_then(Value::as_str), Some("id desc"));
    assert_eq!(
        keywords.get("fields"),
        Some(&Value::Array(vec![Value::from("name"), Value::from("state")]))
    );
    assert!(keywords.get("offset").is_none());
    assert!(keywords.get("context").is_none());
}

#[test]
fn given_offset_and_context_when_building_keywords_then_both_are_included() {
    let keywords = QueryOptions::default()
        .with_limit(40)
        .with_offset(80)
        .with_context("location", 12)
        .keywords(&[]);

    assert_eq!(keywords.get("limit"), Some(&Value::Int(40)));
    assert_eq!(keywords.get("offset"), Some(&Value::Int(80)));
    assert_eq!(
        keywords.get("context").and_then(|c| c.get("location")),
        Some(&Value::Int(12))
    );
}

#[test]
fn given_create_options_without_context_when_building_keywords_then_none_are_sent() {
    assert!(CreateOptions::default().keywords().is_none());

    let keywords = CreateOptions::default()
        .with_context("tracking_disable", true)
        .keywords()
        .unwrap();
    assert_eq!(
        keywords.get("context").and_then(|c| c.get("tracking_disable")),
        Some(&Value::Bool(true))
    );
}

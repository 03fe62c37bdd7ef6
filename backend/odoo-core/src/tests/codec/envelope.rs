// Unit tests for request envelopes and response parsing

use crate::codec::{DecodeMode, FaultCode, Response, Value, build_envelope, parse_envelope};
use crate::error::CodecError;

fn parse(text: &str) -> Result<Response, CodecError> {
    parse_envelope(text, DecodeMode::Strict)
}

#[test]
fn given_method_and_params_when_building_envelope_then_params_keep_their_order() {
    // GIVEN: An authenticate call
    let params = [
        Value::from("sanjose"),
        Value::from("portal@sanjose.pe"),
        Value::from("k3y"),
        Value::Struct(Default::default()),
    ];

    // WHEN: Building the envelope
    let envelope = build_envelope("authenticate", &params).unwrap();

    // THEN: Bare methodCall, one param per value, in order
    assert_eq!(
        envelope,
        "<methodCall><methodName>authenticate</methodName><params>\
         <param><value><string>sanjose</string></value></param>\
         <param><value><string>portal@sanjose.pe</string></value></param>\
         <param><value><string>k3y</string></value></param>\
         <param><value><struct></struct></value></param>\
         </params></methodCall>"
    );
}

#[test]
fn given_no_params_when_building_envelope_then_params_element_is_empty() {
    let envelope = build_envelope("version", &[]).unwrap();

    assert_eq!(
        envelope,
        "<methodCall><methodName>version</methodName><params></params></methodCall>"
    );
}

#[test]
fn given_success_response_when_parsing_then_returns_value() {
    let body = r#"<?xml version="1.0"?>
<methodResponse>
  <params>
    <param><value><int>7</int></value></param>
  </params>
</methodResponse>"#;

    assert_eq!(parse(body).unwrap(), Response::Success(Value::Int(7)));
}

/// **VALUE**: Faults come back as data, with code and message intact.
///
/// **WHY THIS MATTERS**: The fault string is the only explanation a user
/// gets for "Access Denied" or a validation error from the ERP.
#[test]
fn given_fault_response_when_parsing_then_returns_fault_with_code_and_message() {
    // GIVEN: A fault envelope
    let body = "<methodResponse><fault><value><struct>\
        <member><name>faultCode</name><value><int>3</int></value></member>\
        <member><name>faultString</name><value><string>Access Denied</string></value></member>\
        </struct></value></fault></methodResponse>";

    // WHEN: Parsing
    let response = parse(body).unwrap();

    // THEN: Fault with both fields
    match response {
        Response::Fault(fault) => {
            assert_eq!(fault.code, FaultCode::Numeric(3));
            assert_eq!(fault.message, "Access Denied");
        }
        other => panic!("Expected fault, got {other:?}"),
    }
}

#[test]
fn given_fault_with_text_code_and_no_message_when_parsing_then_uses_generic_message() {
    let body = "<methodResponse><fault><value><struct>\
        <member><name>faultCode</name><value><string>warning</string></value></member>\
        </struct></value></fault></methodResponse>";

    let Response::Fault(fault) = parse(body).unwrap() else {
        panic!("Expected fault");
    };

    assert_eq!(fault.code, FaultCode::Text(String::from("warning")));
    assert_eq!(fault.message, "Unknown remote error");
}

#[test]
fn given_response_without_params_when_parsing_then_returns_structural_error() {
    let result = parse("<methodResponse></methodResponse>");

    let error = result.unwrap_err();
    assert!(matches!(error, CodecError::MissingElement { .. }));
    assert!(error.is_structural());
}

#[test]
fn given_html_error_page_when_parsing_then_returns_structural_error() {
    let result = parse("<html><body>methodResponse blocked</body></html>");

    assert!(result.unwrap_err().is_structural());
}

#[test]
fn given_truncated_xml_when_parsing_then_returns_xml_error() {
    let result = parse("<methodResponse><params><param>");

    assert!(matches!(result, Err(CodecError::Xml { .. })));
}

/// **BUG THIS CATCHES**: Treating a well-formed envelope with an unsupported
/// value as a transport problem, which would send it to the next relay.
#[test]
fn given_unknown_tag_inside_envelope_when_parsing_strictly_then_error_is_not_structural() {
    let body = "<methodResponse><params><param><value><base64>AA==</base64></value></param></params></methodResponse>";

    let error = parse(body).unwrap_err();

    assert!(matches!(error, CodecError::UnknownTag { .. }));
    assert!(!error.is_structural());
}

// Unit tests for value decoding
// Tag recognition, strict vs permissive handling of unknown tags

use crate::codec::{DecodeMode, Value, decode_fragment, encode};
use crate::error::CodecError;

use std::collections::BTreeMap;

use chrono::{TimeZone, Timelike, Utc};

fn strict(xml: &str) -> Result<Value, CodecError> {
    decode_fragment(xml, DecodeMode::Strict)
}

// ============================================
// SCALARS
// ============================================

#[test]
fn given_integer_tags_when_decoding_then_all_yield_int() {
    assert_eq!(strict("<value><int>7</int></value>").unwrap(), Value::Int(7));
    assert_eq!(strict("<value><i4>-3</i4></value>").unwrap(), Value::Int(-3));
    assert_eq!(
        strict("<value><i8>9000000000</i8></value>").unwrap(),
        Value::Int(9_000_000_000)
    );
}

/// **VALUE**: A `<value>` with bare text is a string.
///
/// **WHY THIS MATTERS**: XML-RPC makes `<string>` optional and the ERP omits
/// it in some responses; treating bare text as an error would break every
/// such call.
#[test]
fn given_untagged_text_when_decoding_then_returns_string_in_both_modes() {
    let xml = "<value>Botica 3</value>";

    assert_eq!(strict(xml).unwrap(), Value::from("Botica 3"));
    assert_eq!(
        decode_fragment(xml, DecodeMode::Permissive).unwrap(),
        Value::from("Botica 3")
    );
}

#[test]
fn given_boolean_tag_when_decoding_then_only_one_is_true() {
    assert_eq!(strict("<value><boolean>1</boolean></value>").unwrap(), Value::Bool(true));
    assert_eq!(strict("<value><boolean>0</boolean></value>").unwrap(), Value::Bool(false));
}

#[test]
fn given_double_tag_when_decoding_then_returns_double() {
    assert_eq!(strict("<value><double>12.5</double></value>").unwrap(), Value::Double(12.5));
}

#[test]
fn given_garbage_in_int_tag_when_decoding_then_returns_invalid_scalar() {
    let result = strict("<value><int>doce</int></value>");

    match result {
        Err(CodecError::InvalidScalar { tag, raw, .. }) => {
            assert_eq!(tag, "int");
            assert_eq!(raw, "doce");
        }
        other => panic!("Expected InvalidScalar, got {other:?}"),
    }
}

#[test]
fn given_compact_and_dashed_timestamps_when_decoding_then_both_parse() {
    let expected = Value::DateTime(Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap());

    assert_eq!(
        strict("<value><dateTime.iso8601>20260105T08:00:00</dateTime.iso8601></value>").unwrap(),
        expected
    );
    assert_eq!(
        strict("<value><dateTime.iso8601>2026-01-05T08:00:00</dateTime.iso8601></value>").unwrap(),
        expected
    );
}

#[test]
fn given_nil_tag_when_decoding_then_returns_nil() {
    assert!(strict("<value><nil/></value>").unwrap().is_nil());
}

// ============================================
// COMPOSITES
// ============================================

/// **VALUE**: Decodes a `search_read` record the way the ERP sends it,
/// relational field included.
#[test]
fn given_search_read_record_when_decoding_then_relation_reads_as_many2one() {
    // GIVEN: A product record with a uom_id relation and an unset code
    let xml = "<value><struct>\
        <member><name>id</name><value><int>42</int></value></member>\
        <member><name>default_code</name><value><boolean>0</boolean></value></member>\
        <member><name>uom_id</name><value><array><data>\
            <value><int>1</int></value><value><string>Unidades</string></value>\
        </data></array></value></member>\
        </struct></value>";

    // WHEN: Decoding
    let record = strict(xml).unwrap();

    // THEN: Fields are reachable by name
    assert_eq!(record.get("id").and_then(Value::as_i64), Some(42));
    assert_eq!(record.get("uom_id").and_then(Value::many2one), Some((1, "Unidades")));
    assert_eq!(record.get("default_code"), Some(&Value::Bool(false)));
}

#[test]
fn given_array_without_data_when_decoding_then_returns_empty_array() {
    assert_eq!(strict("<value><array/></value>").unwrap(), Value::Array(Vec::new()));
}

#[test]
fn given_pretty_printed_xml_when_decoding_then_whitespace_is_ignored() {
    let xml = "<value>\n  <array>\n    <data>\n      <value><int>1</int></value>\n    </data>\n  </array>\n</value>";

    assert_eq!(strict(xml).unwrap(), Value::Array(vec![Value::Int(1)]));
}

/// **VALUE**: Values survive an encode/decode trip unchanged.
///
/// **BUG THIS CATCHES**: Escaping on the way out not undone on the way in.
#[test]
fn given_record_with_special_characters_when_round_tripping_then_value_is_identical() {
    let value = Value::from([
        ("name", Value::from("Crema <50g> & gel")),
        ("qty", Value::Double(2.5)),
        ("active", Value::Bool(true)),
        ("tags", Value::from(vec!["a", "b"])),
    ]);

    let decoded = strict(&encode(&value).unwrap()).unwrap();

    assert_eq!(decoded, value);
}

/// **VALUE**: Every value kind, at its edges, decodes back to what was
/// encoded. Timestamps lose their sub-second part, nothing else changes.
///
/// **BUG THIS CATCHES**: Would catch a whole-number double coming back as an
/// int, extreme doubles losing precision, or empty containers vanishing.
#[test]
fn given_every_value_kind_when_round_tripping_then_only_sub_seconds_are_lost() {
    // GIVEN: Scalars at their limits and nested empty containers
    let stamp = Utc.with_ymd_and_hms(2026, 3, 14, 8, 30, 15).unwrap();
    let precise = stamp.with_nanosecond(987_654_321).unwrap();
    let value = |at| {
        Value::Array(vec![
            Value::Int(i64::MIN),
            Value::Int(i64::MAX),
            Value::Double(1e-300),
            Value::Double(f64::MAX),
            Value::Double(5.0),
            Value::Nil,
            Value::DateTime(at),
            Value::Array(Vec::new()),
            Value::Struct(BTreeMap::new()),
            Value::from([
                ("empty", Value::Array(vec![Value::Struct(BTreeMap::new())])),
                ("nested", Value::Array(vec![Value::Array(vec![Value::Nil])])),
            ]),
        ])
    };

    // WHEN
    let decoded = strict(&encode(&value(precise)).unwrap()).unwrap();

    // THEN
    assert_eq!(decoded, value(stamp));
}

// ============================================
// UNKNOWN TAGS
// ============================================

#[test]
fn given_unknown_tag_when_decoding_strictly_then_returns_unknown_tag() {
    let result = strict("<value><base64>SGVsbG8=</base64></value>");

    assert!(matches!(result, Err(CodecError::UnknownTag { ref tag, .. }) if tag == "base64"));
}

#[test]
fn given_unknown_tag_when_decoding_permissively_then_returns_raw_text() {
    let result = decode_fragment("<value><base64>SGVsbG8=</base64></value>", DecodeMode::Permissive);

    assert_eq!(result.unwrap(), Value::from("SGVsbG8="));
}

#[test]
fn given_fragment_not_rooted_at_value_when_decoding_then_returns_missing_element() {
    let result = strict("<param><int>1</int></param>");

    assert!(matches!(result, Err(CodecError::MissingElement { .. })));
}

// Unit tests for value encoding
// Tag selection, escaping and the values XML-RPC cannot carry

use crate::codec::{Value, encode, escape_text};
use crate::error::CodecError;

use chrono::{TimeZone, Utc};

// ============================================
// SCALARS
// ============================================

#[test]
fn given_scalars_when_encoding_then_each_uses_its_own_tag() {
    assert_eq!(encode(&Value::Int(42)).unwrap(), "<value><int>42</int></value>");
    assert_eq!(encode(&Value::Bool(true)).unwrap(), "<value><boolean>1</boolean></value>");
    assert_eq!(encode(&Value::Bool(false)).unwrap(), "<value><boolean>0</boolean></value>");
    assert_eq!(encode(&Value::Nil).unwrap(), "<value><nil/></value>");
    assert_eq!(
        encode(&Value::from("Botica 2")).unwrap(),
        "<value><string>Botica 2</string></value>"
    );
}

/// **VALUE**: A whole-number double still goes out as `<double>`.
///
/// **WHY THIS MATTERS**: Quantities like `5.0` sent as `<int>` change the
/// field type the ERP sees; `product_uom_qty` must stay a float.
///
/// **BUG THIS CATCHES**: Choosing the tag from the numeric value instead of
/// the variant.
#[test]
fn given_whole_number_double_when_encoding_then_uses_double_tag() {
    // GIVEN: A double with no fractional part
    let value = Value::Double(5.0);

    // WHEN: Encoding
    let xml = encode(&value).unwrap();

    // THEN: Tagged as double
    assert!(xml.starts_with("<value><double>"), "got: {xml}");
    assert!(!xml.contains("<int>"));
}

#[test]
fn given_non_finite_double_when_encoding_then_returns_unencodable_value() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = encode(&Value::Double(value));
        assert!(
            matches!(result, Err(CodecError::UnencodableValue { .. })),
            "{value} should be rejected"
        );
    }
}

#[test]
fn given_timestamp_when_encoding_then_uses_second_precision_iso_format() {
    let moment = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();

    let xml = encode(&Value::DateTime(moment)).unwrap();

    assert_eq!(
        xml,
        "<value><dateTime.iso8601>2026-03-14T09:30:00</dateTime.iso8601></value>"
    );
}

// ============================================
// ESCAPING
// ============================================

/// **VALUE**: Every markup character in user text is escaped.
///
/// **BUG THIS CATCHES**: A product search for `A&B <x>` producing an envelope
/// the ERP cannot parse.
#[test]
fn given_markup_characters_when_encoding_string_then_all_five_are_escaped() {
    // GIVEN: Text with every reserved character
    let value = Value::from(r#"A&B <x> "q" 'a'"#);

    // WHEN: Encoding
    let xml = encode(&value).unwrap();

    // THEN: No raw markup remains inside the string element
    assert_eq!(
        xml,
        "<value><string>A&amp;B &lt;x&gt; &quot;q&quot; &apos;a&apos;</string></value>"
    );
}

#[test]
fn given_plain_text_when_escaping_then_returns_it_unchanged() {
    assert_eq!(escape_text("ALMACÉN CENTRAL"), "ALMACÉN CENTRAL");
}

// ============================================
// COMPOSITES
// ============================================

#[test]
fn given_nested_array_and_struct_when_encoding_then_nests_in_order() {
    // GIVEN: A move line command (0, 0, {...})
    let value = Value::Array(vec![
        Value::Int(0),
        Value::Int(0),
        Value::from([("product_id", Value::Int(42)), ("name", Value::from("Aspirina"))]),
    ]);

    // WHEN: Encoding
    let xml = encode(&value).unwrap();

    // THEN: Array data holds the ints then the struct; members sorted by name
    assert_eq!(
        xml,
        "<value><array><data>\
         <value><int>0</int></value>\
         <value><int>0</int></value>\
         <value><struct>\
         <member><name>name</name><value><string>Aspirina</string></value></member>\
         <member><name>product_id</name><value><int>42</int></value></member>\
         </struct></value>\
         </data></array></value>"
    );
}

#[test]
fn given_nan_nested_in_struct_when_encoding_then_whole_encoding_fails() {
    let value = Value::from([("qty", Value::Double(f64::NAN))]);

    assert!(encode(&value).is_err());
}

#[test]
fn given_none_option_when_converting_then_becomes_nil() {
    let missing: Option<i64> = None;

    assert_eq!(Value::from(missing), Value::Nil);
    assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
}

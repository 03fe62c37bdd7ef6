use crate::codec::Value;
use crate::error::CodecError;

use common::ErrorLocation;

use std::panic::Location;

/// Wire format for timestamps; sub-second precision is dropped.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Encode a value as a complete `<value>…</value>` element.
///
/// # Errors
///
/// Returns [`CodecError::UnencodableValue`] for NaN or infinite doubles,
/// which XML-RPC has no spelling for.
pub fn encode(value: &Value) -> Result<String, CodecError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

/// Escape the five markup-reserved characters.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[track_caller]
pub(crate) fn write_value(out: &mut String, value: &Value) -> Result<(), CodecError> {
    out.push_str("<value>");

    match value {
        Value::Nil => out.push_str("<nil/>"),
        Value::Int(i) => {
            out.push_str("<int>");
            out.push_str(&i.to_string());
            out.push_str("</int>");
        }
        Value::Double(d) => {
            if !d.is_finite() {
                return Err(CodecError::UnencodableValue {
                    message: format!("double {d} has no XML-RPC representation"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            out.push_str("<double>");
            out.push_str(&d.to_string());
            out.push_str("</double>");
        }
        Value::Bool(b) => out.push_str(if *b {
            "<boolean>1</boolean>"
        } else {
            "<boolean>0</boolean>"
        }),
        Value::Text(s) => {
            out.push_str("<string>");
            out.push_str(&escape_text(s));
            out.push_str("</string>");
        }
        Value::DateTime(dt) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&dt.format(DATETIME_FORMAT).to_string());
            out.push_str("</dateTime.iso8601>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item)?;
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape_text(name));
                out.push_str("</name>");
                write_value(out, member)?;
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }

    out.push_str("</value>");
    Ok(())
}

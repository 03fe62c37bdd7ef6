use crate::codec::decode::child_element;
use crate::codec::encode::write_value;
use crate::codec::{DecodeMode, Value, decode, escape_text};
use crate::error::CodecError;

use common::ErrorLocation;

use std::fmt;
use std::panic::Location;

use roxmltree::Document;

const FAULT_CODE_MEMBER: &str = "faultCode";
const FAULT_STRING_MEMBER: &str = "faultString";
const UNKNOWN_FAULT_MESSAGE: &str = "Unknown remote error";

/// The ERP sends numeric codes for most faults and strings for some legacy ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultCode {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCode::Numeric(code) => write!(f, "{code}"),
            FaultCode::Text(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub code: FaultCode,
    pub message: String,
}

impl Fault {
    fn from_value(value: &Value) -> Self {
        let code = match value.get(FAULT_CODE_MEMBER) {
            Some(Value::Int(code)) => FaultCode::Numeric(*code),
            Some(Value::Text(code)) => FaultCode::Text(code.clone()),
            _ => FaultCode::Numeric(0),
        };

        let message = value
            .get(FAULT_STRING_MEMBER)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_FAULT_MESSAGE)
            .to_string();

        Self { code, message }
    }
}

/// A decoded `methodResponse`: exactly one of a value or a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Value),
    Fault(Fault),
}

/// Build a `methodCall` envelope with one `<param>` per value, in order.
pub fn build_envelope(method: &str, params: &[Value]) -> Result<String, CodecError> {
    let mut out = String::from("<methodCall><methodName>");
    out.push_str(&escape_text(method));
    out.push_str("</methodName><params>");

    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param)?;
        out.push_str("</param>");
    }

    out.push_str("</params></methodCall>");
    Ok(out)
}

/// Parse a `methodResponse` body.
///
/// # Errors
///
/// Structural errors ([`CodecError::is_structural`]) when the text is not XML,
/// is not a `methodResponse`, or holds neither a fault nor a result value.
/// Decoding errors for well-formed envelopes carrying values the mode rejects.
pub fn parse_envelope(text: &str, mode: DecodeMode) -> Result<Response, CodecError> {
    let document = Document::parse(text)?;
    let root = document.root_element();

    if !root.has_tag_name("methodResponse") {
        return Err(CodecError::MissingElement {
            element: String::from("methodResponse"),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if let Some(fault) = child_element(root, "fault") {
        let value = child_element(fault, "value").ok_or_else(|| CodecError::MissingElement {
            element: String::from("fault/value"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let decoded = decode(value, mode)?;
        return Ok(Response::Fault(Fault::from_value(&decoded)));
    }

    let value = child_element(root, "params")
        .and_then(|params| child_element(params, "param"))
        .and_then(|param| child_element(param, "value"))
        .ok_or_else(|| CodecError::MissingElement {
            element: String::from("params/param/value"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    decode(value, mode).map(Response::Success)
}

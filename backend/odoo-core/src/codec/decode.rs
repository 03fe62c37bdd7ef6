use crate::codec::Value;
use crate::error::CodecError;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y%m%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y%m%dT%H%M%S",
];

/// What to do with a child tag that is not an XML-RPC type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Fail with [`CodecError::UnknownTag`].
    #[default]
    Strict,
    /// Return the tag's raw text content.
    Permissive,
}

/// Decode a `<value>` node.
///
/// A `<value>` with no child element is a string, in either mode.
pub fn decode(node: Node<'_, '_>, mode: DecodeMode) -> Result<Value, CodecError> {
    let Some(child) = node.children().find(|n| n.is_element()) else {
        return Ok(Value::Text(text_content(node)));
    };

    let tag = child.tag_name().name().to_ascii_lowercase();

    match tag.as_str() {
        "string" => Ok(Value::Text(text_content(child))),
        "int" | "i4" | "i8" => parse_scalar::<i64>(child, &tag).map(Value::Int),
        "double" => parse_scalar::<f64>(child, &tag).map(Value::Double),
        "boolean" => Ok(Value::Bool(text_content(child).trim() == "1")),
        "datetime.iso8601" => {
            let raw = text_content(child);
            parse_datetime(&raw)
                .map(Value::DateTime)
                .ok_or_else(|| CodecError::InvalidScalar {
                    tag: tag.clone(),
                    raw,
                    location: ErrorLocation::from(Location::caller()),
                })
        }
        "array" => {
            let Some(data) = child_element(child, "data") else {
                return Ok(Value::Array(Vec::new()));
            };
            data.children()
                .filter(|n| n.is_element())
                .map(|item| decode(item, mode))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = BTreeMap::new();
            for member in child.children().filter(|n| n.has_tag_name("member")) {
                if let (Some(name), Some(value)) =
                    (child_element(member, "name"), child_element(member, "value"))
                {
                    members.insert(text_content(name), decode(value, mode)?);
                }
            }
            Ok(Value::Struct(members))
        }
        "nil" => Ok(Value::Nil),
        _ => match mode {
            DecodeMode::Strict => Err(CodecError::UnknownTag {
                tag: tag.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
            DecodeMode::Permissive => Ok(Value::Text(text_content(child))),
        },
    }
}

/// Parse and decode a standalone `<value>…</value>` document.
pub fn decode_fragment(text: &str, mode: DecodeMode) -> Result<Value, CodecError> {
    let document = Document::parse(text)?;
    let root = document.root_element();

    if !root.has_tag_name("value") {
        return Err(CodecError::MissingElement {
            element: String::from("value"),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    decode(root, mode)
}

pub(crate) fn child_element<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

pub(crate) fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

#[track_caller]
fn parse_scalar<T: FromStr>(node: Node<'_, '_>, tag: &str) -> Result<T, CodecError> {
    let raw = text_content(node);
    raw.trim().parse::<T>().map_err(|_| CodecError::InvalidScalar {
        tag: tag.to_string(),
        raw,
        location: ErrorLocation::from(Location::caller()),
    })
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

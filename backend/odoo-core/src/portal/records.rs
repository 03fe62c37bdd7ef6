//! Decoded ERP records to `models` types.

use crate::codec::Value;
use crate::error::PortalError;

use common::ErrorLocation;
use models::{
    Many2One, PosSession, PosSessionState, Product, StockLocation, Transfer, TransferState,
};

use std::panic::Location;

/// A field's value, with the ERP's `false` (and `nil`) for "unset" mapped to `None`.
pub fn present<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    match record.get(field)? {
        Value::Bool(false) | Value::Nil => None,
        value => Some(value),
    }
}

pub fn text(record: &Value, field: &str) -> Option<String> {
    present(record, field)?.as_str().map(str::to_string)
}

pub fn number(record: &Value, field: &str) -> f64 {
    present(record, field)
        .and_then(Value::as_f64)
        .unwrap_or_default()
}

pub fn relation(record: &Value, field: &str) -> Option<Many2One> {
    present(record, field)?
        .many2one()
        .map(|(id, name)| Many2One::new(id, name))
}

pub fn record_id(record: &Value) -> Result<i64, PortalError> {
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed("record has no integer id"))
}

fn required_text(record: &Value, field: &str) -> Result<String, PortalError> {
    text(record, field).ok_or_else(|| malformed(format!("record has no '{field}'")))
}

pub fn product(record: &Value) -> Result<Product, PortalError> {
    Ok(Product {
        id: record_id(record)?,
        name: required_text(record, "name")?,
        default_code: text(record, "default_code"),
        qty_available: number(record, "qty_available"),
        list_price: number(record, "list_price"),
        uom: relation(record, "uom_id"),
    })
}

pub fn location(record: &Value) -> Result<StockLocation, PortalError> {
    Ok(StockLocation {
        id: record_id(record)?,
        name: required_text(record, "name")?,
        complete_name: text(record, "complete_name"),
        pos_names: Vec::new(),
    })
}

pub fn transfer(record: &Value) -> Result<Transfer, PortalError> {
    let state = required_text(record, "state")?;

    Ok(Transfer {
        id: record_id(record)?,
        name: required_text(record, "name")?,
        origin: text(record, "origin"),
        state: state.parse::<TransferState>().map_err(malformed)?,
        scheduled_date: text(record, "scheduled_date"),
        source: relation(record, "location_id"),
        destination: relation(record, "location_dest_id"),
    })
}

pub fn pos_session(record: &Value) -> Result<PosSession, PortalError> {
    let state = required_text(record, "state")?;

    Ok(PosSession {
        id: record_id(record)?,
        name: required_text(record, "name")?,
        user: relation(record, "user_id"),
        start_at: text(record, "start_at"),
        state: state.parse::<PosSessionState>().map_err(malformed)?,
    })
}

/// Convert every record or fail on the first bad one.
pub fn convert_all<T>(
    records: &[Value],
    convert: impl Fn(&Value) -> Result<T, PortalError>,
) -> Result<Vec<T>, PortalError> {
    records.iter().map(convert).collect()
}

#[track_caller]
fn malformed(message: impl Into<String>) -> PortalError {
    PortalError::Record {
        message: message.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

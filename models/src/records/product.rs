use crate::Many2One;

use serde::{Deserialize, Serialize};

/// A sellable good with its on-hand quantity.
///
/// `qty_available` is relative to whatever stock location the query was
/// scoped to; without a location context it is the company-wide figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub default_code: Option<String>,
    pub qty_available: f64,
    pub list_price: f64,
    pub uom: Option<Many2One>,
}

impl Product {
    /// Unit of measure id to use on a stock move, falling back to "Units" (1).
    pub fn uom_id(&self) -> i64 {
        self.uom.as_ref().map(|u| u.id).unwrap_or(1)
    }
}

//! A branch's request to move stock from one internal location to another.

pub mod builder;

use crate::ErrorLocation;
use crate::error::model_error::ModelError;

use std::panic::Location;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: f64,
    pub uom_id: i64,
}

/// Request to move stock; build it with [`builder::TransferRequestBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_location: i64,
    pub destination_location: i64,
    pub lines: Vec<TransferLine>,
}

impl TransferRequest {
    /// Distinct locations, at least one line, every quantity positive.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.source_location == self.destination_location {
            return Err(ModelError::Validation {
                message: format!(
                    "Source and destination are the same location ({})",
                    self.source_location
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.lines.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("At least one product line is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(line) = self
            .lines
            .iter()
            .find(|l| !(l.quantity.is_finite() && l.quantity > 0.0))
        {
            return Err(ModelError::Validation {
                message: format!(
                    "Quantity for '{}' must be positive, got {}",
                    line.product_name, line.quantity
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    pub fn total_quantity(&self) -> f64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

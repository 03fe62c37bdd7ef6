use crate::error::model_error::ModelError;
use crate::{ErrorLocation, Product, TransferLine, TransferRequest};

use std::panic::Location;

/// Builder for a stock transfer request.
///
/// Works like the portal's cart: adding the same product twice merges the
/// quantities into one line.
#[derive(Debug, Default)]
pub struct TransferRequestBuilder {
    source_location: Option<i64>,
    destination_location: Option<i64>,
    lines: Vec<TransferLine>,
}

impl TransferRequestBuilder {
    pub fn with_source(mut self, location_id: i64) -> Self {
        self.source_location = Some(location_id);
        self
    }

    pub fn with_destination(mut self, location_id: i64) -> Self {
        self.destination_location = Some(location_id);
        self
    }

    pub fn with_line(
        mut self,
        product_id: i64,
        product_name: impl Into<String>,
        quantity: f64,
        uom_id: i64,
    ) -> Self {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(TransferLine {
                product_id,
                product_name: product_name.into(),
                quantity,
                uom_id,
            }),
        }
        self
    }

    pub fn with_product(self, product: &Product, quantity: f64) -> Self {
        let uom_id = product.uom_id();
        self.with_line(product.id, product.name.clone(), quantity, uom_id)
    }

    /// Build the request with validation.
    #[track_caller]
    pub fn build(self) -> Result<TransferRequest, ModelError> {
        let source_location = self.source_location.ok_or_else(|| ModelError::Validation {
            message: String::from("Source location is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let destination_location =
            self.destination_location
                .ok_or_else(|| ModelError::Validation {
                    message: String::from("Destination location is required"),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let request = TransferRequest {
            source_location,
            destination_location,
            lines: self.lines,
        };
        request.validate()?;

        Ok(request)
    }
}

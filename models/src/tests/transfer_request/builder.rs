use crate::{Many2One, ModelError, Product, TransferLine, TransferRequest, TransferRequestBuilder};

fn aspirin() -> Product {
    Product {
        id: 42,
        name: String::from("Aspirina 500mg"),
        default_code: Some(String::from("ASP500")),
        qty_available: 120.0,
        list_price: 0.5,
        uom: Some(Many2One::new(3, "Caja")),
    }
}

/// **VALUE**: Verifies that a request moving stock onto itself is rejected.
///
/// **WHY THIS MATTERS**: The ERP happily creates a picking with identical
/// source and destination, which then confuses stock valuation.
#[test]
fn given_same_source_and_destination_when_building_then_returns_validation_error() {
    // GIVEN: A request from location 8 to location 8
    let builder = TransferRequestBuilder::default()
        .with_source(8)
        .with_destination(8)
        .with_product(&aspirin(), 1.0);

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error naming the problem
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert!(message.contains("same location"), "got: {message}");
        }
    }
}

#[test]
fn given_empty_cart_when_building_then_returns_validation_error() {
    let result = TransferRequestBuilder::default()
        .with_source(8)
        .with_destination(12)
        .build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "At least one product line is required");
        }
    }
}

#[test]
fn given_missing_source_when_building_then_returns_validation_error() {
    let result = TransferRequestBuilder::default()
        .with_destination(12)
        .with_product(&aspirin(), 1.0)
        .build();

    assert!(result.is_err());
}

#[test]
fn given_zero_quantity_when_building_then_returns_validation_error() {
    let result = TransferRequestBuilder::default()
        .with_source(8)
        .with_destination(12)
        .with_product(&aspirin(), 0.0)
        .build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert!(message.contains("Aspirina 500mg"));
        }
    }
}

/// **VALUE**: Adding the same product twice behaves like the cart: one line,
/// summed quantity.
#[test]
fn given_same_product_twice_when_building_then_quantities_merge() {
    let request = TransferRequestBuilder::default()
        .with_source(8)
        .with_destination(12)
        .with_product(&aspirin(), 2.0)
        .with_product(&aspirin(), 1.0)
        .build()
        .unwrap();

    assert_eq!(request.lines.len(), 1);
    assert_eq!(request.lines[0].quantity, 3.0);
    assert_eq!(request.lines[0].uom_id, 3);
}

/// **VALUE**: A request assembled by hand gets the same checks as a built one.
///
/// **BUG THIS CATCHES**: Callers that bypass the builder submitting a zero
/// quantity line to the ERP.
#[test]
fn given_hand_built_request_with_zero_quantity_when_validating_then_returns_validation_error() {
    // GIVEN: A request constructed directly
    let request = TransferRequest {
        source_location: 8,
        destination_location: 12,
        lines: vec![TransferLine {
            product_id: 42,
            product_name: String::from("Aspirina 500mg"),
            quantity: 0.0,
            uom_id: 1,
        }],
    };

    // WHEN / THEN
    assert!(request.validate().is_err());
    assert_eq!(request.total_quantity(), 0.0);
}

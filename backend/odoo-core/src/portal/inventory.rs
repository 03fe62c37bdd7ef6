use crate::codec::Value;
use crate::error::PortalError;
use crate::odoo_client::{Domain, OdooClient, QueryOptions};
use crate::portal::records::{convert_all, location, product};

use models::{Product, StockLocation};

use log::debug;

const PRODUCT_MODEL: &str = "product.product";
const STOCK_FIELDS: [&str; 4] = ["name", "default_code", "qty_available", "list_price"];
const PRODUCT_FIELDS: [&str; 5] = [
    "name",
    "default_code",
    "qty_available",
    "list_price",
    "uom_id",
];

const LOCATION_MODEL: &str = "stock.location";
const LOCATION_FIELDS: [&str; 2] = ["name", "complete_name"];

/// Location name fragments the portal works with: branches B1 to B5 and the
/// main warehouse.
const PORTAL_LOCATION_PATTERNS: [&str; 8] =
    ["B1", "B2", "B3", "B4", "B5", "PRINCIPAL1", "PRINCIPAL", "PR/"];

const MAIN_WAREHOUSE_PATTERN: &str = "PRINCIPAL1";
const DEFAULT_DESTINATION_PATTERN: &str = "B1";

/// Registers selling out of each branch, first match wins.
const POS_BY_LOCATION: [(&[&str], &[&str]); 6] = [
    (&["B1"], &["Botica 1 CASA MIRIAM", "BOTICA 1 - CAJA B"]),
    (&["B2"], &["Botica 2"]),
    (&["B3"], &["Botica 3"]),
    (&["B4"], &["Botica 4"]),
    (&["B5"], &["Botica 0"]),
    (&["PRINCIPAL", "PR/"], &["ALMACÉN CENTRAL"]),
];

/// Every product with stock somewhere in the company, optionally narrowed to
/// a name or internal reference match.
pub async fn stock_on_hand(client: &OdooClient, search: &str) -> Result<Vec<Product>, PortalError> {
    let mut domain = Domain::new().leaf("qty_available", ">", 0);
    let search = search.trim();
    if !search.is_empty() {
        domain = domain
            .or()
            .leaf("name", "ilike", search)
            .leaf("default_code", "ilike", search);
    }

    let records = client
        .query_records(
            PRODUCT_MODEL,
            domain,
            &STOCK_FIELDS,
            &QueryOptions::default(),
        )
        .await?;

    convert_all(&records, product)
}

/// Storable products with their quantity at one location.
pub async fn products_in_stock(
    client: &OdooClient,
    location_id: i64,
    search: &str,
) -> Result<Vec<Product>, PortalError> {
    let records = client.query_products_in_stock(location_id, search).await?;
    convert_all(&records, product)
}

/// Specific products with their quantity at one location.
///
/// Unknown ids are simply absent from the result.
pub async fn products_by_id(
    client: &OdooClient,
    location_id: i64,
    ids: &[i64],
) -> Result<Vec<Product>, PortalError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    // One row per id at most; the default page would cut long carts short
    let limit = u32::try_from(ids.len()).unwrap_or(u32::MAX);
    let ids: Vec<Value> = ids.into_iter().map(Value::Int).collect();
    let records = client
        .query_records(
            PRODUCT_MODEL,
            Domain::new().leaf("id", "in", ids),
            &PRODUCT_FIELDS,
            &QueryOptions::default()
                .with_limit(limit)
                .with_context("location", location_id),
        )
        .await?;

    convert_all(&records, product)
}

/// Internal locations the portal can move stock between, each with the POS
/// registers it serves.
pub async fn internal_locations(client: &OdooClient) -> Result<Vec<StockLocation>, PortalError> {
    let records = client
        .query_records(
            LOCATION_MODEL,
            Domain::new().leaf("usage", "=", "internal"),
            &LOCATION_FIELDS,
            &QueryOptions::default(),
        )
        .await?;

    let total = records.len();
    let locations: Vec<StockLocation> = convert_all(&records, location)?
        .into_iter()
        .filter(|loc| is_portal_location(loc.display_path()))
        .map(|mut loc| {
            loc.pos_names = pos_names_for(loc.display_path());
            loc
        })
        .collect();

    debug!(
        "Kept {} of {total} internal locations for the portal",
        locations.len()
    );
    Ok(locations)
}

fn is_portal_location(path: &str) -> bool {
    let path = path.to_uppercase();
    PORTAL_LOCATION_PATTERNS.iter().any(|p| path.contains(p))
}

/// POS register names for a location path (case-insensitive).
pub fn pos_names_for(path: &str) -> Vec<String> {
    let path = path.to_uppercase();

    POS_BY_LOCATION
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| path.contains(p)))
        .map(|(_, names)| names.iter().map(|n| n.to_string()).collect())
        .unwrap_or_default()
}

/// Default `(source, destination)` for a new request: main warehouse to
/// branch B1, falling back to the first location for either end.
pub fn default_route(locations: &[StockLocation]) -> Option<(i64, i64)> {
    let first = locations.first()?.id;

    let find = |pattern: &str| {
        locations
            .iter()
            .find(|l| l.display_path().to_uppercase().contains(pattern))
            .map(|l| l.id)
            .unwrap_or(first)
    };

    Some((
        find(MAIN_WAREHOUSE_PATTERN),
        find(DEFAULT_DESTINATION_PATTERN),
    ))
}

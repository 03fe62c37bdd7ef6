use crate::codec::Value;
use crate::error::PortalError;
use crate::odoo_client::{CreateOptions, Domain, OdooClient, QueryOptions};
use crate::portal::records::{convert_all, record_id, transfer};

use models::{PortalUser, Transfer, TransferLine, TransferRequest};

use log::{info, warn};

const PICKING_MODEL: &str = "stock.picking";
const PICKING_TYPE_MODEL: &str = "stock.picking.type";
const TRANSFER_FIELDS: [&str; 6] = [
    "name",
    "origin",
    "state",
    "scheduled_date",
    "location_id",
    "location_dest_id",
];

const INTERNAL_PICKING_TYPE: &str = "Transferencias internas";
const FALLBACK_PICKING_TYPE_ID: i64 = 5;

/// Every picking the portal creates carries this origin prefix.
pub const ORIGIN_PREFIX: &str = "Solicitud App:";

/// One-to-many field holding the stock moves of a picking.
const MOVE_LINES_FIELD: &str = "move_lines";

/// Portal-created internal transfers. Admins see all of them; employees only
/// the ones they requested or created.
pub async fn internal_transfers(
    client: &OdooClient,
    user: &PortalUser,
) -> Result<Vec<Transfer>, PortalError> {
    let mut domain = Domain::new()
        .leaf("picking_type_id.name", "ilike", INTERNAL_PICKING_TYPE)
        .leaf("origin", "ilike", ORIGIN_PREFIX);

    if !user.role.sees_all_transfers() {
        domain = domain
            .or()
            .leaf("partner_id", "=", partner_value(user))
            .leaf("create_uid", "=", user.id);
    }

    let records = client
        .query_records(
            PICKING_MODEL,
            domain,
            &TRANSFER_FIELDS,
            &QueryOptions::default(),
        )
        .await?;

    convert_all(&records, transfer)
}

/// Create a draft internal picking for a request; returns the new picking id.
pub async fn submit_transfer_request(
    client: &OdooClient,
    user: &PortalUser,
    request: &TransferRequest,
) -> Result<i64, PortalError> {
    request.validate()?;

    let picking_type_id = internal_picking_type(client).await?;

    let move_lines: Vec<Value> = request
        .lines
        .iter()
        .map(|line| move_line(line, request, user.company_id))
        .collect();

    let values = Value::from([
        ("picking_type_id", Value::from(picking_type_id)),
        ("location_id", Value::from(request.source_location)),
        ("location_dest_id", Value::from(request.destination_location)),
        ("partner_id", partner_value(user)),
        ("origin", Value::from(format!("{ORIGIN_PREFIX} {}", user.name))),
        ("company_id", Value::from(user.company_id)),
        ("state", Value::from("draft")),
        (MOVE_LINES_FIELD, Value::Array(move_lines)),
    ]);

    let id = client
        .create_record(PICKING_MODEL, values, &CreateOptions::default())
        .await?;

    info!(
        "Transfer request {id} submitted by {}: {} line(s), {} unit(s) from {} to {}",
        user.login,
        request.lines.len(),
        request.total_quantity(),
        request.source_location,
        request.destination_location
    );
    Ok(id)
}

async fn internal_picking_type(client: &OdooClient) -> Result<i64, PortalError> {
    let types = client
        .query_records(
            PICKING_TYPE_MODEL,
            Domain::new().leaf("name", "ilike", INTERNAL_PICKING_TYPE),
            &["id"],
            &QueryOptions::default().with_limit(1),
        )
        .await?;

    match types.first() {
        Some(record) => record_id(record),
        None => {
            warn!(
                "No picking type named {INTERNAL_PICKING_TYPE}, using id {FALLBACK_PICKING_TYPE_ID}"
            );
            Ok(FALLBACK_PICKING_TYPE_ID)
        }
    }
}

/// `(0, 0, {...})`: create a stock move along with the picking.
fn move_line(line: &TransferLine, request: &TransferRequest, company_id: i64) -> Value {
    let values = Value::from([
        ("product_id", Value::from(line.product_id)),
        ("name", Value::from(line.product_name.as_str())),
        ("product_uom_qty", Value::from(line.quantity)),
        ("product_uom", Value::from(line.uom_id)),
        ("location_id", Value::from(request.source_location)),
        ("location_dest_id", Value::from(request.destination_location)),
        ("company_id", Value::from(company_id)),
    ]);

    Value::Array(vec![Value::Int(0), Value::Int(0), values])
}

/// The ERP takes `false` for "no partner".
fn partner_value(user: &PortalUser) -> Value {
    user.partner_id.map(Value::from).unwrap_or(Value::Bool(false))
}

use crate::codec::Value;
use crate::error::PortalError;
use crate::odoo_client::{Domain, OdooClient, QueryOptions};
use crate::portal::records::relation;

use models::DashboardCounters;

const PICKING_MODEL: &str = "stock.picking";
const PENDING_STATES: [&str; 3] = ["assigned", "confirmed", "draft"];
const DASHBOARD_FIELDS: [&str; 4] = ["picking_type_id", "location_id", "location_dest_id", "state"];

const MAIN_WAREHOUSE_MARKER: &str = "PR";
const STOCK_MARKER: &str = "Stock";
const BRANCH_MARKER: &str = "B1";

pub async fn dashboard_counters(client: &OdooClient) -> Result<DashboardCounters, PortalError> {
    let states: Vec<Value> = PENDING_STATES.iter().map(|s| Value::from(*s)).collect();

    let pickings = client
        .query_records(
            PICKING_MODEL,
            Domain::new().leaf("state", "in", states),
            &DASHBOARD_FIELDS,
            &QueryOptions::default(),
        )
        .await?;

    Ok(count_pending(&pickings))
}

/// Tally pending pickings per dashboard card. Pickings with an unset
/// location count toward the total only.
pub fn count_pending(pickings: &[Value]) -> DashboardCounters {
    let mut counters = DashboardCounters {
        pending_total: pickings.len(),
        ..Default::default()
    };

    for picking in pickings {
        let source = relation(picking, "location_id");
        let destination = relation(picking, "location_dest_id");

        let Some(destination) = destination else {
            continue;
        };

        if destination.name.contains(BRANCH_MARKER) {
            counters.branch_inbound += 1;
        }

        if let Some(source) = source
            && source.name.contains(MAIN_WAREHOUSE_MARKER)
            && destination.name.contains(STOCK_MARKER)
        {
            counters.main_internal += 1;
        }
    }

    counters
}

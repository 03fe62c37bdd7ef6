use crate::error::PortalError;
use crate::odoo_client::{Domain, OdooClient, QueryOptions};
use crate::portal::records::{convert_all, pos_session};

use models::PosSession;

const POS_SESSION_MODEL: &str = "pos.session";
const POS_SESSION_FIELDS: [&str; 4] = ["name", "user_id", "start_at", "state"];

/// Point-of-sale sessions, newest first.
pub async fn pos_sessions(client: &OdooClient) -> Result<Vec<PosSession>, PortalError> {
    let records = client
        .query_records(
            POS_SESSION_MODEL,
            Domain::new(),
            &POS_SESSION_FIELDS,
            &QueryOptions::default(),
        )
        .await?;

    convert_all(&records, pos_session)
}

use crate::cli::RequestLine;
use crate::commands::{Context, invalid_argument, login};
use crate::error::PortalAppError;

use odoo_core::portal;

use models::{PortalUser, TransferRequest, TransferRequestBuilder};

use log::debug;

/// Resolve the user, fill in a default route and look the products up at the
/// source. Read-only, so it can be retried.
pub async fn prepare(
    ctx: &Context,
    email: &str,
    from: Option<i64>,
    to: Option<i64>,
    lines: &[RequestLine],
) -> Result<(PortalUser, TransferRequest), PortalAppError> {
    let client = &ctx.client;
    let user = login(ctx, email).await?;

    let (source, destination) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            let locations = portal::internal_locations(client).await?;
            let (default_from, default_to) = portal::default_route(&locations)
                .ok_or_else(|| invalid_argument("no portal locations found; pass --from and --to"))?;
            debug!("Default route {default_from} -> {default_to}");
            (from.unwrap_or(default_from), to.unwrap_or(default_to))
        }
    };

    let ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
    let products = portal::products_by_id(client, source, &ids).await?;

    let mut builder = TransferRequestBuilder::default()
        .with_source(source)
        .with_destination(destination);

    for line in lines {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| invalid_argument(format!("product {} not found", line.product_id)))?;
        builder = builder.with_product(product, line.quantity);
    }

    let request = builder.build().map_err(|e| invalid_argument(e.to_string()))?;
    Ok((user, request))
}

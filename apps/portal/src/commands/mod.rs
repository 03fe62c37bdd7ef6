//! Command execution against the ERP.
//!
//! Every command authenticates with the service account inside
//! [`with_relay_retry`], so a connectivity failure during login is retried
//! the same way as one during the query. Creating records is never retried.

pub mod request;

use crate::cli::{Cli, Commands};
use crate::error::PortalAppError;
use crate::output::{Submitted, render};

use odoo_core::OdooClient;
use odoo_core::config::{ConnectionConfig, RelayConfig};
use odoo_core::portal;

use common::ErrorLocation;

use std::future::Future;
use std::panic::Location;
use std::path::PathBuf;

use log::{info, warn};

/// Connected client plus the service account it logs in with.
pub struct Context {
    pub client: OdooClient,
    pub connection: ConnectionConfig,
}

impl Context {
    /// Build from the environment and the relay table file.
    pub fn from_env(relays_path: Option<PathBuf>) -> Result<Self, PortalAppError> {
        let connection = ConnectionConfig::from_env()?;

        let relays = match relays_path.or_else(RelayConfig::default_path) {
            Some(path) => RelayConfig::load(&path)?,
            None => {
                warn!("No config directory on this platform, using direct delivery only");
                RelayConfig::default()
            }
        };

        Self::new(connection, &relays)
    }

    pub fn new(connection: ConnectionConfig, relays: &RelayConfig) -> Result<Self, PortalAppError> {
        let client = OdooClient::from_config(&connection, relays)?;

        info!(
            "Using {} on {} via {:?}",
            connection.database,
            connection.url,
            client.relays().names()
        );

        Ok(Self { client, connection })
    }

    pub async fn authenticate(&self) -> Result<i64, PortalAppError> {
        Ok(self
            .client
            .authenticate(&self.connection.login, &self.connection.api_key)
            .await?)
    }
}

/// Run an operation; if every strategy failed and relays were not yet
/// preferred, force relay preference on and run it once more.
///
/// The preference is put back if the retry fails too.
pub async fn with_relay_retry<T, F, Fut>(client: &OdooClient, operation: F) -> Result<T, PortalAppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, PortalAppError>>,
{
    match operation().await {
        Err(error) if error.is_connectivity() && !client.prefers_relay() => {
            warn!("Direct delivery failed, retrying through relays: {error}");
            client.set_prefer_relay(true);

            let retried = operation().await;
            if retried.is_err() {
                client.set_prefer_relay(false);
            }
            retried
        }
        other => other,
    }
}

/// Execute the parsed command line and return what should be printed.
pub async fn run(cli: &Cli, ctx: &Context) -> Result<String, PortalAppError> {
    let client = &ctx.client;
    let format = cli.output;

    match &cli.command {
        Commands::Login { email } => {
            let user = with_relay_retry(client, || login(ctx, email)).await?;
            render(&user, format)
        }
        Commands::Stock { search } => {
            let products = with_relay_retry(client, move || async move {
                ctx.authenticate().await?;
                Ok::<_, PortalAppError>(portal::stock_on_hand(client, search).await?)
            })
            .await?;
            render(products.as_slice(), format)
        }
        Commands::Products { location, search } => {
            let products = with_relay_retry(client, move || async move {
                ctx.authenticate().await?;
                Ok::<_, PortalAppError>(portal::products_in_stock(client, *location, search).await?)
            })
            .await?;
            render(products.as_slice(), format)
        }
        Commands::Locations => {
            let locations = with_relay_retry(client, move || async move {
                ctx.authenticate().await?;
                Ok::<_, PortalAppError>(portal::internal_locations(client).await?)
            })
            .await?;
            render(locations.as_slice(), format)
        }
        Commands::Transfers { email } => {
            let transfers = with_relay_retry(client, move || async move {
                let user = login(ctx, email).await?;
                Ok::<_, PortalAppError>(portal::internal_transfers(client, &user).await?)
            })
            .await?;
            render(transfers.as_slice(), format)
        }
        Commands::Pos => {
            let sessions = with_relay_retry(client, move || async move {
                ctx.authenticate().await?;
                Ok::<_, PortalAppError>(portal::pos_sessions(client).await?)
            })
            .await?;
            render(sessions.as_slice(), format)
        }
        Commands::Dashboard => {
            let counters = with_relay_retry(client, move || async move {
                ctx.authenticate().await?;
                Ok::<_, PortalAppError>(portal::dashboard_counters(client).await?)
            })
            .await?;
            render(&counters, format)
        }
        Commands::Request {
            email,
            from,
            to,
            lines,
        } => {
            let (user, request) = with_relay_retry(client, || {
                request::prepare(ctx, email, *from, *to, lines)
            })
            .await?;

            // Not retried: a create that reached the ERP before failing would
            // be applied twice.
            let picking_id = portal::submit_transfer_request(client, &user, &request).await?;
            render(&Submitted { picking_id }, format)
        }
    }
}

async fn login(ctx: &Context, email: &str) -> Result<models::PortalUser, PortalAppError> {
    Ok(portal::login_by_email(
        &ctx.client,
        &ctx.connection.login,
        &ctx.connection.api_key,
        email,
    )
    .await?)
}

#[track_caller]
pub(crate) fn invalid_argument(message: impl Into<String>) -> PortalAppError {
    PortalAppError::Portal {
        message: message.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

//! Command-line surface of the `portal` binary.

use crate::output::OutputFormat;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

/// San José pharmacy portal: stock, transfers and POS from the ERP.
///
/// Connection settings come from ODOO_URL, ODOO_DB, ODOO_LOGIN and
/// ODOO_API_KEY (a `.env` file is read if present).
#[derive(Parser, Debug)]
#[command(name = "portal", about = "San José pharmacy portal client")]
pub struct Cli {
    /// Relay table file (default: <config dir>/sanjose-portal/relays.toml).
    #[arg(long = "relays", global = true)]
    pub relays: Option<PathBuf>,

    /// Directory for portal.log (default: <data dir>/sanjose-portal/logs).
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log everything, including each relay attempt.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Resolve a portal user by email.
    Login {
        #[arg(long)]
        email: String,
    },

    /// Products with stock anywhere in the company.
    Stock {
        /// Match on name or internal reference.
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Storable products at one location.
    Products {
        /// Stock location id.
        #[arg(long)]
        location: i64,
        /// Match on name or internal reference.
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Branch and warehouse locations with their POS registers.
    Locations,

    /// Transfer requests visible to a user.
    Transfers {
        #[arg(long)]
        email: String,
    },

    /// Point-of-sale sessions.
    Pos,

    /// Pending picking counters.
    Dashboard,

    /// Request stock to be moved between two locations.
    Request {
        /// Requesting user's email.
        #[arg(long)]
        email: String,
        /// Source location id (default: main warehouse).
        #[arg(long = "from")]
        from: Option<i64>,
        /// Destination location id (default: branch B1).
        #[arg(long = "to")]
        to: Option<i64>,
        /// PRODUCT_ID:QUANTITY, repeatable.
        #[arg(long = "line", required = true)]
        lines: Vec<RequestLine>,
    },
}

/// One `--line PRODUCT_ID:QUANTITY` argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestLine {
    pub product_id: i64,
    pub quantity: f64,
}

impl FromStr for RequestLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, quantity) = s
            .split_once(':')
            .ok_or_else(|| format!("expected PRODUCT_ID:QUANTITY, got '{s}'"))?;

        let product_id = product
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid product id '{product}': {e}"))?;
        let quantity = quantity
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;

        Ok(Self {
            product_id,
            quantity,
        })
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.product_id, self.quantity)
    }
}

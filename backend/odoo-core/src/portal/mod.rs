//! The reads and writes the portal views are built on.
//!
//! Every function takes an [`OdooClient`](crate::OdooClient) that is already
//! authenticated with the service account, except [`login_by_email`], which
//! does that itself. Records come back as `models` types; the ERP's `false`
//! for an unset field becomes `None`.

pub mod dashboard;
pub mod inventory;
pub mod login;
pub mod pos;
pub mod records;
pub mod transfers;

pub use dashboard::{count_pending, dashboard_counters};
pub use inventory::{
    default_route, internal_locations, pos_names_for, products_by_id, products_in_stock,
    stock_on_hand,
};
pub use login::login_by_email;
pub use pos::pos_sessions;
pub use transfers::{internal_transfers, submit_transfer_request};

/// Display name of the company every portal user belongs to.
pub const COMPANY_NAME: &str = "CADENA DE BOTICAS SAN JOSE S.A.C.";

/// Company id used when the user record carries none.
pub const DEFAULT_COMPANY_ID: i64 = 1;

//! Portal records for the San José pharmacy chain.
//!
//! These are plain data structures for the records the portal reads from and
//! writes to the ERP. They carry no I/O and know nothing about the wire
//! format: `odoo-core` converts decoded values into them.

pub mod error;
pub mod records;
pub mod transfer_request;


pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use records::dashboard::DashboardCounters;
pub use records::location::StockLocation;
pub use records::many2one::Many2One;
pub use records::pos_session::{PosSession, PosSessionState};
pub use records::product::Product;
pub use records::transfer::{Transfer, TransferState};
pub use records::user::{PortalUser, UserRole};
pub use transfer_request::builder::TransferRequestBuilder;
pub use transfer_request::{TransferLine, TransferRequest};

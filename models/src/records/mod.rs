pub mod dashboard;
pub mod location;
pub mod many2one;
pub mod pos_session;
pub mod product;
pub mod transfer;
pub mod user;

pub mod catalog;
pub mod complaint;
pub mod compliance_sync;
pub mod user;

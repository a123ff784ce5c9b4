//! Best-effort replication of complaints to the external compliance
//! spreadsheet.
//!
//! A bounded queue feeds a dedicated worker task; every processed dispatch
//! appends exactly one audit row, success or failure. Nothing in here ever
//! propagates an error back to the operation that triggered the dispatch.

pub mod dispatcher;
pub mod payload;

pub use dispatcher::{SyncConfig, SyncDispatcher};
pub use payload::SheetsRow;

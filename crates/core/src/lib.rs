//! Domain logic for the coach complaint system.
//!
//! This crate has no internal dependencies so it can be used by the API,
//! repository, and sync layers alike. Everything here is pure: permission
//! decisions, validation rules, and status constants take their inputs as
//! arguments (including the current time) and touch no I/O.

pub mod complaint;
pub mod error;
pub mod evidence;
pub mod permission;
pub mod roles;
pub mod types;

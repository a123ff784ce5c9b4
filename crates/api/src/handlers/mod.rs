pub mod auth;
pub mod catalog;
pub mod complaints;
pub mod evidence;

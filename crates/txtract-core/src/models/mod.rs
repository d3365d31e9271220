//! Data models shared by the engine and its callers.

pub mod config;
pub mod transaction;

//! Shared building blocks for `lanscope`.
//!
//! Holds the record types every other crate passes around, the error type
//! returned by fallible scan operations, configuration, and the IPv4 helpers
//! used to turn user input into probe targets.

pub mod config;
pub mod error;
pub mod models;
pub mod network;

pub use config::ScanConfig;
pub use error::ScanError;

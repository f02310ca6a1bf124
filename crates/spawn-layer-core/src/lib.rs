//! spawn-layer core - platform-independent launch abstractions
//!
//! This crate provides the launch request and result types, the launcher
//! traits, the configuration and the error type shared by the
//! platform-specific strategy crates.

pub mod config;
pub mod error;
pub mod process;

pub use config::*;
pub use error::*;
pub use process::*;

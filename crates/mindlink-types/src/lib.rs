//! Core types shared across the mindlink crates.
//!
//! - [`config`]: process configuration resolved once at start-up
//! - [`error`]: the shared error enum

pub mod config;
pub mod error;

pub use config::{BridgeConfig, MailboxConfig};
pub use error::MindlinkError;

//! Keyring Core - Shared functionality for the keyring tool
//!
//! Where the keyring lives, how the tool is configured, and what
//! permissions the files on disk should carry.

pub mod config;
pub mod paths;
pub mod perms;

pub use config::{CredentialMode, GeneratorConfig, KeyringConfig};
pub use paths::Paths;

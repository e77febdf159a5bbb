//! Keyring error types
//!
//! Aggregates the errors of each layer into one enum for the engine
//! boundary. [`ErrorKind`] flattens them for exit codes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::container::FormatError;
use crate::item::SchemaError;
use crate::seal::{DecryptError, EncryptError};

/// Top-level error type for keyring operations
#[derive(Error, Debug)]
pub enum KeyringError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("An item named {0:?} already exists")]
    DuplicateName(String),

    #[error("Invalid item name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Item {name:?} failed validation: {source}")]
    Schema {
        name: String,
        #[source]
        source: SchemaError,
    },

    #[error("Keyring format error: {0}")]
    Format(#[from] FormatError),

    #[error("Failed to decrypt keyring: {0}")]
    Decrypt(#[from] DecryptError),

    #[error("Failed to encrypt keyring: {0}")]
    Encrypt(#[from] EncryptError),

    #[error("Keyring file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Keyring already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Keyring {0} is locked by another process")]
    Locked(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Flat classification of [`KeyringError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DuplicateName,
    InvalidName,
    Schema,
    Format,
    WrongCredential,
    Decrypt,
    Encrypt,
    FileNotFound,
    AlreadyExists,
    Locked,
    Io,
}

impl KeyringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyringError::NotFound(_) => ErrorKind::NotFound,
            KeyringError::DuplicateName(_) => ErrorKind::DuplicateName,
            KeyringError::InvalidName { .. } => ErrorKind::InvalidName,
            KeyringError::Schema { .. } => ErrorKind::Schema,
            KeyringError::Format(_) => ErrorKind::Format,
            KeyringError::Decrypt(DecryptError::WrongCredential)
            | KeyringError::Decrypt(DecryptError::CredentialMismatch { .. }) => {
                ErrorKind::WrongCredential
            }
            KeyringError::Decrypt(_) => ErrorKind::Decrypt,
            KeyringError::Encrypt(_) => ErrorKind::Encrypt,
            KeyringError::FileNotFound(_) => ErrorKind::FileNotFound,
            KeyringError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            KeyringError::Locked(_) => ErrorKind::Locked,
            KeyringError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn schema(name: &str, source: SchemaError) -> Self {
        KeyringError::Schema {
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        KeyringError::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyringError>;

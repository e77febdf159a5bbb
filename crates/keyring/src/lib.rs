//! keyring - an encrypted file of named, typed secrets
//!
//! "If the tool is lost, the secrets are not."
//!
//! A keyring is a ZIP archive of JSON and text items sealed in an age
//! envelope. `age -d` followed by `unzip` recovers everything by hand.
//!
//! Layers, outermost first:
//! - [`seal`]: age encryption with a passphrase or X25519 identity
//! - [`container`]: the ZIP archive, magic entry and manifest
//! - [`item`] / [`login`]: per-mimetype payload codecs
//! - [`keyring`]: the engine tying them together
//! - [`store`]: atomic saves and locking on disk

pub mod container;
pub mod error;
pub mod generate;
pub mod item;
pub mod keyring;
pub mod login;
pub mod seal;
pub mod store;

pub use error::{ErrorKind, KeyringError, Result};
pub use item::{ItemCodec, ItemRegistry, ItemValue, SchemaError, LOGIN_MIMETYPE, TEXT_MIMETYPE};
pub use keyring::{AddOptions, ItemEntry, ItemMetadata, Keyring, KeyringState};
pub use login::{LoginItem, Password, SecurityQuestion};
pub use seal::Credential;
pub use store::KeyringLock;

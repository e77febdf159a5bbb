//! Item codec - typed item payloads to and from their stored bytes
//!
//! Every item on a keyring carries a mimetype. The mimetype selects an
//! [`ItemCodec`] from an [`ItemRegistry`]; the codec validates payload bytes
//! and maps them to an [`ItemValue`]. Mimetypes without a registered codec
//! are carried as opaque bytes.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::login::{LoginCodec, LoginItem};

/// Mimetype of login/password items
pub const LOGIN_MIMETYPE: &str = "application/prs.thanatos.keyring.password+json";

/// Mimetype of free-text items
pub const TEXT_MIMETYPE: &str = "text/plain; charset=utf-8";

/// An item payload that failed its type's validation
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{mimetype} payload is not valid JSON: {source}")]
    Syntax {
        mimetype: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{mimetype} payload does not match its schema: {source}")]
    Shape {
        mimetype: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{mimetype} payload is not valid UTF-8")]
    NotUtf8 { mimetype: String },

    #[error("{mimetype} payload is missing the required field `{field}`")]
    MissingField {
        mimetype: String,
        field: &'static str,
    },

    #[error("a {value} value cannot be stored as {mimetype}")]
    WrongValue {
        mimetype: String,
        value: &'static str,
    },
}

/// Decoded form of an item payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue {
    Login(LoginItem),
    Text(String),
    /// Payload of a mimetype with no registered codec
    Raw(Vec<u8>),
}

impl ItemValue {
    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ItemValue::Login(_) => "login",
            ItemValue::Text(_) => "text",
            ItemValue::Raw(_) => "raw",
        }
    }

    pub fn as_login(&self) -> Option<&LoginItem> {
        match self {
            ItemValue::Login(login) => Some(login),
            _ => None,
        }
    }
}

impl From<LoginItem> for ItemValue {
    fn from(login: LoginItem) -> Self {
        ItemValue::Login(login)
    }
}

/// Encoder/decoder for one item mimetype
pub trait ItemCodec: Send + Sync {
    /// The mimetype this codec handles
    fn mimetype(&self) -> &str;

    /// Human-readable description of the payload schema
    fn schema(&self) -> &str;

    fn encode(&self, value: &ItemValue) -> Result<Vec<u8>, SchemaError>;

    fn decode(&self, data: &[u8]) -> Result<ItemValue, SchemaError>;
}

/// Free text, stored as UTF-8
pub struct TextCodec;

impl ItemCodec for TextCodec {
    fn mimetype(&self) -> &str {
        TEXT_MIMETYPE
    }

    fn schema(&self) -> &str {
        "UTF-8 text"
    }

    fn encode(&self, value: &ItemValue) -> Result<Vec<u8>, SchemaError> {
        match value {
            ItemValue::Text(text) => Ok(text.as_bytes().to_vec()),
            other => Err(SchemaError::WrongValue {
                mimetype: TEXT_MIMETYPE.to_string(),
                value: other.kind(),
            }),
        }
    }

    fn decode(&self, data: &[u8]) -> Result<ItemValue, SchemaError> {
        std::str::from_utf8(data)
            .map(|s| ItemValue::Text(s.to_string()))
            .map_err(|_| SchemaError::NotUtf8 {
                mimetype: TEXT_MIMETYPE.to_string(),
            })
    }
}

/// Codecs keyed by mimetype
pub struct ItemRegistry {
    codecs: BTreeMap<String, Box<dyn ItemCodec>>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::builtin(false)
    }
}

impl ItemRegistry {
    /// A registry with no codecs; every mimetype is opaque
    pub fn empty() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// The built-in login and text codecs
    pub fn builtin(require_password: bool) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(LoginCodec { require_password }));
        registry.register(Box::new(TextCodec));
        registry
    }

    /// Register a codec, returning the one it replaced
    pub fn register(&mut self, codec: Box<dyn ItemCodec>) -> Option<Box<dyn ItemCodec>> {
        self.codecs.insert(codec.mimetype().to_string(), codec)
    }

    pub fn get(&self, mimetype: &str) -> Option<&dyn ItemCodec> {
        self.codecs.get(mimetype).map(|c| c.as_ref())
    }

    pub fn is_registered(&self, mimetype: &str) -> bool {
        self.codecs.contains_key(mimetype)
    }

    /// Registered mimetypes, sorted
    pub fn mimetypes(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// Encode `value` as a `mimetype` payload
    ///
    /// Raw bytes are accepted for any mimetype; for a registered one they
    /// must pass that codec's decoder.
    pub fn encode(&self, mimetype: &str, value: &ItemValue) -> Result<Vec<u8>, SchemaError> {
        match (self.get(mimetype), value) {
            (Some(codec), ItemValue::Raw(data)) => {
                codec.decode(data)?;
                Ok(data.clone())
            }
            (Some(codec), value) => codec.encode(value),
            (None, ItemValue::Raw(data)) => Ok(data.clone()),
            (None, value) => Err(SchemaError::WrongValue {
                mimetype: mimetype.to_string(),
                value: value.kind(),
            }),
        }
    }

    /// Decode a `mimetype` payload
    pub fn decode(&self, mimetype: &str, data: &[u8]) -> Result<ItemValue, SchemaError> {
        match self.get(mimetype) {
            Some(codec) => codec.decode(data),
            None => Ok(ItemValue::Raw(data.to_vec())),
        }
    }

    /// Check a payload without keeping the decoded value
    pub fn validate(&self, mimetype: &str, data: &[u8]) -> Result<(), SchemaError> {
        self.decode(mimetype, data).map(|_| ())
    }
}

//! Login items: username, email, password and security questions
//!
//! Stored as a JSON object:
//!
//! ```json
//! {"username": "bob", "email": "bob@example.com", "password": "hunter2",
//!  "security_questions": [{"q": "First pet?", "a": "Rex"}]}
//! ```
//!
//! Every field is optional. Unknown top-level keys are rejected, and each
//! security question must have exactly the string fields `q` and `a`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::item::{ItemCodec, ItemValue, SchemaError, LOGIN_MIMETYPE};

/// A password held in memory; redacted in `Debug`, wiped on drop
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Password(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Password(s)
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Password(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginItem {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub password: Option<Password>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_questions: Vec<SecurityQuestion>,
}

/// An optional field that, when present, must hold a value; `null` is rejected
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl LoginItem {
    /// Username if present, else email
    pub fn account(&self) -> Option<&str> {
        self.username.as_deref().or(self.email.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct SecurityQuestion {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}

impl TryFrom<BTreeMap<String, String>> for SecurityQuestion {
    type Error = String;

    fn try_from(mut fields: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let question = fields
            .remove("q")
            .ok_or_else(|| "security question is missing `q`".to_string())?;
        let answer = fields
            .remove("a")
            .ok_or_else(|| "security question is missing `a`".to_string())?;
        if let Some(extra) = fields.keys().next() {
            return Err(format!("security question has unexpected key `{}`", extra));
        }
        Ok(SecurityQuestion { question, answer })
    }
}

/// Codec for [`LOGIN_MIMETYPE`]
pub struct LoginCodec {
    /// Reject logins without a password
    pub require_password: bool,
}

impl LoginCodec {
    fn check(&self, login: &LoginItem) -> Result<(), SchemaError> {
        if self.require_password && login.password.is_none() {
            return Err(SchemaError::MissingField {
                mimetype: LOGIN_MIMETYPE.to_string(),
                field: "password",
            });
        }
        Ok(())
    }
}

impl ItemCodec for LoginCodec {
    fn mimetype(&self) -> &str {
        LOGIN_MIMETYPE
    }

    fn schema(&self) -> &str {
        if self.require_password {
            "object: username?, email?, password, security_questions?: [{q, a}]"
        } else {
            "object: username?, email?, password?, security_questions?: [{q, a}]"
        }
    }

    fn encode(&self, value: &ItemValue) -> Result<Vec<u8>, SchemaError> {
        let login = match value {
            ItemValue::Login(login) => login,
            other => {
                return Err(SchemaError::WrongValue {
                    mimetype: LOGIN_MIMETYPE.to_string(),
                    value: other.kind(),
                })
            }
        };
        self.check(login)?;
        serde_json::to_vec(login).map_err(|source| SchemaError::Shape {
            mimetype: LOGIN_MIMETYPE.to_string(),
            source,
        })
    }

    fn decode(&self, data: &[u8]) -> Result<ItemValue, SchemaError> {
        let json: serde_json::Value =
            serde_json::from_slice(data).map_err(|source| SchemaError::Syntax {
                mimetype: LOGIN_MIMETYPE.to_string(),
                source,
            })?;

        // serde would also accept a positional array for a struct
        if !json.is_object() {
            return Err(SchemaError::Shape {
                mimetype: LOGIN_MIMETYPE.to_string(),
                source: serde_json::Error::invalid_type(unexpected(&json), &"a JSON object"),
            });
        }

        let login: LoginItem =
            serde_json::from_value(json).map_err(|source| SchemaError::Shape {
                mimetype: LOGIN_MIMETYPE.to_string(),
                source,
            })?;
        self.check(&login)?;
        Ok(ItemValue::Login(login))
    }
}

fn unexpected(value: &serde_json::Value) -> Unexpected<'_> {
    match value {
        serde_json::Value::Null => Unexpected::Unit,
        serde_json::Value::Bool(b) => Unexpected::Bool(*b),
        serde_json::Value::Number(_) => Unexpected::Other("number"),
        serde_json::Value::String(s) => Unexpected::Str(s),
        serde_json::Value::Array(_) => Unexpected::Seq,
        serde_json::Value::Object(_) => Unexpected::Map,
    }
}

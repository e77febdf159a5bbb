//! YAML item documents, used by get, edit, import and export
//!
//! ```yaml
//! name: bank
//! mimetype: application/prs.thanatos.keyring.password+json
//! data_encoding: json
//! data:
//!   username: bob
//!   password: hunter2
//! ```

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

use keyring::ItemEntry;

/// How the `data` of a [`YamlItem`] maps to payload bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataEncoding {
    /// A YAML value, stored as JSON
    Json,
    /// A string, stored as UTF-8
    Text,
    /// A base64 string, stored decoded
    Base64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlItem {
    pub name: String,
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    pub data_encoding: DataEncoding,
    pub data: serde_yaml::Value,
}

impl YamlItem {
    /// Pick the most readable encoding that reproduces the payload
    pub fn from_entry(name: &str, entry: &ItemEntry) -> Self {
        let json = if is_json_mimetype(&entry.mimetype) {
            serde_json::from_slice::<serde_json::Value>(&entry.payload)
                .ok()
                .and_then(|v| serde_yaml::to_value(v).ok())
        } else {
            None
        };

        let (data_encoding, data) = match json {
            Some(value) => (DataEncoding::Json, value),
            None => match std::str::from_utf8(&entry.payload) {
                Ok(text) => (DataEncoding::Text, serde_yaml::Value::String(text.to_string())),
                Err(_) => (
                    DataEncoding::Base64,
                    serde_yaml::Value::String(
                        base64::engine::general_purpose::STANDARD.encode(&entry.payload),
                    ),
                ),
            },
        };

        YamlItem {
            name: name.to_string(),
            mimetype: entry.mimetype.clone(),
            hidden: entry.hidden,
            data_encoding,
            data,
        }
    }

    /// Payload bytes for the keyring
    pub fn encode_data(&self) -> Result<Vec<u8>> {
        match self.data_encoding {
            DataEncoding::Json => serde_json::to_vec(&self.data)
                .with_context(|| format!("`data` of {:?} cannot be represented as JSON", self.name)),
            DataEncoding::Text => Ok(self.data_string()?.as_bytes().to_vec()),
            DataEncoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(self.data_string()?)
                .with_context(|| format!("`data` of {:?} should have been base64, but wasn't", self.name)),
        }
    }

    fn data_string(&self) -> Result<&str> {
        match &self.data {
            serde_yaml::Value::String(s) => Ok(s),
            _ => bail!("`data` of {:?} should have contained a string, but didn't", self.name),
        }
    }
}

fn is_json_mimetype(mimetype: &str) -> bool {
    let essence = mimetype.split(';').next().unwrap_or_default().trim();
    essence == "application/json" || essence.ends_with("+json")
}

fn is_false(b: &bool) -> bool {
    !b
}

/// Parse a stream of `---`-separated item documents
pub fn read_items<R: Read>(reader: R) -> Result<Vec<YamlItem>> {
    let mut items = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_reader(reader).enumerate() {
        let item = YamlItem::deserialize(document)
            .with_context(|| format!("failed to read YAML item #{}", index + 1))?;
        items.push(item);
    }
    Ok(items)
}

/// Write one document per item
pub fn write_items<'a, W, I>(mut writer: W, items: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a YamlItem>,
{
    for item in items {
        writer.write_all(b"---\n")?;
        serde_yaml::to_writer(&mut writer, item)?;
    }
    writer.flush()?;
    Ok(())
}

//! Container - the ZIP archive inside the encrypted envelope
//!
//! Layout:
//! - `META-INF/MAGIC`    - the fixed string [`MAGIC`], stored uncompressed
//! - `META-INF/CONTENTS` - JSON manifest: `{name: {"type": mimetype, "hidden": bool}}`
//! - `items/<name>`      - one entry per item payload
//!
//! Any ZIP tool can list and extract it once the outer layer is decrypted.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Contents of the magic entry
pub const MAGIC: &str = "application/prs.thanatos.keyring";

pub const MAGIC_ENTRY: &str = "META-INF/MAGIC";
pub const MANIFEST_ENTRY: &str = "META-INF/CONTENTS";

/// Namespace of the metadata entries
pub const META_PREFIX: &str = "META-INF/";
/// Namespace of the item payloads
pub const ITEM_PREFIX: &str = "items/";

/// The decrypted data is not a well-formed keyring archive
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("not a ZIP archive: {0}")]
    NotAnArchive(#[source] ZipError),

    #[error("not a keyring file (the magic did not match)")]
    BadMagic,

    #[error("keyring archive has no {MANIFEST_ENTRY} entry")]
    MissingManifest,

    #[error("keyring manifest is malformed: {0}")]
    BadManifest(#[source] serde_json::Error),

    #[error("manifest lists item {0:?} but the archive has no payload for it")]
    MissingItem(String),

    #[error("archive entry {entry} is truncated or corrupt: {source}")]
    Truncated {
        entry: String,
        #[source]
        source: io::Error,
    },

    #[error("ZIP archive error: {0}")]
    Archive(#[from] ZipError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Per-item metadata kept in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "type")]
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

/// Item name to metadata, without payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(pub BTreeMap<String, ManifestEntry>);

impl Manifest {
    pub fn to_json(&self) -> Result<Vec<u8>, FormatError> {
        serde_json::to_vec(self).map_err(FormatError::BadManifest)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, FormatError> {
        serde_json::from_slice(data).map_err(FormatError::BadManifest)
    }
}

/// An unpacked archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    pub magic: Vec<u8>,
    pub manifest: Vec<u8>,
    /// Payloads keyed by item name (without the `items/` prefix)
    pub items: BTreeMap<String, Vec<u8>>,
}

/// Build the archive bytes
///
/// Entry order in the result carries no meaning.
pub fn pack<'a, I>(magic: &[u8], manifest: &[u8], items: I) -> Result<Vec<u8>, FormatError>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(MAGIC_ENTRY, entry_options(CompressionMethod::Stored))?;
    writer.write_all(magic)?;

    writer.start_file(MANIFEST_ENTRY, entry_options(CompressionMethod::Deflated))?;
    writer.write_all(manifest)?;

    let mut count = 0usize;
    for (name, payload) in items {
        writer.start_file(item_entry(name), entry_options(CompressionMethod::Deflated))?;
        writer.write_all(payload)?;
        count += 1;
    }

    let data = writer.finish()?.into_inner();
    tracing::debug!(items = count, bytes = data.len(), "packed archive");
    Ok(data)
}

/// Split archive bytes back into magic, manifest and payloads
pub fn unpack(data: &[u8]) -> Result<Archive, FormatError> {
    let mut zip = ZipArchive::new(Cursor::new(data)).map_err(FormatError::NotAnArchive)?;

    let mut magic = None;
    let mut manifest = None;
    let mut items = BTreeMap::new();

    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|source| FormatError::Truncated {
                entry: name.clone(),
                source,
            })?;

        if name == MAGIC_ENTRY {
            magic = Some(content);
        } else if name == MANIFEST_ENTRY {
            manifest = Some(content);
        } else if let Some(item_name) = name.strip_prefix(ITEM_PREFIX) {
            items.insert(item_name.to_string(), content);
        } else if name.starts_with(META_PREFIX) {
            tracing::debug!(entry = %name, "ignoring unknown metadata entry");
        } else {
            tracing::warn!(entry = %name, "ignoring unknown archive entry");
        }
    }

    let magic = magic.ok_or(FormatError::BadMagic)?;
    if magic != MAGIC.as_bytes() {
        return Err(FormatError::BadMagic);
    }
    let manifest = manifest.ok_or(FormatError::MissingManifest)?;

    tracing::debug!(items = items.len(), "unpacked archive");
    Ok(Archive {
        magic,
        manifest,
        items,
    })
}

/// Archive entry name of an item payload
pub fn item_entry(name: &str) -> String {
    format!("{}{}", ITEM_PREFIX, name)
}

fn entry_options(method: CompressionMethod) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(0o600)
}

fn is_false(b: &bool) -> bool {
    !b
}

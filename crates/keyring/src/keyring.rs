//! Keyring - the in-memory keyring and its read/write paths
//!
//! Write path: items -> manifest + payloads -> ZIP archive -> age envelope.
//! Read path is the mirror. Item payloads are kept as bytes and decoded on
//! demand, so one malformed item never hides the others.

use std::collections::{btree_map, BTreeMap};
use std::fmt;

use crate::container::{self, Manifest, ManifestEntry, MAGIC};
use crate::error::{KeyringError, Result};
use crate::item::{ItemRegistry, ItemValue};
use crate::seal::{self, Credential};

/// One stored item
#[derive(Clone, PartialEq, Eq)]
pub struct ItemEntry {
    pub mimetype: String,
    /// Left out of default listings
    pub hidden: bool,
    pub payload: Vec<u8>,
}

impl fmt::Debug for ItemEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemEntry")
            .field("mimetype", &self.mimetype)
            .field("hidden", &self.hidden)
            .field("payload", &format_args!("<{} bytes>", self.payload.len()))
            .finish()
    }
}

/// Listing row: name and metadata, no payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMetadata<'a> {
    pub name: &'a str,
    pub mimetype: &'a str,
    pub hidden: bool,
}

/// Whether the in-memory keyring differs from what was last opened or saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyringState {
    Open,
    Dirty,
}

/// Options for [`Keyring::add_item`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    pub hidden: bool,
    /// Replace an existing item of the same name instead of failing
    pub overwrite: bool,
}

impl AddOptions {
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Default::default()
        }
    }

    pub fn overwrite() -> Self {
        Self {
            overwrite: true,
            ..Default::default()
        }
    }
}

/// An open keyring
pub struct Keyring {
    items: BTreeMap<String, ItemEntry>,
    registry: ItemRegistry,
    state: KeyringState,
}

impl Default for Keyring {
    fn default() -> Self {
        Self::create()
    }
}

impl Keyring {
    /// A new, empty keyring
    pub fn create() -> Self {
        Self {
            items: BTreeMap::new(),
            registry: ItemRegistry::default(),
            state: KeyringState::Open,
        }
    }

    /// Replace the codec registry used to validate and decode items
    pub fn with_registry(mut self, registry: ItemRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Decrypt, unpack and index a sealed keyring
    pub fn open(sealed: &[u8], credential: &Credential) -> Result<Self> {
        Self::open_with(sealed, credential, ItemRegistry::default())
    }

    /// [`Keyring::open`] with a specific codec registry
    pub fn open_with(sealed: &[u8], credential: &Credential, registry: ItemRegistry) -> Result<Self> {
        let plain = seal::open(sealed, credential)?;
        Ok(Self::from_archive(&plain)?.with_registry(registry))
    }

    /// Index an already-decrypted archive
    pub fn from_archive(data: &[u8]) -> Result<Self> {
        let mut archive = container::unpack(data)?;
        let manifest = Manifest::from_json(&archive.manifest)?;

        let mut keyring = Self::create();
        for (name, meta) in manifest.0 {
            let payload = archive
                .items
                .remove(&name)
                .ok_or_else(|| container::FormatError::MissingItem(name.clone()))?;
            // Names read from disk follow the add_item rules
            keyring.check_name(&name, None)?;
            keyring.items.insert(
                name,
                ItemEntry {
                    mimetype: meta.mimetype,
                    hidden: meta.hidden,
                    payload,
                },
            );
        }
        for orphan in archive.items.keys() {
            tracing::warn!(item = %orphan, "payload without manifest entry; dropping");
        }

        tracing::info!(items = keyring.len(), "opened keyring");
        Ok(keyring)
    }

    /// The unencrypted archive bytes
    pub fn to_archive(&self) -> Result<Vec<u8>> {
        let manifest = Manifest(
            self.items
                .iter()
                .map(|(name, entry)| {
                    (
                        name.clone(),
                        ManifestEntry {
                            mimetype: entry.mimetype.clone(),
                            hidden: entry.hidden,
                        },
                    )
                })
                .collect(),
        );
        let manifest = manifest.to_json()?;
        let payloads = self
            .items
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.payload.as_slice()));
        Ok(container::pack(MAGIC.as_bytes(), &manifest, payloads)?)
    }

    /// Seal the keyring; nothing changes unless every layer succeeds
    pub fn save(&mut self, credential: &Credential, armor: bool) -> Result<Vec<u8>> {
        let sealed = self.seal(credential, armor)?;
        self.mark_saved();
        Ok(sealed)
    }

    pub(crate) fn seal(&self, credential: &Credential, armor: bool) -> Result<Vec<u8>> {
        let archive = self.to_archive()?;
        Ok(seal::seal(&archive, credential, armor)?)
    }

    pub(crate) fn mark_saved(&mut self) {
        self.state = KeyringState::Open;
    }

    /// Encode `value` as `mimetype` and store it under `name`
    pub fn add_item(
        &mut self,
        name: &str,
        mimetype: &str,
        value: &ItemValue,
        options: AddOptions,
    ) -> Result<()> {
        self.check_insert(name, options.overwrite)?;
        let payload = self
            .registry
            .encode(mimetype, value)
            .map_err(|e| KeyringError::schema(name, e))?;
        self.insert(name, mimetype, payload, options.hidden);
        Ok(())
    }

    /// Store pre-encoded payload bytes, validated against `mimetype`
    pub fn add_raw_item(
        &mut self,
        name: &str,
        mimetype: &str,
        payload: Vec<u8>,
        options: AddOptions,
    ) -> Result<()> {
        self.check_insert(name, options.overwrite)?;
        self.registry
            .validate(mimetype, &payload)
            .map_err(|e| KeyringError::schema(name, e))?;
        self.insert(name, mimetype, payload, options.hidden);
        Ok(())
    }

    fn check_insert(&self, name: &str, overwrite: bool) -> Result<()> {
        if self.items.contains_key(name) {
            if !overwrite {
                return Err(KeyringError::DuplicateName(name.to_string()));
            }
        } else {
            self.check_name(name, None)?;
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, mimetype: &str, payload: Vec<u8>, hidden: bool) {
        tracing::debug!(item = %name, %mimetype, "storing item");
        self.items.insert(
            name.to_string(),
            ItemEntry {
                mimetype: mimetype.to_string(),
                hidden,
                payload,
            },
        );
        self.state = KeyringState::Dirty;
    }

    /// Decode the item stored under `name`
    pub fn get_item(&self, name: &str) -> Result<(&str, ItemValue)> {
        let entry = self.get_raw_item(name)?;
        let value = self
            .registry
            .decode(&entry.mimetype, &entry.payload)
            .map_err(|e| KeyringError::schema(name, e))?;
        Ok((&entry.mimetype, value))
    }

    pub fn get_raw_item(&self, name: &str) -> Result<&ItemEntry> {
        self.items
            .get(name)
            .ok_or_else(|| KeyringError::NotFound(name.to_string()))
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn remove_item(&mut self, name: &str) -> Result<ItemEntry> {
        let entry = self
            .items
            .remove(name)
            .ok_or_else(|| KeyringError::NotFound(name.to_string()))?;
        self.state = KeyringState::Dirty;
        Ok(entry)
    }

    /// Move an item to a new name; the new name must be free
    pub fn rename_item(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.items.contains_key(from) {
            return Err(KeyringError::NotFound(from.to_string()));
        }
        if from == to {
            return Ok(());
        }
        if self.items.contains_key(to) {
            return Err(KeyringError::DuplicateName(to.to_string()));
        }
        self.check_name(to, Some(from))?;
        if let Some(entry) = self.items.remove(from) {
            self.items.insert(to.to_string(), entry);
            self.state = KeyringState::Dirty;
        }
        Ok(())
    }

    pub fn set_hidden(&mut self, name: &str, hidden: bool) -> Result<()> {
        let entry = self
            .items
            .get_mut(name)
            .ok_or_else(|| KeyringError::NotFound(name.to_string()))?;
        if entry.hidden != hidden {
            entry.hidden = hidden;
            self.state = KeyringState::Dirty;
        }
        Ok(())
    }

    /// Items sorted by name; hidden items only when asked for
    pub fn list_items(&self, include_hidden: bool) -> Items<'_> {
        Items {
            inner: self.items.iter(),
            include_hidden,
        }
    }

    /// Every entry with its payload, sorted by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ItemEntry)> + '_ {
        self.items.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> KeyringState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == KeyringState::Dirty
    }

    /// Check that `name` may be added, or that `renaming` may move to it
    ///
    /// Names become ZIP paths under `items/`, so they must extract cleanly
    /// and must not turn another item into a directory. Whether the name is
    /// already taken is not checked here.
    pub fn check_name(&self, name: &str, renaming: Option<&str>) -> Result<()> {
        if name.is_empty() {
            return Err(KeyringError::invalid_name(name, "name cannot be empty"));
        }
        if name.chars().any(char::is_control) {
            return Err(KeyringError::invalid_name(
                name,
                "name cannot contain control characters",
            ));
        }
        if name.contains('\\') {
            return Err(KeyringError::invalid_name(name, "name cannot contain '\\'"));
        }
        if name
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(KeyringError::invalid_name(
                name,
                "name cannot have empty, '.' or '..' path segments",
            ));
        }

        for existing in self.items.keys() {
            if Some(existing.as_str()) == renaming {
                continue;
            }
            if is_path_prefix(existing, name) || is_path_prefix(name, existing) {
                return Err(KeyringError::invalid_name(
                    name,
                    format!("conflicts with the path of item {:?}", existing),
                ));
            }
        }
        Ok(())
    }
}

fn is_path_prefix(parent: &str, child: &str) -> bool {
    child
        .strip_prefix(parent)
        .map_or(false, |rest| rest.starts_with('/'))
}

/// Iterator returned by [`Keyring::list_items`]
#[derive(Clone)]
pub struct Items<'a> {
    inner: btree_map::Iter<'a, String, ItemEntry>,
    include_hidden: bool,
}

impl<'a> Iterator for Items<'a> {
    type Item = ItemMetadata<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let include_hidden = self.include_hidden;
        self.inner
            .by_ref()
            .find(|(_, entry)| include_hidden || !entry.hidden)
            .map(|(name, entry)| ItemMetadata {
                name,
                mimetype: &entry.mimetype,
                hidden: entry.hidden,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::FormatError;
    use crate::error::ErrorKind;
    use crate::item::{LOGIN_MIMETYPE, TEXT_MIMETYPE};
    use crate::login::{LoginItem, Password, SecurityQuestion};
    use crate::seal::DecryptError;

    fn identity() -> Credential {
        Credential::identity(age::x25519::Identity::generate())
    }

    fn bob() -> ItemValue {
        ItemValue::Login(LoginItem {
            username: Some("bob".to_string()),
            password: Some(Password::from("hunter2")),
            ..Default::default()
        })
    }

    fn text(s: &str) -> ItemValue {
        ItemValue::Text(s.to_string())
    }

    fn sample() -> Keyring {
        let mut keyring = Keyring::create();
        keyring
            .add_item("bank", LOGIN_MIMETYPE, &bob(), AddOptions::default())
            .unwrap();
        keyring
            .add_item("wifi/home", TEXT_MIMETYPE, &text("correct horse"), AddOptions::default())
            .unwrap();
        keyring
            .add_item("old-bank", LOGIN_MIMETYPE, &bob(), AddOptions::hidden())
            .unwrap();
        keyring
    }

    fn names(keyring: &Keyring, include_hidden: bool) -> Vec<&str> {
        keyring.list_items(include_hidden).map(|m| m.name).collect()
    }

    #[test]
    fn test_create_is_empty() {
        let keyring = Keyring::create();
        assert!(keyring.is_empty());
        assert_eq!(keyring.state(), KeyringState::Open);
        assert_eq!(keyring.list_items(true).count(), 0);
    }

    #[test]
    fn test_end_to_end_passphrase() {
        let cred = Credential::passphrase("correct horse battery staple");
        let mut keyring = Keyring::create();
        keyring
            .add_item("bank", LOGIN_MIMETYPE, &bob(), AddOptions::default())
            .unwrap();
        let sealed = keyring.save(&cred, false).unwrap();

        let reopened = Keyring::open(&sealed, &cred).unwrap();
        let (mimetype, value) = reopened.get_item("bank").unwrap();
        assert_eq!(mimetype, LOGIN_MIMETYPE);
        assert_eq!(value, bob());
    }

    #[test]
    fn test_save_open_roundtrip() {
        let cred = identity();
        let mut keyring = sample();
        let sealed = keyring.save(&cred, false).unwrap();
        let reopened = Keyring::open(&sealed, &cred).unwrap();

        assert_eq!(
            keyring.entries().collect::<Vec<_>>(),
            reopened.entries().collect::<Vec<_>>()
        );
        assert!(reopened.get_raw_item("old-bank").unwrap().hidden);
    }

    #[test]
    fn test_wrong_credential() {
        let mut keyring = sample();
        let sealed = keyring.save(&identity(), false).unwrap();
        let err = Keyring::open(&sealed, &identity()).err().unwrap();
        assert!(matches!(err, KeyringError::Decrypt(DecryptError::WrongCredential)));
        assert_eq!(err.kind(), ErrorKind::WrongCredential);
    }

    #[test]
    fn test_tampered_keyring_never_opens() {
        let cred = identity();
        let mut keyring = sample();
        let sealed = keyring.save(&cred, false).unwrap();
        for i in (0..sealed.len()).step_by(7) {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x80;
            let err = Keyring::open(&tampered, &cred).err().unwrap();
            assert!(matches!(err, KeyringError::Decrypt(_)), "byte {}: {}", i, err);
        }
    }

    #[test]
    fn test_duplicate_name() {
        let mut keyring = sample();
        let err = keyring
            .add_item("bank", TEXT_MIMETYPE, &text("other"), AddOptions::default())
            .unwrap_err();
        assert!(matches!(err, KeyringError::DuplicateName(ref n) if n == "bank"));

        // Unchanged
        let (mimetype, value) = keyring.get_item("bank").unwrap();
        assert_eq!(mimetype, LOGIN_MIMETYPE);
        assert_eq!(value, bob());
    }

    #[test]
    fn test_overwrite() {
        let mut keyring = sample();
        keyring
            .add_item("bank", TEXT_MIMETYPE, &text("now text"), AddOptions::overwrite())
            .unwrap();
        let (mimetype, value) = keyring.get_item("bank").unwrap();
        assert_eq!(mimetype, TEXT_MIMETYPE);
        assert_eq!(value, text("now text"));
    }

    #[test]
    fn test_hidden_filtering() {
        let keyring = sample();
        assert_eq!(names(&keyring, false), vec!["bank", "wifi/home"]);
        assert_eq!(names(&keyring, true), vec!["bank", "old-bank", "wifi/home"]);
    }

    #[test]
    fn test_listing_is_restartable() {
        let keyring = sample();
        let listing = keyring.list_items(true);
        let first: Vec<_> = listing.clone().collect();
        let second: Vec<_> = listing.collect();
        assert_eq!(first, second);
        assert_eq!(first[1].mimetype, LOGIN_MIMETYPE);
        assert!(first[1].hidden);
    }

    #[test]
    fn test_schema_rejection() {
        let mut keyring = Keyring::create();
        let err = keyring
            .add_raw_item(
                "bad",
                LOGIN_MIMETYPE,
                br#"{"security_questions":[{"q":"x"}]}"#.to_vec(),
                AddOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(keyring.is_empty());
        assert!(!keyring.is_dirty());
    }

    #[test]
    fn test_required_password_registry() {
        let mut keyring = Keyring::create().with_registry(ItemRegistry::builtin(true));
        let no_password = ItemValue::Login(LoginItem {
            username: Some("bob".to_string()),
            ..Default::default()
        });
        let err = keyring
            .add_item("bank", LOGIN_MIMETYPE, &no_password, AddOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        keyring
            .add_item("bank", LOGIN_MIMETYPE, &bob(), AddOptions::default())
            .unwrap();
    }

    #[test]
    fn test_bad_item_does_not_block_others() {
        let cred = identity();
        let mut keyring = sample();
        // Valid until passwords are required
        keyring
            .add_raw_item(
                "legacy",
                LOGIN_MIMETYPE,
                br#"{"username":"x"}"#.to_vec(),
                AddOptions::default(),
            )
            .unwrap();
        let sealed = keyring.save(&cred, false).unwrap();

        let reopened = Keyring::open_with(&sealed, &cred, ItemRegistry::builtin(true)).unwrap();
        assert_eq!(reopened.list_items(true).count(), 4);
        assert_eq!(reopened.get_item("legacy").unwrap_err().kind(), ErrorKind::Schema);
        assert!(reopened.get_item("wifi/home").is_ok());
    }

    #[test]
    fn test_get_and_remove_missing() {
        let mut keyring = sample();
        assert_eq!(keyring.get_item("nope").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(keyring.remove_item("nope").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove() {
        let mut keyring = sample();
        keyring.mark_saved();
        let entry = keyring.remove_item("bank").unwrap();
        assert_eq!(entry.mimetype, LOGIN_MIMETYPE);
        assert!(!keyring.has_item("bank"));
        assert!(keyring.is_dirty());
    }

    #[test]
    fn test_state_transitions() {
        let cred = identity();
        let mut keyring = Keyring::create();
        assert_eq!(keyring.state(), KeyringState::Open);

        keyring
            .add_item("a", TEXT_MIMETYPE, &text("1"), AddOptions::default())
            .unwrap();
        assert_eq!(keyring.state(), KeyringState::Dirty);

        keyring.save(&cred, false).unwrap();
        assert_eq!(keyring.state(), KeyringState::Open);

        keyring.set_hidden("a", false).unwrap();
        assert_eq!(keyring.state(), KeyringState::Open);
        keyring.set_hidden("a", true).unwrap();
        assert_eq!(keyring.state(), KeyringState::Dirty);
    }

    #[test]
    fn test_invalid_names() {
        let mut keyring = sample();
        for name in ["", "/abs", "trailing/", "a//b", "../escape", "a/./b", "tab\there", "back\\slash"] {
            let err = keyring
                .add_item(name, TEXT_MIMETYPE, &text("x"), AddOptions::default())
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidName, "{:?}", name);
        }

        // "bank" is a file; "bank/pin" would need it to be a directory
        let err = keyring
            .add_item("bank/pin", TEXT_MIMETYPE, &text("1234"), AddOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
        let err = keyring
            .add_item("wifi", TEXT_MIMETYPE, &text("x"), AddOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);

        // Unicode and reserved-looking names are fine under items/
        keyring
            .add_item("Ünïcødé", TEXT_MIMETYPE, &text("x"), AddOptions::default())
            .unwrap();
        keyring
            .add_item("META-INF/MAGIC", TEXT_MIMETYPE, &text("x"), AddOptions::default())
            .unwrap();
        let cred = identity();
        let sealed = keyring.save(&cred, false).unwrap();
        let reopened = Keyring::open(&sealed, &cred).unwrap();
        assert_eq!(reopened.get_item("META-INF/MAGIC").unwrap().1, text("x"));
    }

    #[test]
    fn test_rename() {
        let mut keyring = sample();
        keyring.rename_item("bank", "banking/main").unwrap();
        assert!(!keyring.has_item("bank"));
        assert_eq!(keyring.get_item("banking/main").unwrap().1, bob());

        assert_eq!(
            keyring.rename_item("missing", "x").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            keyring.rename_item("banking/main", "old-bank").unwrap_err().kind(),
            ErrorKind::DuplicateName
        );
        // Renaming an item under its own old path is allowed
        keyring.rename_item("old-bank", "old-bank/v1").unwrap();
    }

    #[test]
    fn test_missing_payload_is_format_error() {
        let data = container::pack(
            MAGIC.as_bytes(),
            br#"{"ghost":{"type":"text/plain; charset=utf-8"}}"#,
            std::iter::empty(),
        )
        .unwrap();
        let err = Keyring::from_archive(&data).err().unwrap();
        assert!(matches!(err, KeyringError::Format(FormatError::MissingItem(ref n)) if n == "ghost"));
    }

    #[test]
    fn test_orphan_payload_dropped() {
        let data = container::pack(MAGIC.as_bytes(), b"{}", [("stray", b"x".as_slice())]).unwrap();
        let keyring = Keyring::from_archive(&data).unwrap();
        assert!(keyring.is_empty());
    }

    #[test]
    fn test_corrupt_plaintext_is_not_empty_keyring() {
        let cred = identity();
        let sealed = seal::seal(b"not a zip", &cred, false).unwrap();
        let err = Keyring::open(&sealed, &cred).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_security_questions_survive() {
        let cred = identity();
        let login = ItemValue::Login(LoginItem {
            email: Some("a@example.com".to_string()),
            security_questions: vec![
                SecurityQuestion {
                    question: "Street?".to_string(),
                    answer: "Elm".to_string(),
                },
                SecurityQuestion {
                    question: "Teacher?".to_string(),
                    answer: "Ms. Frizzle".to_string(),
                },
            ],
            ..Default::default()
        });
        let mut keyring = Keyring::create();
        keyring
            .add_item("mail", LOGIN_MIMETYPE, &login, AddOptions::default())
            .unwrap();
        let sealed = keyring.save(&cred, false).unwrap();
        assert_eq!(Keyring::open(&sealed, &cred).unwrap().get_item("mail").unwrap().1, login);
    }

    fn archive_with_names(names: &[&str]) -> Vec<u8> {
        let manifest: BTreeMap<&str, serde_json::Value> = names
            .iter()
            .map(|n| (*n, serde_json::json!({ "type": TEXT_MIMETYPE })))
            .collect();
        let manifest = serde_json::to_vec(&manifest).unwrap();
        let payloads: Vec<(&str, &[u8])> = names.iter().map(|n| (*n, b"x".as_slice())).collect();
        container::pack(MAGIC.as_bytes(), &manifest, payloads).unwrap()
    }

    #[test]
    fn test_open_rejects_invalid_names() {
        for names in [&["a", "a/b"][..], &["../x"][..], &["x/./y"][..]] {
            let err = Keyring::from_archive(&archive_with_names(names)).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::InvalidName, "{:?}", names);
        }
        let keyring = Keyring::from_archive(&archive_with_names(&["a/b", "a/c"])).unwrap();
        assert_eq!(keyring.len(), 2);
    }

    #[test]
    fn test_check_name() {
        let keyring = sample();
        assert!(keyring.check_name("mail", None).is_ok());
        assert_eq!(keyring.check_name("a//b", None).unwrap_err().kind(), ErrorKind::InvalidName);
        assert_eq!(keyring.check_name("bank/pin", None).unwrap_err().kind(), ErrorKind::InvalidName);
        // The item being renamed does not conflict with its own new path
        assert!(keyring.check_name("bank/pin", Some("bank")).is_ok());
    }

    #[test]
    fn test_open_with_registry() {
        let cred = identity();
        let mut keyring = Keyring::create();
        keyring
            .add_raw_item("legacy", LOGIN_MIMETYPE, br#"{"username":"x"}"#.to_vec(), AddOptions::default())
            .unwrap();
        let sealed = keyring.save(&cred, false).unwrap();

        assert!(Keyring::open(&sealed, &cred).unwrap().get_item("legacy").is_ok());
        let strict = Keyring::open_with(&sealed, &cred, ItemRegistry::builtin(true)).unwrap();
        assert_eq!(strict.get_item("legacy").unwrap_err().kind(), ErrorKind::Schema);
    }
}

//! Keyring configuration management
//!
//! Configuration file:
//! - ~/.config/keyring/config.yaml - Global settings
//!
//! Every field is optional; a missing file means all defaults.

use crate::paths::Paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the keyring path
pub const KEYRING_FILE_ENV: &str = "KEYRING_FILE";

/// How the keyring is sealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// scrypt passphrase, prompted on the terminal
    #[default]
    Passphrase,
    /// age X25519 identity read from `identity_file`
    Identity,
}

/// Global keyring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyringConfig {
    /// Keyring file used when `--keyring` is not given
    pub keyring: Option<String>,

    /// Credential kind used to seal and open the keyring
    pub credential: CredentialMode,

    /// Identity file for `credential: identity`
    pub identity_file: Option<String>,

    /// Upper bound on the scrypt work factor accepted when opening
    pub max_work_factor: Option<u8>,

    /// Write ASCII-armored output
    pub armor: bool,

    /// Login items must carry a password
    pub require_password: bool,

    /// Editor used when EDITOR is unset
    pub editor: String,

    /// Password generator defaults
    pub generator: GeneratorConfig,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            keyring: None,
            credential: CredentialMode::default(),
            identity_file: None,
            max_work_factor: None,
            armor: false,
            require_password: false,
            editor: "vim".to_string(),
            generator: GeneratorConfig::default(),
        }
    }
}

/// Password generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of characters
    pub length: usize,
    /// Named alphabets joined with `+` (letters, numbers, symbols, more_symbols)
    pub alphabets: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: 16,
            alphabets: "letters+numbers+symbols".to_string(),
        }
    }
}

impl KeyringConfig {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let paths = Paths::new();
        Self::load_from(&paths.config_file())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read keyring config from {:?}", path))?;
            let config: Self = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse keyring config from {:?}", path))?;
            tracing::debug!(?path, "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Keyring path: the flag wins, then KEYRING_FILE, then the config, then the default
    pub fn keyring_path(&self, flag: Option<PathBuf>) -> PathBuf {
        self.resolve_keyring(flag, std::env::var_os(KEYRING_FILE_ENV), &Paths::new())
    }

    fn resolve_keyring(
        &self,
        flag: Option<PathBuf>,
        env: Option<OsString>,
        paths: &Paths,
    ) -> PathBuf {
        if let Some(path) = flag {
            return path;
        }
        if let Some(path) = env.filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        match &self.keyring {
            Some(path) => paths.expand(path),
            None => paths.default_keyring(),
        }
    }

    /// Identity file, with `~/` expanded
    pub fn identity_path(&self) -> Option<PathBuf> {
        let paths = Paths::new();
        self.identity_file.as_deref().map(|p| paths.expand(p))
    }

    /// Editor program: EDITOR if set, the configured fallback otherwise
    pub fn editor(&self) -> OsString {
        std::env::var_os("EDITOR")
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| OsString::from(&self.editor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths() -> Paths {
        Paths {
            home: PathBuf::from("/home/alice"),
            keyring_dir: PathBuf::from("/home/alice/.keyring"),
            config: PathBuf::from("/home/alice/.config/keyring"),
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = KeyringConfig::load_from(&temp.path().join("absent.yaml")).unwrap();
        assert_eq!(config.credential, CredentialMode::Passphrase);
        assert_eq!(config.generator.length, 16);
        assert!(!config.require_password);
        assert_eq!(config.editor, "vim");
    }

    #[test]
    fn test_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "credential: identity\nidentity_file: ~/.keyring/id.txt\ngenerator:\n  length: 24\n",
        )
        .unwrap();

        let config = KeyringConfig::load_from(&path).unwrap();
        assert_eq!(config.credential, CredentialMode::Identity);
        assert_eq!(config.identity_file.as_deref(), Some("~/.keyring/id.txt"));
        assert_eq!(config.generator.length, 24);
        assert_eq!(config.generator.alphabets, "letters+numbers+symbols");
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let mut config = KeyringConfig::default();
        config.max_work_factor = Some(22);
        config.armor = true;
        config.save_to(&path).unwrap();

        let loaded = KeyringConfig::load_from(&path).unwrap();
        assert_eq!(loaded.max_work_factor, Some(22));
        assert!(loaded.armor);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "credential: [not, a, mode]\n").unwrap();
        assert!(KeyringConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_keyring_resolution_order() {
        let paths = test_paths();
        let mut config = KeyringConfig::default();

        assert_eq!(
            config.resolve_keyring(None, None, &paths),
            PathBuf::from("/home/alice/.keyring/keyring.v2")
        );

        config.keyring = Some("~/vault.kr".to_string());
        assert_eq!(
            config.resolve_keyring(None, None, &paths),
            PathBuf::from("/home/alice/vault.kr")
        );

        assert_eq!(
            config.resolve_keyring(None, Some(OsString::from("/env/kr")), &paths),
            PathBuf::from("/env/kr")
        );

        // Empty env var is ignored
        assert_eq!(
            config.resolve_keyring(None, Some(OsString::new()), &paths),
            PathBuf::from("/home/alice/vault.kr")
        );

        assert_eq!(
            config.resolve_keyring(
                Some(PathBuf::from("/flag/kr")),
                Some(OsString::from("/env/kr")),
                &paths
            ),
            PathBuf::from("/flag/kr")
        );
    }
}

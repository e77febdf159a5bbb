//! Standard paths used by the keyring tool

use std::path::PathBuf;

/// Standard keyring paths
pub struct Paths {
    /// Home directory (~)
    pub home: PathBuf,
    /// Directory holding the default keyring (~/.keyring)
    pub keyring_dir: PathBuf,
    /// Config directory (~/.config/keyring)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        let config = dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("keyring");

        Self {
            keyring_dir: home.join(".keyring"),
            home,
            config,
        }
    }

    /// Default keyring file (~/.keyring/keyring.v2)
    pub fn default_keyring(&self) -> PathBuf {
        self.keyring_dir.join("keyring.v2")
    }

    /// Config file (~/.config/keyring/config.yaml)
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.yaml")
    }

    /// Expand a leading `~/` against the home directory
    pub fn expand(&self, path: &str) -> PathBuf {
        match path.strip_prefix("~/") {
            Some(rest) => self.home.join(rest),
            None if path == "~" => self.home.clone(),
            None => PathBuf::from(path),
        }
    }
}

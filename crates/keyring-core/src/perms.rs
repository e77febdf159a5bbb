//! File mode checks for keyring files and their directories

use anyhow::Result;
use std::fmt;
use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Expected mode for keyring files
pub const FILE_MODE: u32 = 0o600;

/// Expected mode for the directory holding the keyring
pub const DIR_MODE: u32 = 0o700;

/// A path whose permission bits are looser than expected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoosePermissions {
    pub path: PathBuf,
    pub actual: u32,
    pub expected: u32,
}

impl fmt::Display for LoosePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "permissions on {} are {:o} instead of {:o}; consider running: chmod {:o} '{}'",
            self.path.display(),
            self.actual,
            self.expected,
            self.expected,
            self.path.display()
        )
    }
}

/// Compare the permission bits of `path` against `expected`
///
/// Returns `None` when the path is missing or already matches.
pub fn check_mode(path: &Path, expected: u32) -> Result<Option<LoosePermissions>> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let actual = metadata.permissions().mode() & 0o777;
    if actual == expected {
        Ok(None)
    } else {
        Ok(Some(LoosePermissions {
            path: path.to_path_buf(),
            actual,
            expected,
        }))
    }
}

/// Check a keyring file and its parent directory
pub fn check_keyring_modes(keyring: &Path) -> Result<Vec<LoosePermissions>> {
    let mut warnings = Vec::new();
    if let Some(w) = check_mode(keyring, FILE_MODE)? {
        warnings.push(w);
    }
    if let Some(parent) = keyring.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Some(w) = check_mode(parent, DIR_MODE)? {
            warnings.push(w);
        }
    }
    Ok(warnings)
}

/// Create a directory (and parents) restricted to the owner
pub fn create_private_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    fs::set_permissions(dir, Permissions::from_mode(DIR_MODE))?;
    tracing::debug!(?dir, "created private directory");
    Ok(())
}

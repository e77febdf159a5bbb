//! Store - keyring files on disk
//!
//! Saves never modify the target in place: the sealed bytes go to a
//! temporary file in the same directory, which is synced and renamed over
//! the target. A crash leaves either the old or the new keyring.

use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use crate::error::{KeyringError, Result};
use crate::item::ItemRegistry;
use crate::keyring::Keyring;
use crate::seal::Credential;

/// Mode of keyring files and their lock files
pub const FILE_MODE: u32 = 0o600;

impl Keyring {
    /// Read and open the keyring at `path`
    pub fn load(path: &Path, credential: &Credential) -> Result<Self> {
        Self::load_with(path, credential, ItemRegistry::default())
    }

    /// [`Keyring::load`] with a specific codec registry
    pub fn load_with(path: &Path, credential: &Credential, registry: ItemRegistry) -> Result<Self> {
        let sealed = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(KeyringError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), bytes = sealed.len(), "read keyring");
        Self::open_with(&sealed, credential, registry)
    }

    /// Seal and atomically replace the file at `path`
    ///
    /// Also how the credential is changed: save with the new one.
    pub fn save_to(&mut self, path: &Path, credential: &Credential, armor: bool) -> Result<()> {
        let sealed = self.seal(credential, armor)?;
        write_atomic(path, &sealed, true)?;
        self.mark_saved();
        tracing::info!(path = %path.display(), items = self.len(), "saved keyring");
        Ok(())
    }

    /// Write a new, empty keyring to `path`, refusing to replace an existing file
    pub fn create_at(path: &Path, credential: &Credential, armor: bool) -> Result<Self> {
        let mut keyring = Keyring::create();
        let sealed = keyring.seal(credential, armor)?;
        write_atomic(path, &sealed, false)?;
        keyring.mark_saved();
        tracing::info!(path = %path.display(), "created keyring");
        Ok(keyring)
    }
}

/// Write `data` to a temporary sibling of `path`, sync it and rename it into place
fn write_atomic(path: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".keyring-")
        .suffix(".writing")
        .tempfile_in(dir)?;
    temp.as_file()
        .set_permissions(Permissions::from_mode(FILE_MODE))?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    let persisted = if overwrite {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };
    if let Err(e) = persisted {
        if !overwrite && e.error.kind() == io::ErrorKind::AlreadyExists {
            return Err(KeyringError::AlreadyExists(path.to_path_buf()));
        }
        return Err(e.error.into());
    }

    sync_dir(dir);
    Ok(())
}

/// Make a completed rename durable
///
/// The new file is already in place, so a failure here is logged rather
/// than reported.
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        tracing::warn!(dir = %dir.display(), error = %e, "failed to sync directory after rename");
    }
}

/// Sibling lock file of a keyring: `<file>.lock`
pub fn lock_path(keyring: &Path) -> PathBuf {
    let mut name = keyring.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Exclusive advisory lock held for a read-modify-write cycle
///
/// The lock lives on a sibling file because saving renames a new inode over
/// the keyring itself. Released when dropped.
#[derive(Debug)]
pub struct KeyringLock {
    file: File,
    path: PathBuf,
}

impl KeyringLock {
    /// Take the lock without blocking; `Locked` if another holder exists
    pub fn acquire(keyring: &Path) -> Result<Self> {
        let path = lock_path(keyring);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .mode(FILE_MODE)
            .open(&path)?;

        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
                return Err(KeyringError::Locked(keyring.to_path_buf()));
            }
            return Err(err.into());
        }

        tracing::debug!(lock = %path.display(), "acquired keyring lock");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for KeyringLock {
    fn drop(&mut self) {
        // Closing the descriptor would release it too
        unsafe {
            libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
        }
        tracing::debug!(lock = %self.path.display(), "released keyring lock");
    }
}

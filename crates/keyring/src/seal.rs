//! Seal - the age encryption envelope around the keyring archive
//!
//! The sealed file is a standard age file, so `age -d` can always recover the
//! inner ZIP archive without this tool. Sealing uses either a passphrase
//! (scrypt recipient) or an X25519 identity (sealed to its public key).

use std::io::{self, Read, Write};
use std::path::Path;

use age::armor::{ArmoredReader, ArmoredWriter, Format};
use age::secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Prefix of every binary age file
pub const AGE_HEADER: &[u8] = b"age-encryption.org/v1\n";

/// Opening the envelope failed
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("wrong passphrase or identity")]
    WrongCredential,

    #[error("keyring data is corrupt: {0}")]
    Corrupt(String),

    #[error("keyring is sealed with {sealed_with}, but {supplied} was supplied")]
    CredentialMismatch {
        sealed_with: &'static str,
        supplied: &'static str,
    },

    #[error("{0}")]
    WorkFactorTooHigh(String),
}

/// Sealing the envelope failed
#[derive(Error, Debug)]
pub enum EncryptError {
    #[error("Encryption error: {0}")]
    Age(#[from] age::EncryptError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What a keyring is sealed with
pub enum Credential {
    Passphrase {
        passphrase: SecretString,
        /// Refuse scrypt work factors above this when opening
        max_work_factor: Option<u8>,
    },
    Identity(age::x25519::Identity),
}

impl Credential {
    pub fn passphrase(passphrase: impl Into<String>) -> Self {
        Credential::Passphrase {
            passphrase: SecretString::new(passphrase.into()),
            max_work_factor: None,
        }
    }

    /// Cap the scrypt work factor accepted when opening; no effect on identities
    pub fn with_max_work_factor(self, limit: Option<u8>) -> Self {
        match self {
            Credential::Passphrase { passphrase, .. } => Credential::Passphrase {
                passphrase,
                max_work_factor: limit,
            },
            other => other,
        }
    }

    pub fn identity(identity: age::x25519::Identity) -> Self {
        Credential::Identity(identity)
    }

    /// Load the first `AGE-SECRET-KEY-` line of an age identity file
    pub fn from_identity_file(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let line = content
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with("AGE-SECRET-KEY-"))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("no AGE-SECRET-KEY line in {}", path.display()),
                )
            })?;
        let identity = line
            .parse::<age::x25519::Identity>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        Ok(Credential::Identity(identity))
    }

    fn describe(&self) -> &'static str {
        match self {
            Credential::Passphrase { .. } => "a passphrase",
            Credential::Identity(_) => "an identity",
        }
    }
}

/// Encrypt `plain` for `credential`
pub fn seal(plain: &[u8], credential: &Credential, armor: bool) -> Result<Vec<u8>, EncryptError> {
    let encryptor = match credential {
        Credential::Passphrase { passphrase, .. } => age::Encryptor::with_user_passphrase(
            SecretString::new(passphrase.expose_secret().clone()),
        ),
        Credential::Identity(identity) => {
            let recipient: Box<dyn age::Recipient + Send> = Box::new(identity.to_public());
            age::Encryptor::with_recipients(vec![recipient])
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no recipients"))?
        }
    };

    let format = if armor {
        Format::AsciiArmor
    } else {
        Format::Binary
    };

    let mut sealed = vec![];
    let output = ArmoredWriter::wrap_output(&mut sealed, format)?;
    let mut writer = encryptor.wrap_output(output)?;
    writer.write_all(plain)?;
    writer.finish()?.finish()?;

    tracing::debug!(plain = plain.len(), sealed = sealed.len(), armor, "sealed");
    Ok(sealed)
}

/// Decrypt and authenticate `sealed`, armored or binary
pub fn open(sealed: &[u8], credential: &Credential) -> Result<Vec<u8>, DecryptError> {
    let decryptor = age::Decryptor::new(ArmoredReader::new(sealed)).map_err(classify)?;

    let mut reader = match (decryptor, credential) {
        (
            age::Decryptor::Passphrase(d),
            Credential::Passphrase {
                passphrase,
                max_work_factor,
            },
        ) => d.decrypt(passphrase, *max_work_factor),
        (age::Decryptor::Recipients(d), Credential::Identity(identity)) => {
            d.decrypt(std::iter::once(identity as &dyn age::Identity))
        }
        (age::Decryptor::Passphrase(_), supplied) => {
            return Err(DecryptError::CredentialMismatch {
                sealed_with: "a passphrase",
                supplied: supplied.describe(),
            })
        }
        (_, supplied) => {
            return Err(DecryptError::CredentialMismatch {
                sealed_with: "recipient keys",
                supplied: supplied.describe(),
            })
        }
    }
    .map_err(classify)?;

    // Each payload chunk is authenticated as it is read
    let mut plain = vec![];
    reader
        .read_to_end(&mut plain)
        .map_err(|e| DecryptError::Corrupt(format!("payload failed authentication: {}", e)))?;

    tracing::debug!(plain = plain.len(), "opened");
    Ok(plain)
}

fn classify(err: age::DecryptError) -> DecryptError {
    match err {
        age::DecryptError::DecryptionFailed
        | age::DecryptError::KeyDecryptionFailed
        | age::DecryptError::NoMatchingKeys => DecryptError::WrongCredential,
        e @ age::DecryptError::ExcessiveWork { .. } => DecryptError::WorkFactorTooHigh(e.to_string()),
        e => DecryptError::Corrupt(e.to_string()),
    }
}

//! Random password generation

use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use thiserror::Error;

use crate::login::Password;

pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "~!@#$%^&*-_:;,.?";
pub const MORE_SYMBOLS: &str = "`'\"\\/{}[]()<>";

/// Alphabet used when none is configured
pub const DEFAULT_ALPHABETS: &str = "letters+numbers+symbols";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("unknown alphabet {0:?} (expected letters, numbers, symbols or more_symbols)")]
    Unknown(String),

    #[error("the alphabet is empty")]
    Empty,
}

fn named(name: &str) -> Option<&'static str> {
    match name {
        "letters" => Some(LETTERS),
        "numbers" => Some(NUMBERS),
        "symbols" => Some(SYMBOLS),
        "more_symbols" => Some(MORE_SYMBOLS),
        _ => None,
    }
}

/// Parse `letters+numbers+...` into a deduplicated character set
pub fn parse_alphabet(names: &str) -> Result<Vec<char>, AlphabetError> {
    let mut alphabet: Vec<char> = Vec::new();
    for name in names.split('+').map(str::trim).filter(|s| !s.is_empty()) {
        let chars = named(name).ok_or_else(|| AlphabetError::Unknown(name.to_string()))?;
        for ch in chars.chars() {
            if !alphabet.contains(&ch) {
                alphabet.push(ch);
            }
        }
    }
    if alphabet.is_empty() {
        return Err(AlphabetError::Empty);
    }
    Ok(alphabet)
}

/// Sample `len` characters uniformly from `alphabet`
///
/// `rand`'s uniform sampler rejects out-of-range draws, so no character is
/// favoured over another.
pub fn generate_password<R>(rng: &mut R, alphabet: &[char], len: usize) -> Result<Password, AlphabetError>
where
    R: Rng + CryptoRng,
{
    let mut password = String::with_capacity(len);
    for _ in 0..len {
        let ch = alphabet.choose(rng).ok_or(AlphabetError::Empty)?;
        password.push(*ch);
    }
    Ok(Password::new(password))
}

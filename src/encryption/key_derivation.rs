//! Passphrase key derivation using PBKDF2 with HMAC-SHA1
//!
//! The note database stores a salt and an iteration count next to the
//! ciphertext; the key itself is re-derived from the passphrase on every open.
//! HMAC-SHA1 is the PRF the existing databases were written with, so it is not
//! configurable here.

use hmac::Hmac;
use sha1::Sha1;
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur during key derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyDerivationError {
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("Invalid output length: {0}")]
    InvalidOutputLength(usize),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),
}

/// Derived key material, wiped on drop.
///
/// `Clone` is not derived so key bytes do not get copied around.
#[derive(Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct DerivedKey {
    bytes: Vec<u8>,
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Derive `output_len` bytes from `passphrase` and `salt`.
///
/// Deterministic: identical inputs always produce identical keys. An empty
/// salt or passphrase is accepted, as PBKDF2 allows.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
) -> Result<DerivedKey, KeyDerivationError> {
    if iterations == 0 {
        return Err(KeyDerivationError::ZeroIterations);
    }

    if output_len == 0 {
        return Err(KeyDerivationError::InvalidOutputLength(output_len));
    }

    let mut bytes = vec![0u8; output_len];
    pbkdf2::pbkdf2::<Hmac<Sha1>>(passphrase, salt, iterations, &mut bytes).map_err(|_| {
        KeyDerivationError::DerivationFailed("HMAC-SHA1 rejected the passphrase".into())
    })?;

    Ok(DerivedKey { bytes })
}

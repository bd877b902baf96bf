//! AES-256-CBC with PKCS#7 padding over caller-owned buffers
//!
//! The in-place functions take `&mut Vec<u8>` and resize it: encryption grows
//! the buffer by one block of scratch, runs the cipher, and truncates to the
//! ciphertext length; decryption truncates to the plaintext length. Key and IV
//! lengths are checked before the buffer is touched, so a length error leaves
//! it unmodified. Any later failure leaves the contents unspecified and the
//! buffer must be discarded.
//!
//! Ciphertext length is always a multiple of 16. Empty plaintext encrypts to
//! exactly one block of padding.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use thiserror::Error;

// CPU feature detection
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use std::arch::is_x86_feature_detected;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;
/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Non-success status reported by the cipher primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherStatus {
    /// Output did not fit the buffer.
    BufferTooSmall,
    /// Ciphertext length is not a multiple of the block size.
    AlignmentError,
    /// Padding did not decode (wrong key, wrong IV, or corrupted data).
    DecodeError,
    /// Key or IV rejected by the primitive.
    ParamError,
}

/// Errors that can occur during cipher operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid IV length: expected 16 bytes, got {0}")]
    InvalidIvLength(usize),

    #[error("could not grow buffer to {0} bytes")]
    Allocation(usize),

    #[error("cipher operation failed: {0:?}")]
    Cipher(CipherStatus),
}

fn check_params(key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    if iv.len() != IV_LEN {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Ok(())
}

/// Encrypt `buffer` in place. On success it holds the ciphertext.
pub fn encrypt_in_place(buffer: &mut Vec<u8>, key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    check_params(key, iv)?;

    let msg_len = buffer.len();
    let scratch_len = msg_len
        .checked_add(BLOCK_SIZE)
        .ok_or(CipherError::Allocation(usize::MAX))?;
    buffer
        .try_reserve_exact(BLOCK_SIZE)
        .map_err(|_| CipherError::Allocation(scratch_len))?;
    buffer.resize(scratch_len, 0);

    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|_| CipherError::Cipher(CipherStatus::ParamError))?;
    let ciphertext_len = cipher
        .encrypt_padded_mut::<Pkcs7>(buffer.as_mut_slice(), msg_len)
        .map_err(|_| CipherError::Cipher(CipherStatus::BufferTooSmall))?
        .len();

    buffer.truncate(ciphertext_len);
    Ok(())
}

/// Decrypt `buffer` in place. On success it holds the plaintext.
pub fn decrypt_in_place(buffer: &mut Vec<u8>, key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    check_params(key, iv)?;

    if buffer.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::Cipher(CipherStatus::AlignmentError));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| CipherError::Cipher(CipherStatus::ParamError))?;
    let plaintext_len = cipher
        .decrypt_padded_mut::<Pkcs7>(buffer.as_mut_slice())
        .map_err(|_| CipherError::Cipher(CipherStatus::DecodeError))?
        .len();

    buffer.truncate(plaintext_len);
    Ok(())
}

/// Encrypt into a new buffer, leaving `plaintext` untouched.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    check_params(key, iv)?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(plaintext.len() + BLOCK_SIZE)
        .map_err(|_| CipherError::Allocation(plaintext.len() + BLOCK_SIZE))?;
    buffer.extend_from_slice(plaintext);
    encrypt_in_place(&mut buffer, key, iv)?;
    Ok(buffer)
}

/// Decrypt into a new buffer, leaving `ciphertext` untouched.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    check_params(key, iv)?;

    let mut buffer = ciphertext.to_vec();
    decrypt_in_place(&mut buffer, key, iv)?;
    Ok(buffer)
}

/// Grow `buffer` with zeros to the next multiple of `block_size`.
///
/// A buffer shorter than one block grows to exactly `block_size`, including an
/// empty one. Never shrinks. A `block_size` of 0 is a no-op.
pub fn align_for_block_size(buffer: &mut Vec<u8>, block_size: usize) {
    if block_size == 0 {
        return;
    }

    let len = buffer.len();
    let aligned = if len < block_size {
        block_size
    } else {
        len.div_ceil(block_size) * block_size
    };

    if aligned > len {
        buffer.resize(aligned, 0);
    }
}

/// Reverse `buffer` in place.
pub fn reverse_bytes(buffer: &mut [u8]) {
    buffer.reverse();
}

/// Whether the CPU offers AES instructions.
///
/// Informational only: the `aes` crate picks the fastest backend on its own.
pub fn hardware_acceleration_available() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        is_x86_feature_detected!("aes")
    }

    #[cfg(target_arch = "aarch64")]
    {
        std::arch::is_aarch64_feature_detected!("aes")
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

//! Passphrase encryption for note databases
//!
//! - AES-256-CBC with PKCS#7 padding, in place over `Vec<u8>` buffers
//! - PBKDF2-HMAC-SHA1 key derivation from passphrase, salt and iteration count
//!
//! Both parameter sets are fixed by the existing on-disk databases.

pub mod cipher;
pub mod key_derivation;

// Re-exports for convenience
pub use cipher::{
    BLOCK_SIZE, CipherError, CipherStatus, IV_LEN, KEY_LEN, align_for_block_size, decrypt,
    decrypt_in_place, encrypt, encrypt_in_place, reverse_bytes,
};
pub use key_derivation::{DerivedKey, KeyDerivationError, derive_key};

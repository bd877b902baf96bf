//! # noteblob-core
//!
//! DEFLATE framing, AES-256-CBC, PBKDF2-HMAC-SHA1, digests and BOM sniffing for
//! the byte buffers of a note database.
//!
//! This crate transforms bytes: compress them, encrypt them, fingerprint them,
//! work out what text encoding they announce. Bytes in, bytes out. Nothing
//! here touches the filesystem except the entropy device.
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |:--------|:------------|:-------:|
//! | `compression` | zlib stream + u32 length trailer via `flate2` | Yes |
//! | `encryption` | AES-256-CBC/PKCS#7 + PBKDF2-HMAC-SHA1 | Yes |
//! | `messagepack` | `SealedBlob` serialization via `rmp-serde` | Yes |
//! | `webarchive` | source URL of `.webarchive` imports via `plist` | Yes |
//!
//! Digests, BOM sniffing, Base64 and the bookmark interface are always built.
//!
//! ## Quick Start
//!
//! ```rust
//! use noteblob_core::compression::{compress, decompress, CompressionLevel};
//!
//! let note = b"Buy milk. Call the plumber. Buy milk again.";
//! let blob = compress(note, CompressionLevel::Default).unwrap();
//! assert_eq!(decompress(&blob).unwrap(), note);
//! ```
//!
//! ## Sealing a Note
//!
//! ```rust,no_run
//! use noteblob_core::{BlobTransformer, TransformConfig, random::EntropyDevice};
//!
//! let transformer = BlobTransformer::new(TransformConfig::default(), EntropyDevice::default()).unwrap();
//!
//! // Compress + encrypt under a passphrase
//! let sealed = transformer.seal(b"dear diary", Some(b"hunter2")).unwrap();
//!
//! // Decrypt + decompress + verify CRC32
//! let note = transformer.open(&sealed, Some(b"hunter2")).unwrap();
//! assert_eq!(note, b"dear diary");
//! ```
//!
//! ## Formats
//!
//! - **Compressed blob**: `zlib stream || original length (u32, big-endian)`
//! - **Cipher**: AES-256-CBC, 16-byte IV, PKCS#7; empty input gives one block
//! - **Key derivation**: PBKDF2-HMAC-SHA1 over (passphrase, salt, iterations)
//! - **Legacy MD5**: kept bit-for-bit compatible with fingerprints written by
//!   an old 64-bit build; never a substitute for real MD5

// Metrics and observability
pub mod metrics;
pub use metrics::OperationMetrics;

pub mod random;
pub use random::{EntropyDevice, RandomError, RandomSource};

pub mod digest;
pub use digest::{Digest, DigestAlgorithm, crc32, legacy_md5_digest, md5_digest, sha1_digest};

pub mod encoding;
pub use encoding::{DecodedText, DetectedEncoding, decode_with_bom};

pub mod base64_text;
pub use base64_text::{Base64Error, Base64Layout, decode_base64, encode_base64};

pub mod bookmark;
pub use bookmark::{Bookmark, BookmarkCodec, ResolutionError};

// Imported document metadata (feature-gated)
#[cfg(feature = "webarchive")]
pub mod webarchive;

// DEFLATE framing (feature-gated)
#[cfg(feature = "compression")]
pub mod compression;
#[cfg(feature = "compression")]
pub use compression::{CompressionError, CompressionLevel, is_compressed_format};

#[cfg(feature = "compression")]
pub mod config;
#[cfg(feature = "compression")]
pub use config::{ConfigError, TransformConfig};

// Encryption module (feature-gated)
#[cfg(feature = "encryption")]
pub mod encryption;
#[cfg(feature = "encryption")]
pub use encryption::{CipherError, CipherStatus, DerivedKey, KeyDerivationError, derive_key};
#[cfg(feature = "encryption")]
pub use random::SystemEntropy;

// Compress-then-encrypt pipeline
#[cfg(all(feature = "compression", feature = "encryption"))]
pub mod pipeline;
#[cfg(all(feature = "compression", feature = "encryption"))]
pub use pipeline::{BlobTransformer, EncryptionHeader, SealedBlob, TransformError};

//! Fingerprints for change detection and deduplication.
//!
//! Four independent, stateless digesters. Output is raw bytes; hex or other
//! text renderings are the caller's business.
//!
//! | Algorithm | Output | Notes |
//! |:----------|-------:|:------|
//! | CRC32 | 4 | zlib/PNG polynomial, big-endian bytes of the numeric value |
//! | SHA-1 | 20 | FIPS 180 |
//! | MD5 | 16 | RFC 1321 |
//! | Legacy MD5 | 16 | historical 64-bit build, see [`legacy_md5`] |

pub mod legacy_md5;

pub use legacy_md5::LegacyMd5;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};

/// Which digester to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    Crc32,
    Sha1,
    Md5Standard,
    Md5Legacy,
}

impl DigestAlgorithm {
    /// Output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Crc32 => 4,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Md5Standard | DigestAlgorithm::Md5Legacy => 16,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Crc32 => "crc32",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Md5Standard => "md5",
            DigestAlgorithm::Md5Legacy => "md5_legacy",
        }
    }
}

/// A fixed-length fingerprint tagged with the algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

impl Digest {
    pub fn compute(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        let bytes = match algorithm {
            DigestAlgorithm::Crc32 => crc32(data).to_be_bytes().to_vec(),
            DigestAlgorithm::Sha1 => sha1_digest(data).to_vec(),
            DigestAlgorithm::Md5Standard => md5_digest(data).to_vec(),
            DigestAlgorithm::Md5Legacy => legacy_md5_digest(data).to_vec(),
        };
        Digest { algorithm, bytes }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// CRC-32 (IEEE 802.3 polynomial, as in zlib and PNG).
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

pub fn sha1_digest(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

/// Standard RFC 1321 MD5.
pub fn md5_digest(data: &[u8]) -> [u8; 16] {
    Md5::digest(data).into()
}

/// MD5 as the historical builds computed it. Differs from [`md5_digest`].
pub fn legacy_md5_digest(data: &[u8]) -> [u8; 16] {
    let mut ctx = LegacyMd5::new();
    ctx.update(data);
    ctx.finalize()
}

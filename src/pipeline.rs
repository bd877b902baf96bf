//! Compress-then-encrypt pipeline for note buffers.
//!
//! Sealing order: CRC32 of the plaintext, optional DEFLATE framing, optional
//! AES-256-CBC under a PBKDF2 key with a fresh salt and IV. Opening runs the
//! steps in reverse and checks the CRC32 last, after everything else succeeded.
//!
//! The salt, IV and iteration count travel in the [`SealedBlob`]; the key
//! never does.

use crate::compression::{self, CompressionError};
use crate::config::{ConfigError, TransformConfig};
use crate::digest::{Digest, DigestAlgorithm, crc32};
use crate::encryption::cipher::{
    CipherError, IV_LEN, KEY_LEN, decrypt_in_place, encrypt_in_place,
    hardware_acceleration_available,
};
use crate::encryption::key_derivation::{KeyDerivationError, derive_key};
use crate::metrics::OperationMetrics;
use crate::random::{EntropyDevice, RandomError, RandomSource};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Error types for BlobTransformer operations
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),

    #[error(transparent)]
    Random(#[from] RandomError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("blob is encrypted and no passphrase was given")]
    PassphraseRequired,

    #[error("integrity check failed")]
    ChecksumMismatch,

    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),
}

/// Parameters needed to re-derive the key and decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionHeader {
    pub salt: Vec<u8>,
    pub iv: [u8; IV_LEN],
    pub iterations: u32,
}

/// Output of [`BlobTransformer::seal`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBlob {
    /// Transformed bytes (compressed and/or encrypted)
    pub payload: Vec<u8>,
    /// Whether `payload` (after decryption) is a compressed blob
    pub compressed: bool,
    /// Present when `payload` is ciphertext
    pub encryption: Option<EncryptionHeader>,
    /// CRC32 of the original plaintext
    pub checksum: u32,
}

impl SealedBlob {
    pub fn is_encrypted(&self) -> bool {
        self.encryption.is_some()
    }

    /// Serialize with MessagePack
    #[cfg(feature = "messagepack")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransformError> {
        rmp_serde::to_vec(self).map_err(|e| TransformError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from MessagePack
    #[cfg(feature = "messagepack")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransformError> {
        rmp_serde::from_slice(bytes).map_err(|e| TransformError::DeserializationFailed(e.to_string()))
    }
}

fn elapsed_micros(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

/// Chains compression, encryption and fingerprinting over byte buffers
pub struct BlobTransformer {
    config: TransformConfig,
    random: Box<dyn RandomSource>,
    /// Last operation metrics (interior mutability for observability)
    last_metrics: Arc<Mutex<OperationMetrics>>,
}

impl BlobTransformer {
    /// Create a transformer drawing salts and IVs from `random`
    pub fn new(
        config: TransformConfig,
        random: impl RandomSource + 'static,
    ) -> Result<Self, TransformError> {
        config.validate()?;
        Ok(BlobTransformer {
            config,
            random: Box::new(random),
            last_metrics: Arc::new(Mutex::new(OperationMetrics::new())),
        })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform `data` for storage. Encrypts only when a passphrase is given.
    pub fn seal(
        &self,
        data: &[u8],
        passphrase: Option<&[u8]>,
    ) -> Result<SealedBlob, TransformError> {
        let checksum_start = Instant::now();
        let checksum = crc32(data);
        let mut metrics = OperationMetrics::new().with_checksum(elapsed_micros(checksum_start));

        let (mut payload, compressed) = match self.config.compression {
            Some(level) => {
                let compression_start = Instant::now();
                let blob = compression::compress(data, level)?;
                metrics = metrics.with_compression(
                    elapsed_micros(compression_start),
                    data.len(),
                    blob.len(),
                );
                (blob, true)
            }
            None => (data.to_vec(), false),
        };

        let encryption = match passphrase {
            Some(passphrase) => {
                let salt = self.random.random_bytes(self.config.salt_length)?;
                let mut iv = [0u8; IV_LEN];
                self.random.fill_bytes(&mut iv)?;

                let kdf_start = Instant::now();
                let key = derive_key(passphrase, &salt, self.config.kdf_iterations, KEY_LEN)?;
                metrics = metrics.with_key_derivation(elapsed_micros(kdf_start));

                let encryption_start = Instant::now();
                encrypt_in_place(&mut payload, key.as_bytes(), &iv)?;
                metrics = metrics.with_encryption(
                    elapsed_micros(encryption_start),
                    hardware_acceleration_available(),
                );

                Some(EncryptionHeader {
                    salt,
                    iv,
                    iterations: self.config.kdf_iterations,
                })
            }
            None => None,
        };

        debug!(
            original = data.len(),
            sealed = payload.len(),
            compressed,
            encrypted = encryption.is_some(),
            "sealed blob"
        );
        self.record(metrics);

        Ok(SealedBlob {
            payload,
            compressed,
            encryption,
            checksum,
        })
    }

    /// Recover the original bytes from a [`SealedBlob`].
    pub fn open(
        &self,
        sealed: &SealedBlob,
        passphrase: Option<&[u8]>,
    ) -> Result<Vec<u8>, TransformError> {
        let mut metrics = OperationMetrics::new();
        let mut payload = sealed.payload.clone();

        match (&sealed.encryption, passphrase) {
            (Some(header), Some(passphrase)) => {
                let kdf_start = Instant::now();
                let key = derive_key(passphrase, &header.salt, header.iterations, KEY_LEN)?;
                metrics = metrics.with_key_derivation(elapsed_micros(kdf_start));

                let decryption_start = Instant::now();
                decrypt_in_place(&mut payload, key.as_bytes(), &header.iv)?;
                metrics = metrics.with_encryption(
                    elapsed_micros(decryption_start),
                    hardware_acceleration_available(),
                );
            }
            (Some(_), None) => return Err(TransformError::PassphraseRequired),
            (None, Some(_)) => debug!("passphrase given for an unencrypted blob, ignoring it"),
            (None, None) => {}
        }

        let data = if sealed.compressed {
            let compression_start = Instant::now();
            let data = compression::decompress(&payload)?;
            metrics = metrics.with_compression(
                elapsed_micros(compression_start),
                data.len(),
                payload.len(),
            );
            data
        } else {
            payload
        };

        let checksum_start = Instant::now();
        if crc32(&data) != sealed.checksum {
            return Err(TransformError::ChecksumMismatch);
        }
        metrics = metrics.with_checksum(elapsed_micros(checksum_start));

        self.record(metrics);
        Ok(data)
    }

    /// Seal and serialize in one step
    #[cfg(feature = "messagepack")]
    pub fn store(&self, data: &[u8], passphrase: Option<&[u8]>) -> Result<Vec<u8>, TransformError> {
        self.seal(data, passphrase)?.to_bytes()
    }

    /// Deserialize and open in one step
    #[cfg(feature = "messagepack")]
    pub fn retrieve(
        &self,
        bytes: &[u8],
        passphrase: Option<&[u8]>,
    ) -> Result<Vec<u8>, TransformError> {
        let sealed = SealedBlob::from_bytes(bytes)?;
        self.open(&sealed, passphrase)
    }

    /// Fingerprint `data` for change detection or deduplication
    pub fn fingerprint(&self, data: &[u8], algorithm: DigestAlgorithm) -> Digest {
        Digest::compute(algorithm, data)
    }

    /// Get metrics from last operation
    ///
    /// Returns a snapshot of metrics from the most recent seal() or open() call
    pub fn get_last_metrics(&self) -> OperationMetrics {
        self.last_metrics
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_else(|_| OperationMetrics::new())
    }

    fn record(&self, metrics: OperationMetrics) {
        if let Ok(mut last) = self.last_metrics.lock() {
            *last = metrics;
        }
    }
}

impl Default for BlobTransformer {
    /// Default settings, salts and IVs from the kernel entropy device
    fn default() -> Self {
        BlobTransformer {
            config: TransformConfig::default(),
            random: Box::new(EntropyDevice::default()),
            last_metrics: Arc::new(Mutex::new(OperationMetrics::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU8, Ordering};

    /// Deterministic source: each byte is one more than the last.
    struct CountingSource(AtomicU8);

    impl RandomSource for CountingSource {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
            for byte in dest.iter_mut() {
                *byte = self.0.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        }
    }

    struct BrokenSource;

    impl RandomSource for BrokenSource {
        fn fill_bytes(&self, _dest: &mut [u8]) -> Result<(), RandomError> {
            Err(RandomError::EntropySourceUnavailable("test".into()))
        }
    }

    fn transformer(config: TransformConfig) -> BlobTransformer {
        BlobTransformer::new(config, CountingSource(AtomicU8::new(0))).unwrap()
    }

    fn fast_config() -> TransformConfig {
        TransformConfig {
            kdf_iterations: 10,
            ..TransformConfig::default()
        }
    }

    #[test]
    fn test_plain_roundtrip() {
        let t = transformer(fast_config());
        let sealed = t.seal(b"just compression", None).unwrap();
        assert!(sealed.compressed);
        assert!(!sealed.is_encrypted());
        assert!(compression::is_compressed_format(&sealed.payload));
        assert_eq!(t.open(&sealed, None).unwrap(), b"just compression");
    }

    #[test]
    fn test_encrypted_roundtrip() {
        let t = transformer(fast_config());
        let sealed = t.seal(b"secret note", Some(b"pw")).unwrap();

        let header = sealed.encryption.as_ref().unwrap();
        assert_eq!(header.salt.len(), 32);
        assert_eq!(header.iterations, 10);
        assert_eq!(sealed.payload.len() % 16, 0);

        assert_eq!(t.open(&sealed, Some(b"pw")).unwrap(), b"secret note");
    }

    #[test]
    fn test_salt_and_iv_come_from_source() {
        let t = transformer(fast_config());
        let sealed = t.seal(b"x", Some(b"pw")).unwrap();
        let header = sealed.encryption.unwrap();

        let expected_salt: Vec<u8> = (0..32).collect();
        let expected_iv: Vec<u8> = (32..48).collect();
        assert_eq!(header.salt, expected_salt);
        assert_eq!(header.iv.to_vec(), expected_iv);
    }

    #[test]
    fn test_missing_passphrase() {
        let t = transformer(fast_config());
        let sealed = t.seal(b"secret", Some(b"pw")).unwrap();
        assert!(matches!(
            t.open(&sealed, None),
            Err(TransformError::PassphraseRequired)
        ));
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let t = transformer(fast_config());
        let sealed = t.seal(b"secret note body", Some(b"right")).unwrap();
        assert!(t.open(&sealed, Some(b"wrong")).is_err());
    }

    #[test]
    fn test_uncompressed_config() {
        let t = transformer(TransformConfig {
            kdf_iterations: 10,
            ..TransformConfig::uncompressed()
        });
        let sealed = t.seal(b"raw", None).unwrap();
        assert!(!sealed.compressed);
        assert_eq!(sealed.payload, b"raw");
        assert_eq!(t.open(&sealed, None).unwrap(), b"raw");
    }

    #[test]
    fn test_checksum_mismatch() {
        let t = transformer(fast_config());
        let mut sealed = t.seal(b"data", None).unwrap();
        sealed.checksum ^= 1;
        assert!(matches!(
            t.open(&sealed, None),
            Err(TransformError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let t = BlobTransformer::new(fast_config(), BrokenSource).unwrap();
        assert!(matches!(
            t.seal(b"data", Some(b"pw")),
            Err(TransformError::Random(RandomError::EntropySourceUnavailable(_)))
        ));
        // No passphrase, no entropy needed
        assert!(t.seal(b"data", None).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TransformConfig {
            kdf_iterations: 0,
            ..TransformConfig::default()
        };
        assert!(matches!(
            BlobTransformer::new(config, BrokenSource),
            Err(TransformError::Config(ConfigError::ZeroIterations))
        ));
    }

    #[test]
    fn test_metrics_recorded() {
        let t = transformer(fast_config());
        let data = vec![b'z'; 10_000];
        t.seal(&data, Some(b"pw")).unwrap();

        let metrics = t.get_last_metrics();
        assert!(metrics.compression_ratio > 1.0);
        assert!(metrics.key_derivation_time_micros.is_some());
        assert!(metrics.encryption_time_micros.is_some());
    }

    #[cfg(feature = "messagepack")]
    #[test]
    fn test_store_retrieve() {
        let t = transformer(fast_config());
        let bytes = t.store(b"persist me", Some(b"pw")).unwrap();
        assert_eq!(t.retrieve(&bytes, Some(b"pw")).unwrap(), b"persist me");
    }

    #[cfg(feature = "messagepack")]
    #[test]
    fn test_retrieve_garbage() {
        let t = transformer(fast_config());
        assert!(matches!(
            t.retrieve(b"\xc1not msgpack", None),
            Err(TransformError::DeserializationFailed(_))
        ));
    }
}

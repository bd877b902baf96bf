//! Timings for the last sealing or opening of a blob
//!
//! Filled in by [`crate::pipeline::BlobTransformer`] so callers can see where
//! time went (compression, fingerprinting, key derivation, cipher) without
//! wrapping every call in their own timers.

use serde::{Deserialize, Serialize};

/// Operation metrics for the transformation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMetrics {
    /// Compression or decompression time in microseconds (0 if not performed)
    pub compression_time_micros: u64,

    /// Compression ratio (original_size / compressed_size, >1.0 means compression helped)
    pub compression_ratio: f64,

    /// CRC32 fingerprint time in microseconds
    pub checksum_time_micros: u64,

    /// PBKDF2 time in microseconds (None if not performed)
    pub key_derivation_time_micros: Option<u64>,

    /// AES-CBC time in microseconds (None if not performed)
    pub encryption_time_micros: Option<u64>,

    /// Whether the CPU offers AES instructions
    pub hardware_accelerated: bool,
}

impl OperationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        OperationMetrics {
            compression_time_micros: 0,
            compression_ratio: 1.0,
            checksum_time_micros: 0,
            key_derivation_time_micros: None,
            encryption_time_micros: None,
            hardware_accelerated: false,
        }
    }

    /// Set compression metrics
    pub fn with_compression(
        mut self,
        time_micros: u64,
        original_size: usize,
        compressed_size: usize,
    ) -> Self {
        self.compression_time_micros = time_micros;
        if compressed_size > 0 {
            self.compression_ratio = original_size as f64 / compressed_size as f64;
        }
        self
    }

    /// Set checksum metrics
    pub fn with_checksum(mut self, time_micros: u64) -> Self {
        self.checksum_time_micros = time_micros;
        self
    }

    /// Set key derivation metrics
    pub fn with_key_derivation(mut self, time_micros: u64) -> Self {
        self.key_derivation_time_micros = Some(time_micros);
        self
    }

    /// Set encryption metrics
    pub fn with_encryption(mut self, time_micros: u64, hw_accel: bool) -> Self {
        self.encryption_time_micros = Some(time_micros);
        self.hardware_accelerated = hw_accel;
        self
    }

    /// Total operation time in microseconds
    pub fn total_time_micros(&self) -> u64 {
        self.compression_time_micros
            + self.checksum_time_micros
            + self.key_derivation_time_micros.unwrap_or(0)
            + self.encryption_time_micros.unwrap_or(0)
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

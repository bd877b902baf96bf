//! Transformation settings.

use crate::compression::CompressionLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// PBKDF2 iteration count written into new encrypted blobs.
pub const DEFAULT_KDF_ITERATIONS: u32 = 8000;

/// Salt length in bytes for new encrypted blobs.
pub const DEFAULT_SALT_LENGTH: usize = 32;

/// Upper bound on `salt_length`; salts are drawn from a blocking device.
pub const MAX_SALT_LENGTH: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("kdf_iterations must be at least 1")]
    ZeroIterations,

    #[error("salt_length must be at least 1")]
    ZeroSaltLength,

    #[error("salt_length {0} exceeds the maximum of {max}", max = MAX_SALT_LENGTH)]
    SaltTooLong(usize),
}

/// Settings for [`crate::pipeline::BlobTransformer`].
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// # use noteblob_core::config::TransformConfig;
/// let config: TransformConfig = serde_json::from_str(r#"{"kdf_iterations": 20000}"#).unwrap();
/// assert_eq!(config.kdf_iterations, 20000);
/// assert_eq!(config.salt_length, 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Compress before encrypting. `None` stores the payload as-is.
    pub compression: Option<CompressionLevel>,

    /// PBKDF2 iterations used when sealing.
    pub kdf_iterations: u32,

    /// Random salt bytes drawn per sealed blob.
    pub salt_length: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            compression: Some(CompressionLevel::Default),
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            salt_length: DEFAULT_SALT_LENGTH,
        }
    }
}

impl TransformConfig {
    /// Defaults without compression.
    pub fn uncompressed() -> Self {
        Self {
            compression: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kdf_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.salt_length == 0 {
            return Err(ConfigError::ZeroSaltLength);
        }
        if self.salt_length > MAX_SALT_LENGTH {
            return Err(ConfigError::SaltTooLong(self.salt_length));
        }
        Ok(())
    }
}

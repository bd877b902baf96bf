//! Cryptographically unpredictable bytes for salts and IVs.
//!
//! [`RandomSource`] is a capability rather than a global so callers (and tests)
//! decide where entropy comes from. There is no pseudo-random fallback: if the
//! entropy source fails, the call fails.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Blocking kernel entropy device.
pub const DEFAULT_ENTROPY_DEVICE: &str = "/dev/random";

/// Errors that can occur while gathering random bytes
#[derive(Error, Debug)]
pub enum RandomError {
    #[error("entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),

    #[error("short read from entropy source: wanted {wanted} bytes, got {got}")]
    PartialRandomRead { wanted: usize, got: usize },
}

/// A supplier of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` completely or fail.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError>;

    /// Return `n` fresh random bytes.
    fn random_bytes(&self, n: usize) -> Result<Vec<u8>, RandomError> {
        let mut bytes = vec![0u8; n];
        self.fill_bytes(&mut bytes)?;
        Ok(bytes)
    }
}

/// Reads from an entropy character device such as `/dev/random`.
///
/// The device is opened per call. Reads may block until the kernel has
/// gathered enough entropy; interrupted reads are retried.
#[derive(Debug, Clone)]
pub struct EntropyDevice {
    path: PathBuf,
}

impl EntropyDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EntropyDevice { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for EntropyDevice {
    fn default() -> Self {
        Self::new(DEFAULT_ENTROPY_DEVICE)
    }
}

impl RandomSource for EntropyDevice {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        if dest.is_empty() {
            return Ok(());
        }

        let mut device = File::open(&self.path).map_err(|e| {
            RandomError::EntropySourceUnavailable(format!("{}: {e}", self.path.display()))
        })?;

        let wanted = dest.len();
        let mut filled = 0;
        while filled < wanted {
            match device.read(&mut dest[filled..]) {
                Ok(0) => return Err(RandomError::PartialRandomRead { wanted, got: filled }),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    debug!(path = %self.path.display(), "entropy read interrupted, retrying");
                }
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "entropy read failed");
                    return Err(RandomError::PartialRandomRead { wanted, got: filled });
                }
            }
        }
        Ok(())
    }
}

/// The operating system CSPRNG via `ring`.
#[cfg(feature = "encryption")]
#[derive(Debug)]
pub struct SystemEntropy {
    rng: ring::rand::SystemRandom,
}

#[cfg(feature = "encryption")]
impl SystemEntropy {
    pub fn new() -> Self {
        SystemEntropy {
            rng: ring::rand::SystemRandom::new(),
        }
    }
}

#[cfg(feature = "encryption")]
impl Default for SystemEntropy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "encryption")]
impl RandomSource for SystemEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        use ring::rand::SecureRandom;

        self.rng.fill(dest).map_err(|_| {
            RandomError::EntropySourceUnavailable("system random generator failed".into())
        })
    }
}

/// `n` bytes from the default entropy device.
pub fn random_bytes(n: usize) -> Result<Vec<u8>, RandomError> {
    EntropyDevice::default().random_bytes(n)
}

//! Test fixtures and constants for noteblob-core tests.
//!
//! Common note payloads, cipher key material and helpers used across the
//! compression, cipher, pipeline and property-based tests.

#![allow(dead_code)]

use noteblob_core::random::{RandomError, RandomSource};
use std::io;
use std::sync::{Arc, Mutex};

// ============================================================================
// Common Test Data
// ============================================================================

/// Empty data - minimal test case for boundary conditions
pub const EMPTY_DATA: &[u8] = b"";

/// Small data - a typical short note
pub const SMALL_DATA: &[u8] = b"hello world";

/// Unicode data - validates UTF-8 handling with emoji and international characters
pub const UNICODE_DATA: &[u8] = "Notizen 世界 🚀 café".as_bytes();

/// Size for large data tests (10MB), generated in tests as needed
pub const LARGE_DATA_SIZE: usize = 10_000_000;

// ============================================================================
// Cipher Test Key Material
// ============================================================================

/// AES-256 key from NIST SP 800-38A F.2.5
pub const TEST_KEY: &[u8; 32] = &[
    0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81,
    0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3, 0x09, 0x14, 0xdf, 0xf4,
];

/// IV from NIST SP 800-38A F.2.5
pub const TEST_IV: &[u8; 16] = &[
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];

/// Passphrase used by pipeline tests
pub const TEST_PASSPHRASE: &[u8] = b"correct horse battery staple";

/// Low iteration count so PBKDF2 doesn't dominate test time
pub const FAST_ITERATIONS: u32 = 16;

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate deterministic large data for testing (filled with pattern byte)
pub fn generate_large_data(size: usize, pattern: u8) -> Vec<u8> {
    vec![pattern; size]
}

/// Generate random-looking incompressible data (for compression ratio tests)
///
/// Uses a simple PRNG (not cryptographically secure) to create data that
/// won't compress well. Deterministic seed ensures reproducibility.
pub fn generate_incompressible_data(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = SimplePcg::new(seed);
    (0..size).map(|_| rng.next_byte()).collect()
}

/// Repetitive note-like text, compresses well
pub fn generate_note_text(lines: usize) -> Vec<u8> {
    (0..lines)
        .map(|i| format!("- [ ] item {i}: remember to water the plants\n"))
        .collect::<String>()
        .into_bytes()
}

// Simple PCG random number generator (deterministic, not crypto-secure)
struct SimplePcg {
    state: u64,
}

impl SimplePcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_byte(&mut self) -> u8 {
        // PCG algorithm: https://www.pcg-random.org/
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        (xor_shifted.rotate_right(rot) & 0xff) as u8
    }
}

/// Reproducible [`RandomSource`] for pipeline tests. Never use outside tests.
pub struct SeededSource {
    rng: Mutex<SimplePcg>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SimplePcg::new(seed)),
        }
    }
}

impl RandomSource for SeededSource {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| RandomError::EntropySourceUnavailable("poisoned".into()))?;
        for byte in dest.iter_mut() {
            *byte = rng.next_byte();
        }
        Ok(())
    }
}

// ============================================================================
// Log Capture
// ============================================================================

/// In-memory sink for formatted `tracing` output
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|buf| buf.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records events matching `filter`, return the text
pub fn capture_logs(filter: &str, f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_constants() {
        assert_eq!(EMPTY_DATA, b"");
        assert_eq!(SMALL_DATA, b"hello world");
        assert!(UNICODE_DATA.len() > SMALL_DATA.len());
        assert_eq!(LARGE_DATA_SIZE, 10_000_000);
        assert_eq!(TEST_KEY.len(), 32);
        assert_eq!(TEST_IV.len(), 16);
    }

    #[test]
    fn test_generate_incompressible_data() {
        let data1 = generate_incompressible_data(1000, 12345);
        let data2 = generate_incompressible_data(1000, 12345);
        let data3 = generate_incompressible_data(1000, 54321);

        // Same seed produces same data (deterministic)
        assert_eq!(data1, data2);

        // Different seed produces different data
        assert_ne!(data1, data3);

        let unique_bytes: std::collections::HashSet<u8> = data1.iter().copied().collect();
        assert!(
            unique_bytes.len() > 10,
            "Incompressible data should have variety"
        );
    }

    #[test]
    fn test_capture_logs_records_events() {
        let output = capture_logs("warn", || tracing::warn!(answer = 42, "captured"));
        assert!(output.contains("WARN"));
        assert!(output.contains("captured"));
        assert!(output.contains("answer=42"));

        let output = capture_logs("warn", || tracing::debug!("filtered out"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let a = SeededSource::new(7).random_bytes(64).unwrap();
        let b = SeededSource::new(7).random_bytes(64).unwrap();
        assert_eq!(a, b);
    }
}

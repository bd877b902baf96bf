#![no_main]

use libfuzzer_sys::fuzz_target;
use noteblob_core::{BlobTransformer, SealedBlob, TransformConfig, random::SystemEntropy};

fuzz_target!(|data: &[u8]| {
    // Parsing untrusted MessagePack must never panic
    let Ok(sealed) = SealedBlob::from_bytes(data) else {
        return;
    };

    // Keep PBKDF2 cheap and decompression bounded
    if let Some(header) = &sealed.encryption {
        if header.iterations > 64 {
            return;
        }
    }
    if sealed.compressed && sealed.payload.len() >= 4 {
        let tail = &sealed.payload[sealed.payload.len() - 4..];
        if u32::from_be_bytes([tail[0], tail[1], tail[2], tail[3]]) > 1 << 20 {
            return;
        }
    }

    let transformer = match BlobTransformer::new(TransformConfig::default(), SystemEntropy::new()) {
        Ok(transformer) => transformer,
        Err(_) => return,
    };

    // Opening forged blobs fails cleanly or yields bytes matching the checksum
    if let Ok(plaintext) = transformer.open(&sealed, Some(b"fuzz")) {
        assert_eq!(noteblob_core::crc32(&plaintext), sealed.checksum);
    }
});

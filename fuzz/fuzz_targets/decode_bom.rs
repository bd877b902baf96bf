#![no_main]

use libfuzzer_sys::fuzz_target;
use noteblob_core::encoding::{DetectedEncoding, decode_with_bom};

fuzz_target!(|data: &[u8]| {
    let Some(decoded) = decode_with_bom(data) else {
        return;
    };

    // Detection implies an even, non-empty buffer that starts with the mark
    assert!(!data.is_empty() && data.len() % 2 == 0);
    let mark: &[u8] = match decoded.encoding {
        DetectedEncoding::Utf16BigEndian => &[0xfe, 0xff],
        DetectedEncoding::Utf16LittleEndian => &[0xff, 0xfe],
        DetectedEncoding::Utf8 => &[0xef, 0xbb, 0xbf],
    };
    assert!(data.starts_with(mark));

    // Re-encoding UTF-8 text reproduces the body exactly
    if decoded.encoding == DetectedEncoding::Utf8 {
        assert_eq!(decoded.text.as_bytes(), &data[3..]);
    }
});

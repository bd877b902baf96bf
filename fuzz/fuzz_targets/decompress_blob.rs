#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use noteblob_core::compression::{TRAILER_LEN, decompress, is_compressed_format};

/// Cap on the declared length so the fuzzer can't ask for gigabytes up front
const MAX_DECLARED: u32 = 1 << 20;

#[derive(Arbitrary, Debug)]
struct BlobCase {
    /// Bytes placed before the trailer (zlib header and stream, or garbage)
    stream: Vec<u8>,
    /// Length written into the trailer
    declared: u32,
}

fuzz_target!(|case: BlobCase| {
    let declared = case.declared % MAX_DECLARED;
    let mut blob = case.stream;
    blob.extend_from_slice(&declared.to_be_bytes());

    // Property 1: never panics, whatever the stream holds
    let result = decompress(&blob);

    // Property 2: anything accepted passed the sniff and fits the trailer
    if let Ok(output) = &result {
        assert!(is_compressed_format(&blob));
        assert!(blob.len() > TRAILER_LEN);
        assert!(output.len() <= declared as usize);
    }
});

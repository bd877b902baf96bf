//! DEFLATE framing for note buffers.
//!
//! A compressed blob is a zlib (RFC 1950) stream followed by the uncompressed
//! length as a big-endian u32:
//!
//! ```text
//! [zlib stream][original_len: u32 BE]
//! ```
//!
//! The trailer is this crate's own convention and is required for
//! decompression: the output buffer is sized from it before inflating.
//! - Output capacity for compression is the DEFLATE worst case plus the trailer
//! - A stream that inflates past the declared length is rejected
//! - A stream that inflates short of the declared length is accepted with a warning

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Size of the big-endian length trailer appended to every blob.
pub const TRAILER_LEN: usize = 4;

/// Fixed zlib overhead allowed for by the output bound (header, empty block, adler32).
const ZLIB_OVERHEAD: usize = 12;

/// Error types for CompressionCodec operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("could not allocate {0} bytes")]
    Allocation(usize),

    #[error("input of {0} bytes does not fit the length trailer")]
    InputTooLarge(usize),

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("buffer is not in compressed format")]
    InvalidFormat,

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),
}

/// DEFLATE level: 0 (stored) through 9 (smallest), or the codec default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLevel {
    #[default]
    Default,
    Level(u32),
}

impl CompressionLevel {
    pub const FASTEST: CompressionLevel = CompressionLevel::Level(1);
    pub const BEST: CompressionLevel = CompressionLevel::Level(9);

    /// Level from a raw number. Anything above 9 means the default level.
    pub fn new(level: u32) -> Self {
        if level <= 9 {
            CompressionLevel::Level(level)
        } else {
            CompressionLevel::Default
        }
    }

    fn to_flate2(self) -> Compression {
        match self {
            CompressionLevel::Level(level) if level <= 9 => Compression::new(level),
            CompressionLevel::Level(level) => {
                debug!(level, "compression level out of range, using default");
                Compression::default()
            }
            CompressionLevel::Default => Compression::default(),
        }
    }
}

/// Worst-case blob size for `len` input bytes: `ceil(len * 1.001) + 12 + 4`.
///
/// Integer arithmetic only, so the bound is exact for every `len`.
pub fn max_compressed_len(len: usize) -> usize {
    len.saturating_add(len.div_ceil(1000))
        .saturating_add(ZLIB_OVERHEAD + TRAILER_LEN)
}

/// Compress `data` at `level` and append the length trailer.
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CompressionError> {
    let original_len =
        u32::try_from(data.len()).map_err(|_| CompressionError::InputTooLarge(data.len()))?;

    let capacity = max_compressed_len(data.len());
    let mut output = Vec::new();
    output
        .try_reserve_exact(capacity)
        .map_err(|_| CompressionError::Allocation(capacity))?;

    let mut codec = Compress::new(level.to_flate2(), true);
    match codec.compress_vec(data, &mut output, FlushCompress::Finish) {
        Ok(Status::StreamEnd) => {}
        Ok(status) => {
            return Err(CompressionError::CompressionFailed(format!(
                "codec stopped with status {status:?}"
            )));
        }
        Err(e) => return Err(CompressionError::CompressionFailed(e.to_string())),
    }

    output.extend_from_slice(&original_len.to_be_bytes());

    debug!(
        original = data.len(),
        compressed = output.len(),
        "compressed buffer"
    );
    Ok(output)
}

/// Compress at the codec's default level.
pub fn compressed_data(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    compress(data, CompressionLevel::Default)
}

/// Inflate a blob produced by [`compress`].
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>, CompressionError> {
    if blob.len() < TRAILER_LEN + 2 || !is_compressed_format(blob) {
        return Err(CompressionError::InvalidFormat);
    }

    let (stream, trailer) = blob.split_at(blob.len() - TRAILER_LEN);
    let trailer: [u8; TRAILER_LEN] = trailer
        .try_into()
        .map_err(|_| CompressionError::InvalidFormat)?;
    let declared = u32::from_be_bytes(trailer) as usize;

    let mut output = Vec::new();
    output
        .try_reserve_exact(declared)
        .map_err(|_| CompressionError::Allocation(declared))?;

    // Output space is exactly the declared length; a longer stream cannot finish.
    let mut codec = Decompress::new(true);
    match codec.decompress_vec(stream, &mut output, FlushDecompress::Finish) {
        Ok(Status::StreamEnd) => {}
        Ok(status) => {
            return Err(CompressionError::DecompressionFailed(format!(
                "stream did not end within {declared} bytes ({status:?})"
            )));
        }
        Err(e) => return Err(CompressionError::DecompressionFailed(e.to_string())),
    }

    if output.len() > declared {
        return Err(CompressionError::DecompressionFailed(format!(
            "stream inflated to {} bytes, trailer declares {declared}",
            output.len()
        )));
    }

    if output.len() != declared {
        warn!(
            declared,
            inflated = output.len(),
            "decompressed size does not match length trailer"
        );
    }

    Ok(output)
}

/// Cheap zlib header check: deflate method, 32K-or-smaller window, FCHECK valid.
///
/// This is a pre-filter. Arbitrary bytes pass it roughly once in 500 tries.
pub fn is_compressed_format(data: &[u8]) -> bool {
    let [cmf, flg, ..] = *data else {
        return false;
    };
    cmf & 0x0f == 8 && cmf & 0x80 == 0 && u16::from_be_bytes([cmf, flg]) % 31 == 0
}

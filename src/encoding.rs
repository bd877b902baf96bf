//! Byte-order-mark detection for imported text files.
//!
//! Only an explicit mark is trusted. Anything else is reported as "no
//! detection" and the importer applies its own fallback policy.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use serde::{Deserialize, Serialize};

/// Encoding announced by a byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectedEncoding {
    Utf16BigEndian,
    Utf16LittleEndian,
    Utf8,
}

impl DetectedEncoding {
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            DetectedEncoding::Utf16BigEndian => UTF_16BE,
            DetectedEncoding::Utf16LittleEndian => UTF_16LE,
            DetectedEncoding::Utf8 => UTF_8,
        }
    }

    /// Length of the mark in bytes.
    pub fn bom_len(&self) -> usize {
        match self {
            DetectedEncoding::Utf16BigEndian | DetectedEncoding::Utf16LittleEndian => 2,
            DetectedEncoding::Utf8 => 3,
        }
    }
}

/// Text decoded after a recognized mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: DetectedEncoding,
}

fn sniff_bom(data: &[u8]) -> Option<DetectedEncoding> {
    match data {
        [0xfe, 0xff, ..] => Some(DetectedEncoding::Utf16BigEndian),
        [0xff, 0xfe, ..] => Some(DetectedEncoding::Utf16LittleEndian),
        [0xef, 0xbb, 0xbf, ..] => Some(DetectedEncoding::Utf8),
        _ => None,
    }
}

/// Decode `data` if it starts with a UTF-16 or UTF-8 byte-order mark.
///
/// Returns `None` when:
/// - `data` is empty or has odd length (checked first, for every encoding)
/// - there is no recognized mark
/// - the bytes after the mark are not valid in the announced encoding
pub fn decode_with_bom(data: &[u8]) -> Option<DecodedText> {
    if data.is_empty() || data.len() % 2 != 0 {
        return None;
    }

    let encoding = sniff_bom(data)?;
    let body = &data[encoding.bom_len()..];
    let text = encoding
        .encoding()
        .decode_without_bom_handling_and_without_replacement(body)?;

    Some(DecodedText {
        text: text.into_owned(),
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_big_endian() {
        let decoded = decode_with_bom(&[0xfe, 0xff, 0x00, 0x41]).unwrap();
        assert_eq!(decoded.text, "A");
        assert_eq!(decoded.encoding, DetectedEncoding::Utf16BigEndian);
    }

    #[test]
    fn test_utf16_little_endian() {
        let decoded = decode_with_bom(&[0xff, 0xfe, 0x41, 0x00]).unwrap();
        assert_eq!(decoded.text, "A");
        assert_eq!(decoded.encoding, DetectedEncoding::Utf16LittleEndian);
    }

    #[test]
    fn test_utf8() {
        let decoded = decode_with_bom(&[0xef, 0xbb, 0xbf, 0x41]).unwrap();
        assert_eq!(decoded.text, "A");
        assert_eq!(decoded.encoding, DetectedEncoding::Utf8);
    }

    #[test]
    fn test_no_mark() {
        assert_eq!(decode_with_bom(&[0x41, 0x42]), None);
    }

    #[test]
    fn test_empty_and_odd_lengths() {
        assert_eq!(decode_with_bom(&[]), None);
        assert_eq!(decode_with_bom(&[0xfe, 0xff, 0x00]), None);
        // a UTF-8 mark does not rescue an odd-length buffer
        assert_eq!(decode_with_bom(&[0xef, 0xbb, 0xbf]), None);
    }

    #[test]
    fn test_mark_only() {
        let decoded = decode_with_bom(&[0xfe, 0xff]).unwrap();
        assert_eq!(decoded.text, "");
    }

    #[test]
    fn test_surrogate_pair() {
        let decoded = decode_with_bom(&[0xfe, 0xff, 0xd8, 0x3d, 0xde, 0x00]).unwrap();
        assert_eq!(decoded.text, "\u{1F600}");

        let decoded = decode_with_bom(&[0xff, 0xfe, 0x3d, 0xd8, 0x00, 0xde]).unwrap();
        assert_eq!(decoded.text, "\u{1F600}");
    }

    #[test]
    fn test_lone_surrogate_is_not_detected() {
        assert_eq!(decode_with_bom(&[0xfe, 0xff, 0xd8, 0x00]), None);
    }

    #[test]
    fn test_invalid_utf8_body() {
        assert_eq!(decode_with_bom(&[0xef, 0xbb, 0xbf, 0xff, 0xff, 0x41]), None);
    }

    #[test]
    fn test_multibyte_utf8_body() {
        let mut data = vec![0xef, 0xbb, 0xbf];
        data.extend_from_slice("héllo".as_bytes());
        // 3 + 6 = 9 bytes is odd; pad with a space to make it even
        data.push(b' ');
        let decoded = decode_with_bom(&data).unwrap();
        assert_eq!(decoded.text, "héllo ");
    }
}

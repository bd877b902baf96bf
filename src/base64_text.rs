//! Base64 text renderings of binary buffers.
//!
//! Two layouts: compact (one line, no breaks) and the legacy wrapped form of
//! 76-character lines, each terminated by a line feed.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Line width of the wrapped layout.
pub const WRAP_COLUMN: usize = 76;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Base64Error {
    #[error("invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Base64Layout {
    #[default]
    Compact,
    Wrapped,
}

pub fn encode_base64(data: &[u8], layout: Base64Layout) -> String {
    let encoded = STANDARD.encode(data);
    match layout {
        Base64Layout::Compact => encoded,
        Base64Layout::Wrapped => wrap_lines(&encoded, WRAP_COLUMN),
    }
}

/// Decode either layout. ASCII whitespace anywhere in `text` is ignored.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, Base64Error> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

fn wrap_lines(encoded: &str, width: usize) -> String {
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / width + 1);
    // base64 output is ASCII, so every byte offset is a char boundary
    for start in (0..encoded.len()).step_by(width) {
        let end = (start + width).min(encoded.len());
        wrapped.push_str(&encoded[start..end]);
        wrapped.push('\n');
    }
    wrapped
}

//! Relocatable file references, stored as opaque bytes.
//!
//! Producing and resolving bookmarks is platform work done by an external
//! collaborator implementing [`BookmarkCodec`]. This crate only carries the
//! resulting blob around and hands it back unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("bookmark could not be created: {0}")]
    CreationFailed(String),

    #[error("bookmark could not be resolved: {0}")]
    Unresolvable(String),
}

/// An opaque bookmark blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookmark(Vec<u8>);

impl Bookmark {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Bookmark(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bookmark {
    fn from(bytes: Vec<u8>) -> Self {
        Bookmark(bytes)
    }
}

impl AsRef<[u8]> for Bookmark {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Conversion between a live file reference and a [`Bookmark`].
pub trait BookmarkCodec {
    /// The platform's live file reference type.
    type Reference;

    fn to_bookmark(&self, reference: &Self::Reference) -> Result<Bookmark, ResolutionError>;

    fn from_bookmark(&self, bookmark: &Bookmark) -> Result<Self::Reference, ResolutionError>;
}

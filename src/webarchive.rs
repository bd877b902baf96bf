//! Source URL of an imported web archive.
//!
//! A `.webarchive` is a property list (binary or XML) whose top-level
//! dictionary holds the page under `WebMainResource`; that resource records
//! where it was loaded from in `WebResourceURL`. Only that one string is read.

use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct WebArchive {
    #[serde(rename = "WebMainResource")]
    main_resource: WebResource,
}

#[derive(Deserialize)]
struct WebResource {
    #[serde(rename = "WebResourceURL")]
    url: String,
}

/// URL of the main resource in a web archive, or `None` if `data` is not a
/// property list or lacks `WebMainResource` / `WebResourceURL`.
pub fn main_resource_url(data: &[u8]) -> Option<String> {
    match plist::from_bytes::<WebArchive>(data) {
        Ok(archive) => Some(archive.main_resource.url),
        Err(e) => {
            debug!(error = %e, "not a readable web archive");
            None
        }
    }
}

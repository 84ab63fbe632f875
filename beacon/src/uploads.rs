//! Incoming file acceptance policy.
//!
//! Files are validated before anything is persisted: the declared MIME type
//! must be an image type or PDF, and the size must stay under the configured
//! ceiling. Accepted files are held fully in memory for the duration of the
//! request - there is no on-disk staging - and are either encoded inline as a
//! data URI into the owning record or recorded as a metadata row, per the
//! deployment-time encoding choice.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mime::Mime;

use crate::config::UploadsConfig;
use crate::errors::{Error, Result};

/// Validates incoming files against the configured acceptance rules.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: u64,
}

impl UploadPolicy {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
        }
    }

    /// Reject a file by declared type or size. Must run before any persistence.
    pub fn validate(&self, declared_mime: &str, size_bytes: u64) -> Result<()> {
        let mime: Mime = declared_mime.parse().map_err(|_| Error::UnsupportedMedia {
            mime: declared_mime.to_string(),
        })?;

        let accepted = mime.type_() == mime::IMAGE || mime.essence_str() == "application/pdf";
        if !accepted {
            return Err(Error::UnsupportedMedia {
                mime: declared_mime.to_string(),
            });
        }

        if size_bytes > self.max_bytes {
            return Err(Error::PayloadTooLarge { limit: self.max_bytes });
        }

        Ok(())
    }
}

/// Encode a file as a self-describing inline data URI.
pub fn to_data_uri(mime_type: &str, content: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(content))
}

//! Banners
//!
//! Promotional images attached to coupons. Uploaded files are inlined as data
//! URIs; nothing is sent to an image host.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;
use tracing::warn;

use crate::coupons::Coupon;

/// Size the console advises banners stay under. Larger files are accepted.
pub const ADVISORY_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Banner upload errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BannerError {
    /// The file is not an image
    #[error("Please upload a valid image file (got `{media_type}`)")]
    UnsupportedFileType {
        /// Media type of the rejected file
        media_type: String,
    },
}

/// A file picked or dropped onto the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerUpload {
    /// Original file name
    pub file_name: String,

    /// Declared media type, e.g. `image/png`
    pub media_type: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl BannerUpload {
    /// Create an upload, guessing the media type from the file extension.
    #[must_use]
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let media_type = media_type_for(Path::new(&file_name));

        Self {
            file_name,
            media_type,
            bytes,
        }
    }

    /// Whether the upload is larger than [`ADVISORY_MAX_BYTES`].
    #[must_use]
    pub fn exceeds_advisory_size(&self) -> bool {
        self.bytes.len() > ADVISORY_MAX_BYTES
    }

    /// Encode the upload as a `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`BannerError::UnsupportedFileType`] if the media type is not
    /// `image/*`.
    pub fn into_data_uri(self) -> Result<String, BannerError> {
        if !self.media_type.starts_with("image/") {
            return Err(BannerError::UnsupportedFileType {
                media_type: self.media_type,
            });
        }

        if self.exceeds_advisory_size() {
            warn!(
                file_name = %self.file_name,
                bytes = self.bytes.len(),
                advisory = ADVISORY_MAX_BYTES,
                "banner exceeds advisory size"
            );
        }

        Ok(format!(
            "data:{};base64,{}",
            self.media_type,
            BASE64.encode(&self.bytes)
        ))
    }
}

/// Guess a media type from a file extension, falling back to
/// `application/octet-stream`.
#[must_use]
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Coupons the uploader offers: everything not retired by status.
pub fn bannerable(coupons: &[Coupon]) -> Vec<&Coupon> {
    coupons
        .iter()
        .filter(|coupon| !coupon.status.is_retired())
        .collect()
}

//! Content validation for uploaded media
//!
//! Classification works purely on byte signatures (magic numbers); a
//! client-supplied filename or declared content type is never consulted.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

use crate::errors::MediaError;

/// MIME types accepted for upload. Everything else is rejected, including
/// types the sniffer recognizes perfectly well (archives, executables, ...).
static ALLOWED_MIME_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "image/png",
        "image/jpeg",
        "image/gif",
        "image/webp",
        "image/bmp",
        "image/tiff",
    ]
    .into_iter()
    .collect()
});

/// Outcome of a successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedType {
    pub mime_type: &'static str,
    /// Canonical extension for the detected type, used when deriving the
    /// stored filename. Never taken from client input.
    pub extension: &'static str,
}

/// Determine the media type of `content` and check it against the
/// allow-list.
///
/// Returns `UnidentifiableContent` when no signature matches at all and
/// `UnsupportedMediaType` when the type is recognized but not allowed. Both
/// are client errors, but callers may want to log them differently.
pub fn classify(content: &[u8]) -> Result<DetectedType, MediaError> {
    let kind = infer::get(content).ok_or(MediaError::UnidentifiableContent)?;

    if !ALLOWED_MIME_TYPES.contains(kind.mime_type()) {
        debug!("rejecting upload with recognized but unsupported type {}", kind.mime_type());
        return Err(MediaError::UnsupportedMediaType(kind.mime_type().to_string()));
    }

    Ok(DetectedType {
        mime_type: kind.mime_type(),
        extension: kind.extension(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
    const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    const GIF_SIGNATURE: &[u8] = b"GIF89a\x00\x00\x00\x00";
    const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

    #[test]
    fn accepts_allow_listed_image_types() {
        let detected = classify(PNG_SIGNATURE).unwrap();
        assert_eq!(detected.mime_type, "image/png");
        assert_eq!(detected.extension, "png");

        let detected = classify(JPEG_SIGNATURE).unwrap();
        assert_eq!(detected.mime_type, "image/jpeg");
        assert_eq!(detected.extension, "jpg");

        let detected = classify(GIF_SIGNATURE).unwrap();
        assert_eq!(detected.mime_type, "image/gif");
    }

    #[test]
    fn rejects_recognized_type_outside_allow_list() {
        let err = classify(ZIP_SIGNATURE).unwrap_err();
        match err {
            MediaError::UnsupportedMediaType(mime) => assert_eq!(mime, "application/zip"),
            other => panic!("expected UnsupportedMediaType, got {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_content_as_unidentifiable() {
        assert!(matches!(classify(&[]), Err(MediaError::UnidentifiableContent)));
    }

    #[test]
    fn rejects_unrecognizable_bytes_as_unidentifiable() {
        assert!(matches!(
            classify(b"just some plain text, nothing binary"),
            Err(MediaError::UnidentifiableContent)
        ));

        assert!(matches!(classify(&[0x00]), Err(MediaError::UnidentifiableContent)));
    }

    #[test]
    fn filename_is_irrelevant_to_classification() {
        // Classification sees only bytes; a zip is a zip no matter what the
        // upload was called.
        assert!(matches!(
            classify(ZIP_SIGNATURE),
            Err(MediaError::UnsupportedMediaType(_))
        ));
    }
}

//! Image files attached to multipart requests.

use std::path::Path;

use reqwest::multipart::Part;

use crate::error::AdminError;

const FALLBACK_MIME: &str = "application/octet-stream";

/// An image read into memory, ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Wrap in-memory bytes. The MIME type comes from the content's magic
    /// bytes; the file name plays no part.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime = infer::get(&bytes).map_or(FALLBACK_MIME, |kind| kind.mime_type());
        Self {
            file_name: file_name.into(),
            mime,
            bytes,
        }
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Io` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, AdminError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn into_part(self) -> Result<Part, AdminError> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.mime)
            .map_err(|e| AdminError::InvalidRequest(e.to_string()))
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_mime_from_content() {
        assert_eq!(ImageFile::new("storefront.jpg", JPEG.to_vec()).mime, "image/jpeg");
        assert_eq!(ImageFile::new("photo_from_camera", PNG.to_vec()).mime, "image/png");
    }

    #[test]
    fn test_mime_ignores_misleading_name() {
        assert_eq!(ImageFile::new("front.jpg", PNG.to_vec()).mime, "image/png");
    }

    #[test]
    fn test_unknown_content_falls_back() {
        assert_eq!(ImageFile::new("notes.png", b"opening hours".to_vec()).mime, FALLBACK_MIME);
        assert_eq!(ImageFile::new("empty.png", vec![]).mime, FALLBACK_MIME);
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo");
        std::fs::write(&path, PNG).unwrap();

        let image = ImageFile::from_path(&path).await.unwrap();
        assert_eq!(image.file_name, "logo");
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.bytes, PNG);
        assert!(image.into_part().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = ImageFile::from_path(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Io(_)));
    }
}

//! Image file handling: media-type checks and data URL encoding.

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// An image picked for upload
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = media_type_for_path(path).unwrap_or("application/octet-stream");

        Ok(Self::new(name, media_type, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Media type for common image extensions
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(media_type)
}

/// Encode bytes as a self-contained `data:` URL
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        assert_eq!(to_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_media_type_for_path() {
        assert_eq!(media_type_for_path(Path::new("a/b/cat.PNG")), Some("image/png"));
        assert_eq!(media_type_for_path(Path::new("cat.jpeg")), Some("image/jpeg"));
        assert_eq!(media_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(media_type_for_path(Path::new("README")), None);
    }

    #[test]
    fn test_is_image() {
        assert!(ImageFile::new("a.gif", "image/gif", vec![]).is_image());
        assert!(!ImageFile::new("a.pdf", "application/pdf", vec![]).is_image());
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        assert!(ImageFile::from_path("/definitely/not/here.png").await.is_err());
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = std::env::temp_dir().join(format!("tamagosui-encode-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let png = dir.join("cat.png");
        tokio::fs::write(&png, b"hi").await.unwrap();
        let file = ImageFile::from_path(&png).await.unwrap();
        assert_eq!(file.name, "cat.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.bytes, b"hi");
        assert!(file.is_image());

        let blob = dir.join("cat.xyz");
        tokio::fs::write(&blob, b"hi").await.unwrap();
        let file = ImageFile::from_path(&blob).await.unwrap();
        assert_eq!(file.media_type, "application/octet-stream");
        assert!(!file.is_image());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

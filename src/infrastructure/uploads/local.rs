use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::application::ports::{ImageStore, ImageUpload};
use crate::domain::{DomainError, DomainResult};
use crate::shared::InfraError;

/// Upload settings shared by the store and the HTTP body limit.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./articleImages"),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Writes images as `image_<millis>_<uuid8>.<ext>` under one directory.
pub struct LocalImageStore {
    config: UploadConfig,
}

impl LocalImageStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Creates the upload directory if it is missing.
    pub async fn init(config: UploadConfig) -> Result<Self, InfraError> {
        tokio::fs::create_dir_all(&config.dir).await?;
        Ok(Self::new(config))
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// The extension always follows the content type, never the client's filename.
    fn filename_for(extension: &str) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "image_{}_{}.{}",
            Utc::now().timestamp_millis(),
            &id[..8],
            extension
        )
    }
}

/// Only plain filenames; anything that could walk out of the directory is refused.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains(&['/', '\\'][..]) && name != "." && name != ".."
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, upload: ImageUpload) -> DomainResult<String> {
        let Some(extension) = upload.extension() else {
            return Err(DomainError::Validation(
                "Only JPEG, PNG, GIF, WebP, BMP or AVIF images are allowed".into(),
            ));
        };
        if upload.bytes.is_empty() {
            return Err(DomainError::Validation("Image file is empty".into()));
        }
        if upload.bytes.len() > self.config.max_bytes {
            return Err(DomainError::Validation(format!(
                "Image exceeds {} bytes",
                self.config.max_bytes
            )));
        }

        let filename = Self::filename_for(extension);
        let path = self.config.dir.join(&filename);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(InfraError::from)?;

        debug!(file = %filename, size = upload.bytes.len(), "Image stored");
        Ok(filename)
    }

    async fn remove(&self, filename: &str) {
        if !is_plain_filename(filename) {
            warn!(file = %filename, "Refusing to remove image outside upload directory");
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.config.dir.join(filename)).await {
            warn!(file = %filename, error = %e, "Failed to remove image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store(dir: &Path) -> LocalImageStore {
        LocalImageStore::new(UploadConfig {
            dir: dir.to_path_buf(),
            max_bytes: 16,
        })
    }

    fn upload(content_type: &str, name: Option<&str>, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            content_type: content_type.into(),
            original_name: name.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[rstest]
    #[case("image/png", Some("cover.PNG"), ".png")]
    #[case("image/jpeg", None, ".jpg")]
    #[case("image/png", Some("page.html"), ".png")]
    #[case("image/webp", Some("noext"), ".webp")]
    #[tokio::test]
    async fn extension_follows_content_type(
        #[case] content_type: &str,
        #[case] name: Option<&str>,
        #[case] suffix: &str,
    ) {
        let tmp = tempfile::tempdir().unwrap();
        let stored = store(tmp.path()).save(upload(content_type, name, b"x")).await.unwrap();
        assert!(stored.ends_with(suffix), "{stored}");
    }

    #[tokio::test]
    async fn rejects_svg_uploads() {
        let tmp = tempfile::tempdir().unwrap();
        let svg = b"<svg><script>alert(1)</script></svg>";
        let err = store(tmp.path())
            .save(upload("image/svg+xml", Some("logo.svg"), &svg[..12]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn saves_with_generated_name_and_removes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let name = store.save(upload("image/png", Some("a.png"), b"png-bytes")).await.unwrap();
        assert!(name.starts_with("image_") && name.ends_with(".png"));
        assert_eq!(std::fs::read(tmp.path().join(&name)).unwrap(), b"png-bytes");

        store.remove(&name).await;
        assert!(!tmp.path().join(&name).exists());
        // Second removal only logs.
        store.remove(&name).await;
    }

    #[tokio::test]
    async fn rejects_non_images_and_oversized_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let err = store.save(upload("text/plain", Some("a.txt"), b"hi")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = store.save(upload("image/png", None, &[0u8; 17])).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn init_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/images");
        let store = LocalImageStore::init(UploadConfig { dir: dir.clone(), max_bytes: 10 })
            .await
            .unwrap();
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn remove_ignores_path_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let outside = tmp.path().join("keep.txt");
        std::fs::write(&outside, b"x").unwrap();
        let inner = tmp.path().join("uploads");
        std::fs::create_dir(&inner).unwrap();

        store(&inner).remove("../keep.txt").await;
        assert!(outside.exists());
    }
}

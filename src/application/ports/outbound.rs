//! Outbound ports: storage for uploaded article images.

use async_trait::async_trait;

use crate::domain::DomainResult;

/// An image received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub original_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Raster formats accepted for article images, with their stored extension.
/// SVG is left out: it can carry script and is served from our own origin.
const RASTER_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/bmp", "bmp"),
    ("image/avif", "avif"),
];

impl ImageUpload {
    /// Stored extension for an accepted content type.
    pub fn extension(&self) -> Option<&'static str> {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        RASTER_TYPES
            .iter()
            .find(|(mime, _)| *mime == essence)
            .map(|(_, ext)| *ext)
    }

    pub fn is_image(&self) -> bool {
        self.extension().is_some()
    }
}


/// Where article images live. Returns the stored filename, which is what
/// articles reference.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, upload: ImageUpload) -> DomainResult<String>;

    /// Best-effort removal; failures are logged, never returned.
    async fn remove(&self, filename: &str);
}

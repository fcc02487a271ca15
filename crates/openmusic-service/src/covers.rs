use crate::error::{Result, ServiceError};
use jiff::Timestamp;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest accepted cover image, in bytes.
pub const DEFAULT_COVER_MAX_BYTES: usize = 512_000;

/// URL path under which stored covers are served.
pub const COVER_ROUTE: &str = "/upload/images";

const MAX_STEM_LEN: usize = 64;
const MAX_EXTENSION_LEN: usize = 16;

/// Writes album cover images to a local directory and builds their public
/// URLs.
#[derive(Debug, Clone)]
pub struct CoverStorage {
    dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl CoverStorage {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_COVER_MAX_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Stores `bytes` as `<millis>-<sanitized name>` and returns the file name.
    ///
    /// Oversized images are rejected before anything touches the disk.
    pub async fn write(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.len() > self.max_bytes {
            return Err(ServiceError::PayloadTooLarge(format!(
                "cover must not exceed {} bytes",
                self.max_bytes
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = format!(
            "{}-{}",
            Timestamp::now().as_millisecond(),
            sanitize_file_name(original_name)
        );
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;
        debug!(file = %file_name, size = bytes.len(), "Stored cover image");

        Ok(file_name)
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}{}/{}", self.public_base_url, COVER_ROUTE, file_name)
    }
}

/// Keeps the last path component, replaces anything outside
/// `[A-Za-z0-9._-]` and caps the stem and extension lengths.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "cover".to_string();
    }

    // Only ASCII remains, so byte offsets are char boundaries.
    let (stem, extension) = cleaned.split_at(cleaned.rfind('.').unwrap_or(cleaned.len()));
    format!(
        "{}{}",
        &stem[..stem.len().min(MAX_STEM_LEN)],
        &extension[..extension.len().min(MAX_EXTENSION_LEN)]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("cover.png"), "cover.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my cover (1).jpg"), "my_cover__1_.jpg");
        assert_eq!(sanitize_file_name(".."), "cover");
        assert_eq!(sanitize_file_name(""), "cover");
    }

    #[test]
    fn long_names_are_shortened_keeping_extension() {
        let name = sanitize_file_name(&format!("{}.png", "a".repeat(300)));
        assert_eq!(name, format!("{}.png", "a".repeat(MAX_STEM_LEN)));

        let name = sanitize_file_name(&format!("cover.{}", "x".repeat(40)));
        assert_eq!(name, format!("cover.{}", "x".repeat(MAX_EXTENSION_LEN - 1)));

        assert_eq!(sanitize_file_name(&"b".repeat(100)), "b".repeat(MAX_STEM_LEN));
    }

    #[test]
    fn public_url_joins_route() {
        let covers = CoverStorage::new("/tmp/x", "http://localhost:5000/");
        assert_eq!(
            covers.public_url("1-cover.png"),
            "http://localhost:5000/upload/images/1-cover.png"
        );
    }

    #[tokio::test]
    async fn writes_file_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let covers = CoverStorage::new(dir.path(), "http://localhost:5000");

        let name = covers.write("cover.png", b"png-bytes").await.unwrap();
        assert!(name.ends_with("-cover.png"));

        let stored = tokio::fs::read(dir.path().join(&name)).await.unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn writes_file_with_very_long_name() {
        let dir = tempfile::tempdir().unwrap();
        let covers = CoverStorage::new(dir.path(), "http://localhost:5000");

        let name = covers
            .write(&format!("{}.png", "a".repeat(300)), b"png-bytes")
            .await
            .unwrap();
        assert!(name.ends_with(".png"));
        assert!(name.len() < 100);
        assert!(dir.path().join(&name).exists());
    }

    #[tokio::test]
    async fn rejects_oversized_image_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let covers = CoverStorage::new(dir.path().join("covers"), "http://localhost:5000")
            .with_max_bytes(4);

        let err = covers.write("cover.png", b"12345").await.unwrap_err();
        assert!(matches!(err, ServiceError::PayloadTooLarge(_)));
        assert!(!dir.path().join("covers").exists());
    }
}

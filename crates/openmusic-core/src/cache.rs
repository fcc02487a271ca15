use crate::error::CacheError;
use async_trait::async_trait;
use std::fmt::Display;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A key in the external cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `album:<id>`: an album with its songs.
    Album(String),
    /// `likes:<id>`: the like count of an album.
    Likes(String),
}

impl CacheKey {
    pub fn album(id: impl Into<String>) -> Self {
        Self::Album(id.into())
    }

    pub fn likes(album_id: impl Into<String>) -> Self {
        Self::Likes(album_id.into())
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Album(id) => write!(f, "album:{id}"),
            CacheKey::Likes(id) => write!(f, "likes:{id}"),
        }
    }
}

/// A key-value cache holding JSON-serialized values.
///
/// Entry lifetime is a property of the implementation (e.g. a fixed TTL);
/// writers invalidate entries with [`Cache::del`].
#[async_trait]
pub trait Cache: Send + Sync + 'static {
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;

    async fn set(&self, key: &CacheKey, value: String) -> Result<()>;

    /// It is not an error if the key does not exist.
    async fn del(&self, key: &CacheKey) -> Result<()>;
}

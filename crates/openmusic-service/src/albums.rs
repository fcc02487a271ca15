use crate::covers::CoverStorage;
use crate::error::{Result, ServiceError};
use openmusic_core::validation::{self, Validate};
use openmusic_core::{
    Album, AlbumDetail, AlbumLike, AlbumLikeRepository, AlbumPayload, AlbumRepository, Cache,
    CacheKey, EntityKind, IdGenerator, SongRepository, StorageError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Outcome of [`AlbumsService::toggle_like`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Unliked,
}

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Database,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Likes {
    pub count: u64,
    pub source: DataSource,
}

/// Albums, their covers and likes.
///
/// Album details are cached at `album:<id>` and like rows at `likes:<id>`.
/// Reads go through the cache and fall back to the repositories on a miss
/// or a cache failure; every write deletes the entries it makes stale.
#[derive(Clone)]
pub struct AlbumsService {
    albums: Arc<dyn AlbumRepository>,
    songs: Arc<dyn SongRepository>,
    likes: Arc<dyn AlbumLikeRepository>,
    cache: Arc<dyn Cache>,
    ids: Arc<dyn IdGenerator>,
    covers: CoverStorage,
}

impl AlbumsService {
    pub fn new(
        albums: Arc<dyn AlbumRepository>,
        songs: Arc<dyn SongRepository>,
        likes: Arc<dyn AlbumLikeRepository>,
        cache: Arc<dyn Cache>,
        ids: Arc<dyn IdGenerator>,
        covers: CoverStorage,
    ) -> Self {
        Self {
            albums,
            songs,
            likes,
            cache,
            ids,
            covers,
        }
    }

    pub fn covers(&self) -> &CoverStorage {
        &self.covers
    }

    pub async fn add_album(&self, payload: AlbumPayload) -> Result<String> {
        payload.validate()?;

        let album = Album {
            id: self.ids.generate(EntityKind::Album),
            name: payload.name,
            year: payload.year,
            cover_url: None,
        };
        self.albums.insert(&album).await?;
        debug!(album_id = %album.id, "Added album");

        Ok(album.id)
    }

    pub async fn get_album(&self, id: &str) -> Result<AlbumDetail> {
        let key = CacheKey::album(id);
        if let Some(detail) = self.cached::<AlbumDetail>(&key).await {
            return Ok(detail);
        }

        let album = self
            .albums
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Album not found"))?;
        let songs = self.songs.list_by_album(id).await?;
        let detail = AlbumDetail::new(album, songs);

        self.populate(&key, &detail).await;
        Ok(detail)
    }

    pub async fn edit_album(&self, id: &str, payload: AlbumPayload) -> Result<()> {
        payload.validate()?;

        if !self.albums.update(id, &payload.name, payload.year).await? {
            return Err(ServiceError::not_found(
                "Failed to update album. Id not found",
            ));
        }
        self.invalidate(&[CacheKey::album(id)]).await
    }

    pub async fn delete_album(&self, id: &str) -> Result<()> {
        if !self.albums.delete(id).await? {
            return Err(ServiceError::not_found(
                "Failed to delete album. Id not found",
            ));
        }
        self.invalidate(&[CacheKey::album(id), CacheKey::likes(id)])
            .await
    }

    pub async fn set_cover(&self, id: &str, cover_url: &str) -> Result<()> {
        if !self.albums.set_cover_url(id, cover_url).await? {
            return Err(ServiceError::not_found("Album not found"));
        }
        self.invalidate(&[CacheKey::album(id)]).await
    }

    /// Validates and stores a cover image, then points the album at it.
    /// Returns the public URL.
    pub async fn upload_cover(
        &self,
        id: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String> {
        validation::image_content_type(content_type)?;
        if bytes.len() > self.covers.max_bytes() {
            return Err(ServiceError::PayloadTooLarge(format!(
                "cover must not exceed {} bytes",
                self.covers.max_bytes()
            )));
        }

        if self.albums.get(id).await?.is_none() {
            return Err(ServiceError::not_found("Album not found"));
        }

        let stored = self.covers.write(file_name, bytes).await?;
        let url = self.covers.public_url(&stored);
        self.set_cover(id, &url).await?;

        Ok(url)
    }

    /// Likes the album, or takes the like back if the user already liked it.
    pub async fn toggle_like(&self, album_id: &str, user_id: &str) -> Result<LikeAction> {
        if self.albums.get(album_id).await?.is_none() {
            return Err(ServiceError::not_found("Album not found"));
        }

        let action = match self.likes.find(album_id, user_id).await? {
            Some(_) => {
                self.likes.delete(album_id, user_id).await?;
                LikeAction::Unliked
            }
            None => {
                let like = AlbumLike {
                    id: self.ids.generate(EntityKind::Like),
                    user_id: user_id.to_string(),
                    album_id: album_id.to_string(),
                };
                self.likes.insert(&like).await.map_err(|e| match e {
                    StorageError::Conflict(_) => ServiceError::invariant("Album already liked"),
                    other => other.into(),
                })?;
                LikeAction::Liked
            }
        };
        debug!(album_id, user_id, ?action, "Toggled album like");

        self.invalidate(&[CacheKey::likes(album_id)]).await?;
        Ok(action)
    }

    /// Counts the album's likes. The like rows themselves are what gets cached.
    pub async fn like_count(&self, album_id: &str) -> Result<Likes> {
        let key = CacheKey::likes(album_id);
        if let Some(rows) = self.cached::<Vec<AlbumLike>>(&key).await {
            return Ok(Likes {
                count: rows.len() as u64,
                source: DataSource::Cache,
            });
        }

        let rows = self.likes.list_likes(album_id).await?;
        self.populate(&key, &rows).await;

        Ok(Likes {
            count: rows.len() as u64,
            source: DataSource::Database,
        })
    }

    /// A cache failure or an undecodable entry counts as a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    trace!(key = %key, "Served from cache");
                    Some(value)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Ignoring undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to storage");
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, raw).await {
            warn!(key = %key, error = %e, "Failed to populate cache");
        }
    }

    async fn invalidate(&self, keys: &[CacheKey]) -> Result<()> {
        for key in keys {
            self.cache.del(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{album_payload, Harness};
    use openmusic_core::{CacheError, SongPayload};

    #[tokio::test]
    async fn created_album_reads_back() {
        let h = Harness::new();
        let id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        let detail = h.services.albums.get_album(&id).await.unwrap();
        assert_eq!(detail.name, "Viva la Vida");
        assert_eq!(detail.year, 2008);
        assert!(detail.songs.is_empty());
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected() {
        let h = Harness::new();
        let err = h
            .services
            .albums
            .add_album(album_payload("", 2008))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invariant(_)));
    }

    #[tokio::test]
    async fn missing_album_is_not_found() {
        let h = Harness::new();
        let err = h.services.albums.get_album("album-x").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = h
            .services
            .albums
            .edit_album("album-x", album_payload("A", 2000))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = h.services.albums.delete_album("album-x").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn album_detail_is_cached_and_invalidated_on_edit() {
        let h = Harness::new();
        let id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        h.services.albums.get_album(&id).await.unwrap();
        assert!(h.cache.get(&CacheKey::album(&id)).await.unwrap().is_some());

        h.services
            .albums
            .edit_album(&id, album_payload("Parachutes", 2000))
            .await
            .unwrap();
        assert!(h.cache.get(&CacheKey::album(&id)).await.unwrap().is_none());

        let detail = h.services.albums.get_album(&id).await.unwrap();
        assert_eq!(detail.name, "Parachutes");
    }

    #[tokio::test]
    async fn album_detail_lists_its_songs() {
        let h = Harness::new();
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        // Warm the cache so the song insert has something to invalidate.
        h.services.albums.get_album(&album_id).await.unwrap();

        h.services
            .songs
            .add_song(SongPayload {
                title: "Lost!".to_string(),
                year: 2008,
                performer: "Coldplay".to_string(),
                genre: "Pop".to_string(),
                duration: None,
                album_id: Some(album_id.clone()),
            })
            .await
            .unwrap();

        let detail = h.services.albums.get_album(&album_id).await.unwrap();
        assert_eq!(detail.songs.len(), 1);
        assert_eq!(detail.songs[0].title, "Lost!");
    }

    #[tokio::test]
    async fn liking_twice_toggles_back() {
        let h = Harness::new();
        let user_id = h.user("john").await;
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        let albums = &h.services.albums;
        assert_eq!(
            albums.toggle_like(&album_id, &user_id).await.unwrap(),
            LikeAction::Liked
        );
        assert_eq!(albums.like_count(&album_id).await.unwrap().count, 1);

        assert_eq!(
            albums.toggle_like(&album_id, &user_id).await.unwrap(),
            LikeAction::Unliked
        );
        assert_eq!(albums.like_count(&album_id).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn liking_missing_album_is_not_found() {
        let h = Harness::new();
        let user_id = h.user("john").await;
        let err = h
            .services
            .albums
            .toggle_like("album-x", &user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn second_like_count_read_comes_from_cache() {
        let h = Harness::new();
        let user_id = h.user("john").await;
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();
        h.services
            .albums
            .toggle_like(&album_id, &user_id)
            .await
            .unwrap();

        let first = h.services.albums.like_count(&album_id).await.unwrap();
        assert_eq!(first.source, DataSource::Database);

        let second = h.services.albums.like_count(&album_id).await.unwrap();
        assert_eq!(second.source, DataSource::Cache);
        assert_eq!(second.count, 1);

        // A new like invalidates the cached count.
        let other = h.user("jane").await;
        h.services.albums.toggle_like(&album_id, &other).await.unwrap();
        let third = h.services.albums.like_count(&album_id).await.unwrap();
        assert_eq!(third.source, DataSource::Database);
        assert_eq!(third.count, 2);
    }

    #[tokio::test]
    async fn like_rows_are_cached_as_json() {
        let h = Harness::new();
        let user_id = h.user("john").await;
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();
        h.services
            .albums
            .toggle_like(&album_id, &user_id)
            .await
            .unwrap();
        h.services.albums.like_count(&album_id).await.unwrap();

        let raw = h
            .cache
            .get(&CacheKey::likes(&album_id))
            .await
            .unwrap()
            .unwrap();
        let rows: Vec<AlbumLike> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, user_id);
        assert_eq!(rows[0].album_id, album_id);
    }

    #[tokio::test]
    async fn cache_outage_falls_back_to_storage_on_read() {
        let h = Harness::with_cache(Arc::new(FailingCache));
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        let likes = h.services.albums.like_count(&album_id).await.unwrap();
        assert_eq!(likes.source, DataSource::Database);
        assert!(h.services.albums.get_album(&album_id).await.is_ok());

        // Invalidation failures are surfaced.
        let err = h.services.albums.delete_album(&album_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Cache(_)));
    }

    #[tokio::test]
    async fn oversized_cover_never_reaches_storage() {
        let h = Harness::new();
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();
        let max = h.services.albums.covers().max_bytes();

        let err = h
            .services
            .albums
            .upload_cover(&album_id, "cover.png", Some("image/png"), &vec![0u8; max + 1])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PayloadTooLarge(_)));
        assert!(!h.services.albums.covers().dir().exists());

        let detail = h.services.albums.get_album(&album_id).await.unwrap();
        assert_eq!(detail.cover_url, None);
    }

    #[tokio::test]
    async fn cover_upload_sets_public_url() {
        let h = Harness::new();
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();
        h.services.albums.get_album(&album_id).await.unwrap();

        let url = h
            .services
            .albums
            .upload_cover(&album_id, "cover.png", Some("image/png"), b"png")
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:5000/upload/images/"));

        let detail = h.services.albums.get_album(&album_id).await.unwrap();
        assert_eq!(detail.cover_url.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn cover_with_very_long_name_is_stored() {
        let h = Harness::new();
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();
        let file_name = format!("{}.png", "a".repeat(300));

        let url = h
            .services
            .albums
            .upload_cover(&album_id, &file_name, Some("image/png"), b"png")
            .await
            .unwrap();
        assert!(url.ends_with(".png"));
        assert!(url.len() < 255);
    }

    #[tokio::test]
    async fn cover_must_be_an_image() {
        let h = Harness::new();
        let album_id = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        let err = h
            .services
            .albums
            .upload_cover(&album_id, "notes.txt", Some("text/plain"), b"hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invariant(_)));
    }

    struct FailingCache;

    #[async_trait::async_trait]
    impl Cache for FailingCache {
        async fn get(&self, _key: &CacheKey) -> openmusic_core::cache::Result<Option<String>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: &CacheKey, _value: String) -> openmusic_core::cache::Result<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn del(&self, _key: &CacheKey) -> openmusic_core::cache::Result<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }
}

use crate::error::{Result, ServiceError};
use openmusic_core::validation::Validate;
use openmusic_core::{
    Cache, CacheKey, EntityKind, IdGenerator, Song, SongFilter, SongPayload, SongRepository,
    SongSummary, StorageError,
};
use std::sync::Arc;
use tracing::debug;

/// Song catalog. Writes drop the cached detail of every album whose song
/// list they change.
#[derive(Clone)]
pub struct SongsService {
    songs: Arc<dyn SongRepository>,
    cache: Arc<dyn Cache>,
    ids: Arc<dyn IdGenerator>,
}

fn map_album_reference(err: StorageError) -> ServiceError {
    match err {
        StorageError::MissingReference(_) => ServiceError::not_found("Album not found"),
        other => other.into(),
    }
}

impl SongsService {
    pub fn new(
        songs: Arc<dyn SongRepository>,
        cache: Arc<dyn Cache>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { songs, cache, ids }
    }

    pub async fn add_song(&self, payload: SongPayload) -> Result<String> {
        payload.validate()?;

        let song = Song::from_payload(self.ids.generate(EntityKind::Song), payload);
        self.songs.insert(&song).await.map_err(map_album_reference)?;
        debug!(song_id = %song.id, "Added song");

        self.invalidate_album(song.album_id.as_deref()).await?;
        Ok(song.id)
    }

    pub async fn list_songs(&self, filter: &SongFilter) -> Result<Vec<SongSummary>> {
        Ok(self.songs.list(filter).await?)
    }

    pub async fn get_song(&self, id: &str) -> Result<Song> {
        self.songs
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Song not found"))
    }

    pub async fn edit_song(&self, id: &str, payload: SongPayload) -> Result<()> {
        payload.validate()?;

        let previous = self.songs.get(id).await?.ok_or_else(|| {
            ServiceError::not_found("Failed to update song. Id not found")
        })?;
        let song = Song::from_payload(id, payload);
        if !self.songs.update(&song).await.map_err(map_album_reference)? {
            return Err(ServiceError::not_found(
                "Failed to update song. Id not found",
            ));
        }

        self.invalidate_album(previous.album_id.as_deref()).await?;
        if song.album_id != previous.album_id {
            self.invalidate_album(song.album_id.as_deref()).await?;
        }
        Ok(())
    }

    pub async fn delete_song(&self, id: &str) -> Result<()> {
        let previous = self.songs.get(id).await?.ok_or_else(|| {
            ServiceError::not_found("Failed to delete song. Id not found")
        })?;
        if !self.songs.delete(id).await? {
            return Err(ServiceError::not_found(
                "Failed to delete song. Id not found",
            ));
        }
        self.invalidate_album(previous.album_id.as_deref()).await
    }

    async fn invalidate_album(&self, album_id: Option<&str>) -> Result<()> {
        if let Some(album_id) = album_id {
            self.cache.del(&CacheKey::album(album_id)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{album_payload, song_payload, Harness};

    #[tokio::test]
    async fn add_get_edit_delete() {
        let h = Harness::new();
        let songs = &h.services.songs;

        let id = songs.add_song(song_payload("Lost!")).await.unwrap();
        assert_eq!(songs.get_song(&id).await.unwrap().title, "Lost!");

        songs.edit_song(&id, song_payload("Clocks")).await.unwrap();
        assert_eq!(songs.get_song(&id).await.unwrap().title, "Clocks");

        songs.delete_song(&id).await.unwrap();
        assert!(matches!(
            songs.get_song(&id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            songs.delete_song(&id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_album_is_not_found() {
        let h = Harness::new();
        let mut payload = song_payload("Lost!");
        payload.album_id = Some("album-x".to_string());

        let err = h.services.songs.add_song(payload).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn filters_by_title_and_performer() {
        let h = Harness::new();
        let songs = &h.services.songs;
        songs.add_song(song_payload("Lost!")).await.unwrap();
        songs.add_song(song_payload("Yellow")).await.unwrap();

        let found = songs
            .list_songs(&SongFilter {
                title: Some("yel".to_string()),
                performer: Some("COLD".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Yellow");

        assert_eq!(songs.list_songs(&SongFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn moving_a_song_refreshes_both_albums() {
        let h = Harness::new();
        let first = h
            .services
            .albums
            .add_album(album_payload("Parachutes", 2000))
            .await
            .unwrap();
        let second = h
            .services
            .albums
            .add_album(album_payload("Viva la Vida", 2008))
            .await
            .unwrap();

        let mut payload = song_payload("Yellow");
        payload.album_id = Some(first.clone());
        let song_id = h.services.songs.add_song(payload).await.unwrap();

        h.services.albums.get_album(&first).await.unwrap();
        h.services.albums.get_album(&second).await.unwrap();

        let mut moved = song_payload("Yellow");
        moved.album_id = Some(second.clone());
        h.services.songs.edit_song(&song_id, moved).await.unwrap();

        assert!(h
            .services
            .albums
            .get_album(&first)
            .await
            .unwrap()
            .songs
            .is_empty());
        assert_eq!(
            h.services.albums.get_album(&second).await.unwrap().songs.len(),
            1
        );
    }
}

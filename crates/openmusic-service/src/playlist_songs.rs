use crate::error::{Result, ServiceError};
use crate::playlists::PlaylistsService;
use openmusic_core::validation::Validate;
use openmusic_core::{
    EntityKind, IdGenerator, PlaylistDetail, PlaylistRepository, PlaylistSongPayload,
    PlaylistSongRepository, SongRepository, StorageError,
};
use std::sync::Arc;
use tracing::debug;

/// Songs inside a playlist. Every operation is restricted to the owner.
#[derive(Clone)]
pub struct PlaylistSongsService {
    playlists: PlaylistsService,
    summaries: Arc<dyn PlaylistRepository>,
    members: Arc<dyn PlaylistSongRepository>,
    songs: Arc<dyn SongRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl PlaylistSongsService {
    pub fn new(
        playlists: PlaylistsService,
        summaries: Arc<dyn PlaylistRepository>,
        members: Arc<dyn PlaylistSongRepository>,
        songs: Arc<dyn SongRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            playlists,
            summaries,
            members,
            songs,
            ids,
        }
    }

    pub async fn add_song(
        &self,
        playlist_id: &str,
        payload: PlaylistSongPayload,
        owner: &str,
    ) -> Result<()> {
        payload.validate()?;
        self.playlists.verify_owner(playlist_id, owner).await?;

        if self.songs.get(&payload.song_id).await?.is_none() {
            return Err(ServiceError::not_found("Song not found"));
        }

        let id = self.ids.generate(EntityKind::PlaylistSong);
        self.members
            .add(&id, playlist_id, &payload.song_id)
            .await
            .map_err(|e| match e {
                StorageError::Conflict(_) => {
                    ServiceError::invariant("Song is already in the playlist")
                }
                StorageError::MissingReference(_) => ServiceError::not_found("Song not found"),
                other => other.into(),
            })?;
        debug!(playlist_id, song_id = %payload.song_id, "Added song to playlist");

        Ok(())
    }

    pub async fn playlist_detail(&self, playlist_id: &str, owner: &str) -> Result<PlaylistDetail> {
        self.playlists.verify_owner(playlist_id, owner).await?;

        let summary = self
            .summaries
            .summary(playlist_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Playlist not found"))?;
        let songs = self.members.songs(playlist_id).await?;

        Ok(PlaylistDetail {
            id: summary.id,
            name: summary.name,
            username: summary.username,
            songs,
        })
    }

    pub async fn remove_song(
        &self,
        playlist_id: &str,
        payload: PlaylistSongPayload,
        owner: &str,
    ) -> Result<()> {
        payload.validate()?;
        self.playlists.verify_owner(playlist_id, owner).await?;

        if !self.members.remove(playlist_id, &payload.song_id).await? {
            return Err(ServiceError::invariant(
                "Failed to remove song. Song is not in the playlist",
            ));
        }
        Ok(())
    }
}

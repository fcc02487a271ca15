use crate::error::{Result, ServiceError};
use openmusic_core::validation::Validate;
use openmusic_core::{EntityKind, IdGenerator, Playlist, PlaylistPayload, PlaylistRepository, PlaylistSummary};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct PlaylistsService {
    playlists: Arc<dyn PlaylistRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl PlaylistsService {
    pub fn new(playlists: Arc<dyn PlaylistRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { playlists, ids }
    }

    pub async fn add_playlist(&self, payload: PlaylistPayload, owner: &str) -> Result<String> {
        payload.validate()?;

        let playlist = Playlist {
            id: self.ids.generate(EntityKind::Playlist),
            name: payload.name,
            owner: owner.to_string(),
        };
        self.playlists.insert(&playlist).await?;
        debug!(playlist_id = %playlist.id, owner, "Added playlist");

        Ok(playlist.id)
    }

    pub async fn list_playlists(&self, owner: &str) -> Result<Vec<PlaylistSummary>> {
        Ok(self.playlists.list_by_owner(owner).await?)
    }

    pub async fn delete_playlist(&self, id: &str, owner: &str) -> Result<()> {
        self.verify_owner(id, owner).await?;
        if !self.playlists.delete(id).await? {
            return Err(ServiceError::not_found("Playlist not found"));
        }
        Ok(())
    }

    /// Fails with `NotFound` if the playlist does not exist and with
    /// `Authorization` if `owner` did not create it.
    pub async fn verify_owner(&self, id: &str, owner: &str) -> Result<Playlist> {
        let playlist = self
            .playlists
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Playlist not found"))?;

        if playlist.owner != owner {
            return Err(ServiceError::Authorization(
                "You are not entitled to access this resource".to_string(),
            ));
        }
        Ok(playlist)
    }
}

use crate::error::Result;
use crate::playlists::PlaylistsService;
use openmusic_core::validation::Validate;
use openmusic_core::{ExportJob, ExportPayload, Producer, EXPORT_PLAYLISTS_QUEUE};
use std::sync::Arc;
use tracing::info;

/// Hands playlist exports off to the external export worker.
#[derive(Clone)]
pub struct ExportsService {
    playlists: PlaylistsService,
    producer: Arc<dyn Producer>,
}

impl ExportsService {
    pub fn new(playlists: PlaylistsService, producer: Arc<dyn Producer>) -> Self {
        Self {
            playlists,
            producer,
        }
    }

    /// Publishes one `{playlistId, targetEmail}` job. Delivery is not
    /// confirmed beyond the broker accepting the message.
    pub async fn export_playlist(
        &self,
        playlist_id: &str,
        payload: ExportPayload,
        owner: &str,
    ) -> Result<()> {
        payload.validate()?;
        self.playlists.verify_owner(playlist_id, owner).await?;

        let job = ExportJob {
            playlist_id: playlist_id.to_string(),
            target_email: payload.target_email,
        };
        self.producer
            .send_message(EXPORT_PLAYLISTS_QUEUE, serde_json::to_string(&job)?)
            .await?;
        info!(playlist_id, queue = EXPORT_PLAYLISTS_QUEUE, "Queued playlist export");

        Ok(())
    }
}

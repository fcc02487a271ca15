use axum::extract::{Path, State};
use openmusic_core::PlaylistPayload;

use super::{created, ok, ok_message, Payload, Reply};
use crate::auth::AuthUser;
use crate::error::Result;
use crate::model::{PlaylistIdData, PlaylistsData};
use crate::state::AppState;

pub async fn add_playlist_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Payload(payload): Payload<PlaylistPayload>,
) -> Result<Reply<PlaylistIdData>> {
    let playlist_id = state
        .services()
        .playlists
        .add_playlist(payload, &owner)
        .await?;
    Ok(created(PlaylistIdData { playlist_id }))
}

pub async fn list_playlists_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
) -> Result<Reply<PlaylistsData>> {
    let playlists = state.services().playlists.list_playlists(&owner).await?;
    Ok(ok(PlaylistsData { playlists }))
}

pub async fn delete_playlist_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(owner): AuthUser,
) -> Result<Reply> {
    state
        .services()
        .playlists
        .delete_playlist(&id, &owner)
        .await?;
    Ok(ok_message("Playlist deleted"))
}

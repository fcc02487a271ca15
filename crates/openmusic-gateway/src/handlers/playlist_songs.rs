use axum::extract::{Path, State};
use openmusic_core::PlaylistSongPayload;

use super::{created_message, ok, ok_message, Payload, Reply};
use crate::auth::AuthUser;
use crate::error::Result;
use crate::model::PlaylistData;
use crate::state::AppState;

pub async fn add_playlist_song_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(owner): AuthUser,
    Payload(payload): Payload<PlaylistSongPayload>,
) -> Result<Reply> {
    state
        .services()
        .playlist_songs
        .add_song(&id, payload, &owner)
        .await?;
    Ok(created_message("Song added to playlist"))
}

pub async fn get_playlist_songs_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(owner): AuthUser,
) -> Result<Reply<PlaylistData>> {
    let playlist = state
        .services()
        .playlist_songs
        .playlist_detail(&id, &owner)
        .await?;
    Ok(ok(PlaylistData { playlist }))
}

pub async fn delete_playlist_song_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(owner): AuthUser,
    Payload(payload): Payload<PlaylistSongPayload>,
) -> Result<Reply> {
    state
        .services()
        .playlist_songs
        .remove_song(&id, payload, &owner)
        .await?;
    Ok(ok_message("Song removed from playlist"))
}

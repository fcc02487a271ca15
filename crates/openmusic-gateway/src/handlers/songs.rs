use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use openmusic_core::{SongFilter, SongPayload};

use super::{created, ok, ok_message, Payload, Reply};
use crate::error::Result;
use crate::model::{SongData, SongIdData, SongsData};
use crate::state::AppState;

pub async fn add_song_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<SongPayload>,
) -> Result<Reply<SongIdData>> {
    let song_id = state.services().songs.add_song(payload).await?;
    Ok(created(SongIdData { song_id }))
}

pub async fn list_songs_handler(
    State(state): State<AppState>,
    filter: std::result::Result<Query<SongFilter>, QueryRejection>,
) -> Result<Reply<SongsData>> {
    let Query(filter) = filter?;
    let songs = state.services().songs.list_songs(&filter).await?;
    Ok(ok(SongsData { songs }))
}

pub async fn get_song_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<SongData>> {
    let song = state.services().songs.get_song(&id).await?;
    Ok(ok(SongData { song }))
}

pub async fn edit_song_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload<SongPayload>,
) -> Result<Reply> {
    state.services().songs.edit_song(&id, payload).await?;
    Ok(ok_message("Song updated"))
}

pub async fn delete_song_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply> {
    state.services().songs.delete_song(&id).await?;
    Ok(ok_message("Song deleted"))
}

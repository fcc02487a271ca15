use axum::extract::multipart::Field;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use openmusic_core::validation;
use openmusic_core::AlbumPayload;
use openmusic_service::{DataSource, LikeAction, ServiceError};

use super::{created, created_message, ok, ok_message, Payload, Reply};
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::model::{AlbumData, AlbumIdData, Envelope, LikesData};
use crate::state::AppState;

pub const DATA_SOURCE_HEADER: HeaderName = HeaderName::from_static("x-data-source");

/// Multipart field carrying the cover image.
const COVER_FIELD: &str = "cover";

pub async fn add_album_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<AlbumPayload>,
) -> Result<Reply<AlbumIdData>> {
    let album_id = state.services().albums.add_album(payload).await?;
    Ok(created(AlbumIdData { album_id }))
}

pub async fn get_album_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<AlbumData>> {
    let album = state.services().albums.get_album(&id).await?;
    Ok(ok(AlbumData { album }))
}

pub async fn edit_album_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload<AlbumPayload>,
) -> Result<Reply> {
    state.services().albums.edit_album(&id, payload).await?;
    Ok(ok_message("Album updated"))
}

pub async fn delete_album_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply> {
    state.services().albums.delete_album(&id).await?;
    Ok(ok_message("Album deleted"))
}

pub async fn upload_cover_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Reply> {
    let mut multipart = multipart?;
    let albums = &state.services().albums;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(COVER_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        validation::image_content_type(content_type.as_deref()).map_err(ServiceError::from)?;
        let file_name = field.file_name().unwrap_or(COVER_FIELD).to_string();
        let bytes = read_capped(field, albums.covers().max_bytes()).await?;

        albums
            .upload_cover(&id, &file_name, content_type.as_deref(), &bytes)
            .await?;
        return Ok(created_message("Cover uploaded"));
    }

    Err(AppError::BadRequest(format!(
        "\"{COVER_FIELD}\" is required"
    )))
}

/// Buffers a field, giving up as soon as it grows past `max_bytes`.
async fn read_capped(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "cover must not exceed {max_bytes} bytes"
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

pub async fn toggle_like_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user_id): AuthUser,
) -> Result<Reply> {
    let message = match state.services().albums.toggle_like(&id, &user_id).await? {
        LikeAction::Liked => "Album liked",
        LikeAction::Unliked => "Album unliked",
    };
    Ok(created_message(message))
}

pub async fn get_likes_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let likes = state.services().albums.like_count(&id).await?;
    let body = Json(Envelope::data(LikesData { likes: likes.count }));

    let response = match likes.source {
        DataSource::Cache => (
            StatusCode::OK,
            [(DATA_SOURCE_HEADER, HeaderValue::from_static("cache"))],
            body,
        )
            .into_response(),
        DataSource::Database => (StatusCode::OK, body).into_response(),
    };
    Ok(response)
}

use axum::extract::{Path, State};
use openmusic_core::ExportPayload;

use super::{created_message, Payload, Reply};
use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

pub async fn export_playlist_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(owner): AuthUser,
    Payload(payload): Payload<ExportPayload>,
) -> Result<Reply> {
    state
        .services()
        .exports
        .export_playlist(&id, payload, &owner)
        .await?;
    Ok(created_message("Your request is being processed"))
}

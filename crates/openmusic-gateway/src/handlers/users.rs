use axum::extract::{Path, State};
use openmusic_core::UserPayload;

use super::{created, ok, Payload, Reply};
use crate::error::Result;
use crate::model::{UserData, UserIdData};
use crate::state::AppState;

pub async fn add_user_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<UserPayload>,
) -> Result<Reply<UserIdData>> {
    let user_id = state.services().users.add_user(payload).await?;
    Ok(created(UserIdData { user_id }))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<UserData>> {
    let user = state.services().users.get_user(&id).await?;
    Ok(ok(UserData { user }))
}

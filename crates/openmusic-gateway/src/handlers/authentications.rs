use axum::extract::State;
use openmusic_core::{LoginPayload, RefreshTokenPayload};

use super::{created, ok, ok_message, Payload, Reply};
use crate::error::Result;
use crate::model::{AccessTokenData, TokensData};
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginPayload>,
) -> Result<Reply<TokensData>> {
    let pair = state.services().authentications.login(payload).await?;
    Ok(created(TokensData {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

pub async fn refresh_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<RefreshTokenPayload>,
) -> Result<Reply<AccessTokenData>> {
    let access_token = state.services().authentications.refresh(payload).await?;
    Ok(ok(AccessTokenData { access_token }))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<RefreshTokenPayload>,
) -> Result<Reply> {
    state.services().authentications.logout(payload).await?;
    Ok(ok_message("Refresh token deleted"))
}

use crate::error::{Result, ServiceError};
use crate::users::UsersService;
use openmusic_auth::TokenManager;
use openmusic_core::validation::Validate;
use openmusic_core::{AuthenticationRepository, LoginPayload, RefreshTokenPayload};
use std::sync::Arc;
use tracing::debug;

/// A freshly issued token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login, access-token refresh and logout.
///
/// Refresh tokens are only honoured while they are in the authentication
/// store; logout removes them.
#[derive(Clone)]
pub struct AuthenticationsService {
    store: Arc<dyn AuthenticationRepository>,
    users: UsersService,
    tokens: TokenManager,
}

impl AuthenticationsService {
    pub fn new(
        store: Arc<dyn AuthenticationRepository>,
        users: UsersService,
        tokens: TokenManager,
    ) -> Self {
        Self {
            store,
            users,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<TokenPair> {
        payload.validate()?;

        let user_id = self
            .users
            .verify_credentials(&payload.username, &payload.password)
            .await?;

        let pair = TokenPair {
            access_token: self.tokens.generate_access_token(&user_id)?,
            refresh_token: self.tokens.generate_refresh_token(&user_id)?,
        };
        self.store.add_refresh_token(&pair.refresh_token).await?;
        debug!(user_id = %user_id, "Issued token pair");

        Ok(pair)
    }

    /// Issues a new access token for a stored, correctly signed refresh token.
    pub async fn refresh(&self, payload: RefreshTokenPayload) -> Result<String> {
        payload.validate()?;
        let user_id = self.verify_stored(&payload.refresh_token).await?;
        Ok(self.tokens.generate_access_token(&user_id)?)
    }

    pub async fn logout(&self, payload: RefreshTokenPayload) -> Result<()> {
        payload.validate()?;
        if !self.store.delete_refresh_token(&payload.refresh_token).await? {
            return Err(ServiceError::invariant("Refresh token not found"));
        }
        Ok(())
    }

    async fn verify_stored(&self, refresh_token: &str) -> Result<String> {
        if !self.store.has_refresh_token(refresh_token).await? {
            return Err(ServiceError::invariant("Invalid refresh token"));
        }
        self.tokens
            .verify_refresh_token(refresh_token)
            .map_err(|_| ServiceError::invariant("Invalid refresh token"))
    }
}

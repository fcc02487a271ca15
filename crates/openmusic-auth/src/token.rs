use crate::error::TokenError;
use jiff::Timestamp;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use typed_builder::TypedBuilder;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Refresh tokens never expire; they stay valid until removed from the
/// authentication store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RefreshClaims {
    id: String,
    iat: i64,
}

#[derive(Clone, TypedBuilder)]
pub struct TokenSettings {
    #[builder(setter(into))]
    access_token_key: String,
    #[builder(setter(into))]
    refresh_token_key: String,
    /// Access token lifetime in seconds.
    #[builder(default = 1800)]
    access_token_age: u64,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_token_key", &"<redacted>")
            .field("refresh_token_key", &"<redacted>")
            .field("access_token_age", &self.access_token_age)
            .finish()
    }
}

/// Issues and verifies HS256 JWTs.
///
/// Access and refresh tokens are signed with different keys, so one can
/// never be presented as the other.
#[derive(Clone)]
pub struct TokenManager {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_token_age: i64,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_token_age", &self.access_token_age)
            .finish_non_exhaustive()
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(err.to_string()),
    }
}

impl TokenManager {
    pub fn new(settings: TokenSettings) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(settings.access_token_key.as_bytes()),
            access_decoding: DecodingKey::from_secret(settings.access_token_key.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(settings.refresh_token_key.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(settings.refresh_token_key.as_bytes()),
            access_token_age: i64::try_from(settings.access_token_age).unwrap_or(i64::MAX),
        }
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String, TokenError> {
        let iat = Timestamp::now().as_second();
        let claims = AccessClaims {
            id: user_id.to_string(),
            iat,
            exp: iat.saturating_add(self.access_token_age),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, TokenError> {
        let claims = RefreshClaims {
            id: user_id.to_string(),
            iat: Timestamp::now().as_second(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry, with no leeway.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.access_decoding, &validation)
            .map_err(map_decode_error)?;
        trace!(user_id = %data.claims.id, "Verified access token");
        Ok(data.claims)
    }

    /// Checks the signature only and returns the user id.
    pub fn verify_refresh_token(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data =
            jsonwebtoken::decode::<RefreshClaims>(token, &self.refresh_decoding, &validation)
                .map_err(map_decode_error)?;
        Ok(data.claims.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(age: u64) -> TokenManager {
        TokenManager::new(
            TokenSettings::builder()
                .access_token_key("access-secret")
                .refresh_token_key("refresh-secret")
                .access_token_age(age)
                .build(),
        )
    }

    #[test]
    fn access_token_carries_user_id_and_expiry() {
        let tokens = manager(1800);
        let token = tokens.generate_access_token("user-1").unwrap();

        let claims = tokens.verify_access_token(&token).unwrap();
        assert_eq!(claims.id, "user-1");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let tokens = manager(1800);
        let iat = Timestamp::now().as_second() - 3600;
        let claims = AccessClaims {
            id: "user-1".to_string(),
            iat,
            exp: iat + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();

        assert_eq!(tokens.verify_access_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn refresh_token_round_trip() {
        let tokens = manager(1800);
        let token = tokens.generate_refresh_token("user-1").unwrap();
        assert_eq!(tokens.verify_refresh_token(&token).unwrap(), "user-1");
    }

    #[test]
    fn tokens_are_not_interchangeable() {
        let tokens = manager(1800);
        let access = tokens.generate_access_token("user-1").unwrap();
        let refresh = tokens.generate_refresh_token("user-1").unwrap();

        assert!(matches!(
            tokens.verify_refresh_token(&access),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            tokens.verify_access_token(&refresh),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = manager(1800);
        assert!(matches!(
            tokens.verify_access_token("not-a-jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn settings_debug_hides_keys() {
        let settings = TokenSettings::builder()
            .access_token_key("access-secret")
            .refresh_token_key("refresh-secret")
            .build();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret"));
    }
}

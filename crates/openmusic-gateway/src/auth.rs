use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use openmusic_auth::TokenError;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Id of the user presenting a valid `Authorization: Bearer` access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)?;

        let claims = state.tokens().verify_access_token(token).map_err(|e| {
            debug!(error = %e, "rejected access token");
            match e {
                TokenError::Expired => AppError::Unauthenticated("Token expired".to_string()),
                _ => AppError::Unauthenticated("Invalid token".to_string()),
            }
        })?;

        Ok(Self(claims.id))
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let missing = || AppError::Unauthenticated("Missing authentication".to_string());

    let header = headers.get(AUTHORIZATION).ok_or_else(missing)?;
    let header = header.to_str().map_err(|_| missing())?;
    let token = header.strip_prefix("Bearer ").ok_or_else(missing)?.trim();

    if token.is_empty() {
        return Err(missing());
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_other_schemes_and_blanks() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(extract_bearer(&headers).is_err());
    }
}

use crate::error::ValidationError;
use crate::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// A stored user row. The password is kept as a PHC hash string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub fullname: String,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            fullname: self.fullname.clone(),
        }
    }
}

/// The public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub fullname: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub username: String,
    pub password: String,
    pub fullname: String,
}

impl Validate for UserPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::username(&self.username)?;
        validation::non_empty("password", &self.password)?;
        validation::non_empty("fullname", &self.fullname)
    }
}

/// Body of `POST /authentications`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl Validate for LoginPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("username", &self.username)?;
        validation::non_empty("password", &self.password)
    }
}

/// Body of `PUT /authentications` and `DELETE /authentications`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenPayload {
    pub refresh_token: String,
}

impl Validate for RefreshTokenPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("refreshToken", &self.refresh_token)
    }
}

use crate::error::{Result, ServiceError};
use openmusic_auth::PasswordHasher;
use openmusic_core::validation::Validate;
use openmusic_core::{EntityKind, IdGenerator, StorageError, User, UserPayload, UserProfile, UserRepository};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserRepository>,
    ids: Arc<dyn IdGenerator>,
    hasher: PasswordHasher,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            users,
            ids,
            hasher: PasswordHasher::new(),
        }
    }

    pub async fn add_user(&self, payload: UserPayload) -> Result<String> {
        payload.validate()?;

        let user = User {
            id: self.ids.generate(EntityKind::User),
            username: payload.username,
            password_hash: self.hash_password(payload.password).await?,
            fullname: payload.fullname,
        };
        self.users.insert(&user).await.map_err(|e| match e {
            StorageError::Conflict(_) => {
                ServiceError::invariant("Failed to add user. Username already taken")
            }
            other => other.into(),
        })?;
        debug!(user_id = %user.id, "Added user");

        Ok(user.id)
    }

    pub async fn get_user(&self, id: &str) -> Result<UserProfile> {
        self.users
            .get(id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }

    /// Returns the user id when the credentials match.
    ///
    /// Unknown usernames and wrong passwords fail with the same message.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<String> {
        let rejected = || ServiceError::Authentication("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(rejected)?;

        if !self.verify_password(password, user.password_hash).await? {
            return Err(rejected());
        }
        Ok(user.id)
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher;
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;
        Ok(hash)
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool> {
        let hasher = self.hasher;
        let password = password.to_string();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await??;
        Ok(matched)
    }
}

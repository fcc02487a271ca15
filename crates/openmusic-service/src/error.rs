use openmusic_auth::{PasswordError, TokenError};
use openmusic_core::{CacheError, ProducerError, StorageError, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request is well-formed but cannot be applied.
    #[error("{0}")]
    Invariant(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("producer error: {0}")]
    Producer(#[from] ProducerError),
    #[error("token error: {0}")]
    Token(#[from] TokenError),
    #[error("password error: {0}")]
    Password(#[from] PasswordError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Invariant(_)
                | Self::NotFound(_)
                | Self::Authentication(_)
                | Self::Authorization(_)
                | Self::PayloadTooLarge(_)
        )
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Invariant(value.0)
    }
}

//! Access and refresh tokens, and password hashing.

pub mod error;
pub mod password;
pub mod token;

pub use error::{PasswordError, TokenError};
pub use password::PasswordHasher;
pub use token::{AccessClaims, TokenManager, TokenSettings};

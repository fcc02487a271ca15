//! Storage backends for the OpenMusic repositories.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use openmusic_core::repository::*;
pub use openmusic_core::StorageError;
pub use postgres::PostgresRepository;

//! Message producers for background jobs such as playlist exports.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryProducer;
pub use self::redis::RedisProducer;
pub use openmusic_core::{Producer, ProducerError};

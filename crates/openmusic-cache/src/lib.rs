//! Cache backends for album and like-count entries.

pub mod moka;
pub mod redis;

pub use self::moka::{CacheConfig, MokaCache};
pub use openmusic_core::cache::{Cache, CacheKey, Result};
pub use openmusic_core::CacheError;
pub use self::redis::RedisCache;

/// Entry lifetime shared by every backend unless configured otherwise.
pub const DEFAULT_TTL_SECS: u64 = 1800;

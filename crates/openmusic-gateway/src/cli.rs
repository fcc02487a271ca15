use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "OPENMUSIC_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "OPENMUSIC_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "OPENMUSIC_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "OPENMUSIC_DATABASE_URL";
pub const CACHE_BACKEND_ENV: &str = "OPENMUSIC_CACHE_BACKEND";
pub const QUEUE_BACKEND_ENV: &str = "OPENMUSIC_QUEUE_BACKEND";
pub const REDIS_URL_ENV: &str = "OPENMUSIC_REDIS_URL";
pub const ACCESS_TOKEN_KEY_ENV: &str = "OPENMUSIC_ACCESS_TOKEN_KEY";
pub const REFRESH_TOKEN_KEY_ENV: &str = "OPENMUSIC_REFRESH_TOKEN_KEY";
pub const ACCESS_TOKEN_AGE_ENV: &str = "OPENMUSIC_ACCESS_TOKEN_AGE";
pub const UPLOAD_DIR_ENV: &str = "OPENMUSIC_UPLOAD_DIR";
pub const COVER_MAX_BYTES_ENV: &str = "OPENMUSIC_COVER_MAX_BYTES";
pub const CACHE_TTL_ENV: &str = "OPENMUSIC_CACHE_TTL";
pub const LOG_FORMAT_ENV: &str = "OPENMUSIC_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

/// Backend for both the cache and the export queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RedisBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for RedisBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RedisBackendArg::InMemory => write!(f, "in-memory"),
            RedisBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "openmusic-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of the cover URLs stored on albums.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DATABASE_URL_ENV, required_if_eq("storage", "postgres"))]
    pub database_url: Option<String>,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = RedisBackendArg::InMemory
    )]
    pub cache: RedisBackendArg,

    #[arg(
        long,
        env = QUEUE_BACKEND_ENV,
        value_enum,
        default_value_t = RedisBackendArg::InMemory
    )]
    pub queue: RedisBackendArg,

    #[arg(
        long,
        env = REDIS_URL_ENV,
        required_if_eq_any([("cache", "redis"), ("queue", "redis")])
    )]
    pub redis_url: Option<String>,

    #[arg(long, env = ACCESS_TOKEN_KEY_ENV, hide_env_values = true)]
    pub access_token_key: String,

    #[arg(long, env = REFRESH_TOKEN_KEY_ENV, hide_env_values = true)]
    pub refresh_token_key: String,

    /// Access token lifetime in seconds.
    #[arg(long, env = ACCESS_TOKEN_AGE_ENV, default_value_t = 1800)]
    pub access_token_age: u64,

    #[arg(long, env = UPLOAD_DIR_ENV, default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    #[arg(
        long,
        env = COVER_MAX_BYTES_ENV,
        default_value_t = openmusic_service::DEFAULT_COVER_MAX_BYTES
    )]
    pub cover_max_bytes: usize,

    /// Cache entry lifetime in seconds.
    #[arg(long, env = CACHE_TTL_ENV, default_value_t = openmusic_cache::DEFAULT_TTL_SECS)]
    pub cache_ttl: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 5] = [
        "openmusic-gateway",
        "--access-token-key",
        "a",
        "--refresh-token-key",
        "r",
    ];

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(KEYS).unwrap();
        assert_eq!(cli.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache, RedisBackendArg::InMemory);
        assert_eq!(cli.cover_max_bytes, 512_000);
        assert_eq!(cli.cache_ttl, 1800);
    }

    #[test]
    fn postgres_requires_database_url() {
        let args = KEYS.iter().copied().chain(["--storage", "postgres"]);
        assert!(CLI::try_parse_from(args).is_err());
    }

    #[test]
    fn redis_cache_requires_url() {
        let args = KEYS.iter().copied().chain(["--cache", "redis"]);
        assert!(CLI::try_parse_from(args).is_err());

        let args = KEYS
            .iter()
            .copied()
            .chain(["--cache", "redis", "--redis-url", "redis://127.0.0.1:6379"]);
        let cli = CLI::try_parse_from(args).unwrap();
        assert_eq!(cli.cache, RedisBackendArg::Redis);
        assert_eq!(cli.queue, RedisBackendArg::InMemory);
    }
}

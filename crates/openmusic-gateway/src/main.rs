use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use openmusic_auth::{TokenManager, TokenSettings};
use openmusic_cache::{Cache, MokaCache, RedisCache};
use openmusic_core::{Producer, RandomIdGenerator};
use openmusic_gateway::cli::{RedisBackendArg, StorageBackendArg, CLI};
use openmusic_gateway::{telemetry, App, AppState};
use openmusic_queue::{InMemoryProducer, RedisProducer};
use openmusic_service::{CoverStorage, Dependencies, Repositories, Services};
use openmusic_storage::{InMemoryRepository, PostgresRepository};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        queue_backend = %config.queue,
        "starting openmusic gateway"
    );

    let repos = match config.storage {
        StorageBackendArg::InMemory => Repositories::shared(InMemoryRepository::new()),
        StorageBackendArg::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("database url is required when storage backend is postgres")?;
            let repository = PostgresRepository::connect(database_url).await?;
            repository.migrate().await?;
            Repositories::shared(repository)
        }
    };

    let cache: Arc<dyn Cache> = match config.cache {
        RedisBackendArg::InMemory => {
            let cache: MokaCache = MokaCache::builder()
                .ttl(Duration::from_secs(config.cache_ttl))
                .build()
                .into();
            Arc::new(cache)
        }
        RedisBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or("redis url is required when cache backend is redis")?;
            Arc::new(
                RedisCache::connect(redis_url)
                    .await?
                    .with_ttl_secs(config.cache_ttl),
            )
        }
    };

    let producer: Arc<dyn Producer> = match config.queue {
        RedisBackendArg::InMemory => Arc::new(InMemoryProducer::new()),
        RedisBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or("redis url is required when queue backend is redis")?;
            Arc::new(RedisProducer::connect(redis_url).await?)
        }
    };

    let tokens = TokenManager::new(
        TokenSettings::builder()
            .access_token_key(config.access_token_key)
            .refresh_token_key(config.refresh_token_key)
            .access_token_age(config.access_token_age)
            .build(),
    );
    let covers = CoverStorage::new(config.upload_dir, config.public_base_url)
        .with_max_bytes(config.cover_max_bytes);

    let services = Services::new(
        repos,
        Dependencies {
            cache,
            producer,
            ids: Arc::new(RandomIdGenerator::new()),
            tokens,
            covers,
        },
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(AppState::new(services))).await?;
    Ok(())
}

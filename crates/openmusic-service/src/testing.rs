//! Shared fixtures for the service tests.

use crate::{CoverStorage, Dependencies, Repositories, Services};
use openmusic_auth::{TokenManager, TokenSettings};
use openmusic_cache::MokaCache;
use openmusic_core::{AlbumPayload, Cache, SequentialIdGenerator, SongPayload, UserPayload};
use openmusic_queue::InMemoryProducer;
use openmusic_storage::InMemoryRepository;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) struct Harness {
    _uploads: TempDir,
    pub services: Services,
    pub cache: Arc<dyn Cache>,
    pub producer: InMemoryProducer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MokaCache::new()))
    }

    pub fn with_cache(cache: Arc<dyn Cache>) -> Self {
        let uploads = tempfile::tempdir().expect("create upload dir");
        let producer = InMemoryProducer::new();
        let tokens = TokenManager::new(
            TokenSettings::builder()
                .access_token_key("access-secret")
                .refresh_token_key("refresh-secret")
                .build(),
        );

        let services = Services::new(
            Repositories::shared(InMemoryRepository::new()),
            Dependencies {
                cache: cache.clone(),
                producer: Arc::new(producer.clone()),
                ids: Arc::new(SequentialIdGenerator::new()),
                tokens,
                covers: CoverStorage::new(uploads.path().join("covers"), "http://localhost:5000"),
            },
        );

        Self {
            _uploads: uploads,
            services,
            cache,
            producer,
        }
    }

    /// Registers a user with password `secret` and returns its id.
    pub async fn user(&self, username: &str) -> String {
        self.services
            .users
            .add_user(user_payload(username))
            .await
            .expect("add user")
    }
}

pub(crate) fn album_payload(name: &str, year: i32) -> AlbumPayload {
    AlbumPayload {
        name: name.to_string(),
        year,
    }
}

pub(crate) fn song_payload(title: &str) -> SongPayload {
    SongPayload {
        title: title.to_string(),
        year: 2008,
        performer: "Coldplay".to_string(),
        genre: "Pop".to_string(),
        duration: Some(240),
        album_id: None,
    }
}

pub(crate) fn user_payload(username: &str) -> UserPayload {
    UserPayload {
        username: username.to_string(),
        password: "secret".to_string(),
        fullname: "John Doe".to_string(),
    }
}

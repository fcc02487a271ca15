//! Application services for the OpenMusic API.
//!
//! Each service owns the repositories it needs as trait objects, so the
//! same code runs against PostgreSQL or the in-memory backend.

pub mod albums;
pub mod authentications;
pub mod covers;
pub mod error;
pub mod exports;
pub mod playlist_songs;
pub mod playlists;
pub mod songs;
pub mod users;

#[cfg(test)]
mod testing;

pub use albums::{AlbumsService, DataSource, LikeAction, Likes};
pub use authentications::{AuthenticationsService, TokenPair};
pub use covers::{CoverStorage, COVER_ROUTE, DEFAULT_COVER_MAX_BYTES};
pub use error::{Result, ServiceError};
pub use exports::ExportsService;
pub use playlist_songs::PlaylistSongsService;
pub use playlists::PlaylistsService;
pub use songs::SongsService;
pub use users::UsersService;

use openmusic_auth::TokenManager;
use openmusic_core::{
    AlbumLikeRepository, AlbumRepository, AuthenticationRepository, Cache, IdGenerator,
    PlaylistRepository, PlaylistSongRepository, Producer, SongRepository, UserRepository,
};
use std::sync::Arc;

/// One handle per repository contract.
#[derive(Clone)]
pub struct Repositories {
    pub albums: Arc<dyn AlbumRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub users: Arc<dyn UserRepository>,
    pub authentications: Arc<dyn AuthenticationRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub playlist_songs: Arc<dyn PlaylistSongRepository>,
    pub likes: Arc<dyn AlbumLikeRepository>,
}

impl Repositories {
    /// Uses one backend for every contract.
    pub fn shared<R>(repo: R) -> Self
    where
        R: AlbumRepository
            + SongRepository
            + UserRepository
            + AuthenticationRepository
            + PlaylistRepository
            + PlaylistSongRepository
            + AlbumLikeRepository,
    {
        let repo = Arc::new(repo);
        Self {
            albums: repo.clone(),
            songs: repo.clone(),
            users: repo.clone(),
            authentications: repo.clone(),
            playlists: repo.clone(),
            playlist_songs: repo.clone(),
            likes: repo,
        }
    }
}

/// Everything a service needs besides storage.
#[derive(Clone)]
pub struct Dependencies {
    pub cache: Arc<dyn Cache>,
    pub producer: Arc<dyn Producer>,
    pub ids: Arc<dyn IdGenerator>,
    pub tokens: TokenManager,
    pub covers: CoverStorage,
}

/// The full set of application services.
#[derive(Clone)]
pub struct Services {
    pub albums: AlbumsService,
    pub songs: SongsService,
    pub users: UsersService,
    pub authentications: AuthenticationsService,
    pub playlists: PlaylistsService,
    pub playlist_songs: PlaylistSongsService,
    pub exports: ExportsService,
}

impl Services {
    pub fn new(repos: Repositories, deps: Dependencies) -> Self {
        let Dependencies {
            cache,
            producer,
            ids,
            tokens,
            covers,
        } = deps;

        let users = UsersService::new(repos.users.clone(), ids.clone());
        let playlists = PlaylistsService::new(repos.playlists.clone(), ids.clone());

        Self {
            albums: AlbumsService::new(
                repos.albums.clone(),
                repos.songs.clone(),
                repos.likes.clone(),
                cache.clone(),
                ids.clone(),
                covers,
            ),
            songs: SongsService::new(repos.songs.clone(), cache, ids.clone()),
            authentications: AuthenticationsService::new(
                repos.authentications.clone(),
                users.clone(),
                tokens,
            ),
            playlist_songs: PlaylistSongsService::new(
                playlists.clone(),
                repos.playlists.clone(),
                repos.playlist_songs.clone(),
                repos.songs.clone(),
                ids,
            ),
            exports: ExportsService::new(playlists.clone(), producer),
            users,
            playlists,
        }
    }
}

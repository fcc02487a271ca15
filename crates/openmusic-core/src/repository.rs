//! Storage contracts, one trait per table.
//!
//! Uniqueness and referential cascades are the backend's responsibility:
//! a duplicate insert returns [`StorageError::Conflict`] and deleting a
//! parent row removes (or detaches) its children.
//!
//! [`StorageError::Conflict`]: crate::error::StorageError::Conflict

use crate::album::{Album, AlbumLike};
use crate::error::Result;
use crate::playlist::{Playlist, PlaylistSummary};
use crate::song::{Song, SongFilter, SongSummary};
use crate::user::User;
use async_trait::async_trait;

#[async_trait]
pub trait AlbumRepository: Send + Sync + 'static {
    async fn insert(&self, album: &Album) -> Result<()>;

    /// Returns `None` if the album does not exist.
    async fn get(&self, id: &str) -> Result<Option<Album>>;

    /// Updates name and year. Returns `true` if the album existed.
    async fn update(&self, id: &str, name: &str, year: i32) -> Result<bool>;

    /// Deletes the album, detaching its songs and dropping its likes.
    /// Returns `true` if the album existed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Returns `true` if the album existed.
    async fn set_cover_url(&self, id: &str, cover_url: &str) -> Result<bool>;
}

#[async_trait]
pub trait SongRepository: Send + Sync + 'static {
    async fn insert(&self, song: &Song) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Song>>;

    async fn list(&self, filter: &SongFilter) -> Result<Vec<SongSummary>>;

    async fn list_by_album(&self, album_id: &str) -> Result<Vec<SongSummary>>;

    /// Replaces every column but the id. Returns `true` if the song existed.
    async fn update(&self, song: &Song) -> Result<bool>;

    /// Deletes the song and removes it from every playlist.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Returns `Err(Conflict)` if the username is taken.
    async fn insert(&self, user: &User) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Store of issued refresh tokens.
#[async_trait]
pub trait AuthenticationRepository: Send + Sync + 'static {
    async fn add_refresh_token(&self, token: &str) -> Result<()>;

    async fn has_refresh_token(&self, token: &str) -> Result<bool>;

    /// Returns `true` if the token was stored.
    async fn delete_refresh_token(&self, token: &str) -> Result<bool>;
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync + 'static {
    async fn insert(&self, playlist: &Playlist) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Playlist>>;

    /// Returns the playlist joined with its owner's username.
    async fn summary(&self, id: &str) -> Result<Option<PlaylistSummary>>;

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<PlaylistSummary>>;

    /// Deletes the playlist and its song memberships.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait PlaylistSongRepository: Send + Sync + 'static {
    /// Returns `Err(Conflict)` if the song is already in the playlist.
    async fn add(&self, id: &str, playlist_id: &str, song_id: &str) -> Result<()>;

    async fn songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>>;

    /// Returns `true` if the song was in the playlist.
    async fn remove(&self, playlist_id: &str, song_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait AlbumLikeRepository: Send + Sync + 'static {
    async fn find(&self, album_id: &str, user_id: &str) -> Result<Option<AlbumLike>>;

    /// Returns `Err(Conflict)` if the user already likes the album.
    async fn insert(&self, like: &AlbumLike) -> Result<()>;

    /// Returns `true` if a like was removed.
    async fn delete(&self, album_id: &str, user_id: &str) -> Result<bool>;

    /// Likes of one album, ordered by id.
    async fn list_likes(&self, album_id: &str) -> Result<Vec<AlbumLike>>;
}

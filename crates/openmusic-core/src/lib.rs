//! Core types and traits for the OpenMusic backend.
//!
//! This crate provides the domain model, entity id generation, request
//! payload validation and the storage, cache and queue contracts shared by
//! the service layer and its backends.

pub mod album;
pub mod cache;
pub mod error;
pub mod export;
pub mod id;
pub mod playlist;
pub mod producer;
pub mod repository;
pub mod song;
pub mod user;
pub mod validation;

pub use album::{Album, AlbumDetail, AlbumLike, AlbumPayload};
pub use cache::{Cache, CacheKey};
pub use error::{CacheError, ProducerError, StorageError, ValidationError};
pub use export::{ExportJob, ExportPayload, EXPORT_PLAYLISTS_QUEUE};
pub use id::{EntityKind, IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use playlist::{Playlist, PlaylistDetail, PlaylistPayload, PlaylistSongPayload, PlaylistSummary};
pub use producer::Producer;
pub use repository::{
    AlbumLikeRepository, AlbumRepository, AuthenticationRepository, PlaylistRepository,
    PlaylistSongRepository, SongRepository, UserRepository,
};
pub use song::{Song, SongFilter, SongPayload, SongSummary};
pub use user::{LoginPayload, RefreshTokenPayload, User, UserPayload, UserProfile};

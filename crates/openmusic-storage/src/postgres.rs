use async_trait::async_trait;
use openmusic_core::error::{Result, StorageError};
use openmusic_core::repository::{
    AlbumLikeRepository, AlbumRepository, AuthenticationRepository, PlaylistRepository,
    PlaylistSongRepository, SongRepository, UserRepository,
};
use openmusic_core::{
    Album, AlbumLike, Playlist, PlaylistSummary, Song, SongFilter, SongSummary, User,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, trace};

/// PostgreSQL implementation of every repository contract.
///
/// All statements are parameterized. Uniqueness and cascading deletes are
/// enforced by the schema in `migrations/`.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))?;
        debug!("database migrations applied");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_foreign_key_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn map_insert_error(err: sqlx::Error, what: impl Into<String>) -> StorageError {
    if is_unique_violation(&err) {
        StorageError::Conflict(what.into())
    } else if is_foreign_key_violation(&err) {
        StorageError::MissingReference(what.into())
    } else {
        map_sqlx_error(err)
    }
}

fn album_from_row(row: &PgRow) -> Result<Album> {
    Ok(Album {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        name: row.try_get("name").map_err(map_sqlx_error)?,
        year: row.try_get("year").map_err(map_sqlx_error)?,
        cover_url: row.try_get("cover_url").map_err(map_sqlx_error)?,
    })
}

fn song_from_row(row: &PgRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        title: row.try_get("title").map_err(map_sqlx_error)?,
        year: row.try_get("year").map_err(map_sqlx_error)?,
        performer: row.try_get("performer").map_err(map_sqlx_error)?,
        genre: row.try_get("genre").map_err(map_sqlx_error)?,
        duration: row.try_get("duration").map_err(map_sqlx_error)?,
        album_id: row.try_get("album_id").map_err(map_sqlx_error)?,
    })
}

fn song_summary_from_row(row: &PgRow) -> Result<SongSummary> {
    Ok(SongSummary {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        title: row.try_get("title").map_err(map_sqlx_error)?,
        performer: row.try_get("performer").map_err(map_sqlx_error)?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        username: row.try_get("username").map_err(map_sqlx_error)?,
        password_hash: row.try_get("password").map_err(map_sqlx_error)?,
        fullname: row.try_get("fullname").map_err(map_sqlx_error)?,
    })
}

fn album_like_from_row(row: &PgRow) -> Result<AlbumLike> {
    Ok(AlbumLike {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        user_id: row.try_get("user_id").map_err(map_sqlx_error)?,
        album_id: row.try_get("album_id").map_err(map_sqlx_error)?,
    })
}

fn playlist_summary_from_row(row: &PgRow) -> Result<PlaylistSummary> {
    Ok(PlaylistSummary {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        name: row.try_get("name").map_err(map_sqlx_error)?,
        username: row.try_get("username").map_err(map_sqlx_error)?,
    })
}

#[async_trait]
impl AlbumRepository for PostgresRepository {
    async fn insert(&self, album: &Album) -> Result<()> {
        trace!(album_id = %album.id, "inserting album");

        sqlx::query("INSERT INTO albums (id, name, year, cover_url) VALUES ($1, $2, $3, $4)")
            .bind(&album.id)
            .bind(&album.name)
            .bind(album.year)
            .bind(&album.cover_url)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, album.id.clone()))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Album>> {
        let row = sqlx::query("SELECT id, name, year, cover_url FROM albums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(album_from_row).transpose()
    }

    async fn update(&self, id: &str, name: &str, year: i32) -> Result<bool> {
        let result = sqlx::query("UPDATE albums SET name = $1, year = $2 WHERE id = $3")
            .bind(name)
            .bind(year)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_cover_url(&self, id: &str, cover_url: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE albums SET cover_url = $1 WHERE id = $2")
            .bind(cover_url)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SongRepository for PostgresRepository {
    async fn insert(&self, song: &Song) -> Result<()> {
        trace!(song_id = %song.id, "inserting song");

        sqlx::query(
            r#"
            INSERT INTO songs (id, title, year, performer, genre, duration, album_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&song.id)
        .bind(&song.title)
        .bind(song.year)
        .bind(&song.performer)
        .bind(&song.genre)
        .bind(song.duration)
        .bind(&song.album_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, song.id.clone()))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Song>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, year, performer, genre, duration, album_id
            FROM songs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(song_from_row).transpose()
    }

    async fn list(&self, filter: &SongFilter) -> Result<Vec<SongSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, performer
            FROM songs
            WHERE ($1::TEXT IS NULL OR strpos(lower(title), lower($1)) > 0)
              AND ($2::TEXT IS NULL OR strpos(lower(performer), lower($2)) > 0)
            ORDER BY id
            "#,
        )
        .bind(&filter.title)
        .bind(&filter.performer)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(song_summary_from_row).collect()
    }

    async fn list_by_album(&self, album_id: &str) -> Result<Vec<SongSummary>> {
        let rows = sqlx::query(
            "SELECT id, title, performer FROM songs WHERE album_id = $1 ORDER BY id",
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(song_summary_from_row).collect()
    }

    async fn update(&self, song: &Song) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET title = $1, year = $2, performer = $3, genre = $4, duration = $5, album_id = $6
            WHERE id = $7
            "#,
        )
        .bind(&song.title)
        .bind(song.year)
        .bind(&song.performer)
        .bind(&song.genre)
        .bind(song.duration)
        .bind(&song.album_id)
        .bind(&song.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, song.id.clone()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        trace!(user_id = %user.id, "inserting user");

        sqlx::query("INSERT INTO users (id, username, password, fullname) VALUES ($1, $2, $3, $4)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.fullname)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, user.username.clone()))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password, fullname FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password, fullname FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl AuthenticationRepository for PostgresRepository {
    async fn add_refresh_token(&self, token: &str) -> Result<()> {
        sqlx::query("INSERT INTO authentications (token) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn has_refresh_token(&self, token: &str) -> Result<bool> {
        let exists = sqlx::query("SELECT 1 FROM authentications WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        Ok(exists)
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM authentications WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PlaylistRepository for PostgresRepository {
    async fn insert(&self, playlist: &Playlist) -> Result<()> {
        trace!(playlist_id = %playlist.id, owner = %playlist.owner, "inserting playlist");

        sqlx::query("INSERT INTO playlists (id, name, owner) VALUES ($1, $2, $3)")
            .bind(&playlist.id)
            .bind(&playlist.name)
            .bind(&playlist.owner)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, playlist.id.clone()))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Playlist>> {
        let row = sqlx::query("SELECT id, name, owner FROM playlists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Playlist {
            id: row.try_get("id").map_err(map_sqlx_error)?,
            name: row.try_get("name").map_err(map_sqlx_error)?,
            owner: row.try_get("owner").map_err(map_sqlx_error)?,
        }))
    }

    async fn summary(&self, id: &str) -> Result<Option<PlaylistSummary>> {
        let row = sqlx::query(
            r#"
            SELECT playlists.id, playlists.name, users.username
            FROM playlists
            JOIN users ON users.id = playlists.owner
            WHERE playlists.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(playlist_summary_from_row).transpose()
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<PlaylistSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT playlists.id, playlists.name, users.username
            FROM playlists
            JOIN users ON users.id = playlists.owner
            WHERE playlists.owner = $1
            ORDER BY playlists.id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(playlist_summary_from_row).collect()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PlaylistSongRepository for PostgresRepository {
    async fn add(&self, id: &str, playlist_id: &str, song_id: &str) -> Result<()> {
        sqlx::query("INSERT INTO playlist_songs (id, playlist_id, song_id) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(playlist_id)
            .bind(song_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, format!("{playlist_id}/{song_id}")))?;

        Ok(())
    }

    async fn songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT songs.id, songs.title, songs.performer
            FROM playlist_songs
            JOIN songs ON songs.id = playlist_songs.song_id
            WHERE playlist_songs.playlist_id = $1
            ORDER BY playlist_songs.id
            "#,
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(song_summary_from_row).collect()
    }

    async fn remove(&self, playlist_id: &str, song_id: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = $1 AND song_id = $2")
                .bind(playlist_id)
                .bind(song_id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AlbumLikeRepository for PostgresRepository {
    async fn find(&self, album_id: &str, user_id: &str) -> Result<Option<AlbumLike>> {
        let row = sqlx::query(
            "SELECT id, user_id, album_id FROM user_album_likes WHERE album_id = $1 AND user_id = $2",
        )
        .bind(album_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(album_like_from_row).transpose()
    }

    async fn insert(&self, like: &AlbumLike) -> Result<()> {
        sqlx::query("INSERT INTO user_album_likes (id, user_id, album_id) VALUES ($1, $2, $3)")
            .bind(&like.id)
            .bind(&like.user_id)
            .bind(&like.album_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, format!("{}/{}", like.user_id, like.album_id)))?;

        Ok(())
    }

    async fn delete(&self, album_id: &str, user_id: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM user_album_likes WHERE album_id = $1 AND user_id = $2")
                .bind(album_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_likes(&self, album_id: &str) -> Result<Vec<AlbumLike>> {
        let rows = sqlx::query(
            "SELECT id, user_id, album_id FROM user_album_likes WHERE album_id = $1 ORDER BY id",
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(album_like_from_row).collect()
    }
}

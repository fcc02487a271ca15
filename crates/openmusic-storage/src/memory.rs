use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use openmusic_core::error::{Result, StorageError};
use openmusic_core::repository::{
    AlbumLikeRepository, AlbumRepository, AuthenticationRepository, PlaylistRepository,
    PlaylistSongRepository, SongRepository, UserRepository,
};
use openmusic_core::{
    Album, AlbumLike, Playlist, PlaylistSummary, Song, SongFilter, SongSummary, User,
};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Tables {
    albums: DashMap<String, Album>,
    songs: DashMap<String, Song>,
    users: DashMap<String, User>,
    /// username -> user id
    usernames: DashMap<String, String>,
    refresh_tokens: DashSet<String>,
    playlists: DashMap<String, Playlist>,
    /// (playlist id, song id) -> membership id
    playlist_songs: DashMap<(String, String), String>,
    /// (album id, user id) -> like
    likes: DashMap<(String, String), AlbumLike>,
}

/// In-memory implementation of every repository contract using DashMap.
///
/// Mirrors the PostgreSQL schema: usernames, playlist memberships and likes
/// are unique, and deletes cascade the same way the foreign keys do. Clones
/// share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn song_summaries<'a>(&self, songs: impl Iterator<Item = &'a Song>) -> Vec<SongSummary> {
        let mut summaries: Vec<_> = songs.map(Song::summary).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    fn playlist_summary(&self, playlist: &Playlist) -> Result<PlaylistSummary> {
        let username = self
            .tables
            .users
            .get(&playlist.owner)
            .map(|u| u.username.clone())
            .ok_or_else(|| StorageError::MissingReference(playlist.owner.clone()))?;

        Ok(PlaylistSummary {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            username,
        })
    }
}

#[async_trait]
impl AlbumRepository for InMemoryRepository {
    async fn insert(&self, album: &Album) -> Result<()> {
        match self.tables.albums.entry(album.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(album.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(album.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Album>> {
        Ok(self.tables.albums.get(id).map(|a| a.clone()))
    }

    async fn update(&self, id: &str, name: &str, year: i32) -> Result<bool> {
        let Some(mut album) = self.tables.albums.get_mut(id) else {
            return Ok(false);
        };
        album.name = name.to_string();
        album.year = year;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        if self.tables.albums.remove(id).is_none() {
            return Ok(false);
        }

        // ON DELETE SET NULL for songs, CASCADE for likes.
        for mut song in self.tables.songs.iter_mut() {
            if song.album_id.as_deref() == Some(id) {
                song.album_id = None;
            }
        }
        self.tables.likes.retain(|(album_id, _), _| album_id != id);

        Ok(true)
    }

    async fn set_cover_url(&self, id: &str, cover_url: &str) -> Result<bool> {
        let Some(mut album) = self.tables.albums.get_mut(id) else {
            return Ok(false);
        };
        album.cover_url = Some(cover_url.to_string());
        Ok(true)
    }
}

#[async_trait]
impl SongRepository for InMemoryRepository {
    async fn insert(&self, song: &Song) -> Result<()> {
        if let Some(album_id) = &song.album_id {
            if !self.tables.albums.contains_key(album_id) {
                return Err(StorageError::MissingReference(album_id.clone()));
            }
        }

        match self.tables.songs.entry(song.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(song.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(song.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Song>> {
        Ok(self.tables.songs.get(id).map(|s| s.clone()))
    }

    async fn list(&self, filter: &SongFilter) -> Result<Vec<SongSummary>> {
        let matching: Vec<Song> = self
            .tables
            .songs
            .iter()
            .filter(|s| filter.matches(s.value()))
            .map(|s| s.value().clone())
            .collect();
        Ok(self.song_summaries(matching.iter()))
    }

    async fn list_by_album(&self, album_id: &str) -> Result<Vec<SongSummary>> {
        let matching: Vec<Song> = self
            .tables
            .songs
            .iter()
            .filter(|s| s.album_id.as_deref() == Some(album_id))
            .map(|s| s.value().clone())
            .collect();
        Ok(self.song_summaries(matching.iter()))
    }

    async fn update(&self, song: &Song) -> Result<bool> {
        if let Some(album_id) = &song.album_id {
            if !self.tables.albums.contains_key(album_id) {
                return Err(StorageError::MissingReference(album_id.clone()));
            }
        }

        let Some(mut stored) = self.tables.songs.get_mut(&song.id) else {
            return Ok(false);
        };
        *stored = song.clone();
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        if self.tables.songs.remove(id).is_none() {
            return Ok(false);
        }
        self.tables
            .playlist_songs
            .retain(|(_, song_id), _| song_id != id);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        // Reserve the username first so concurrent inserts cannot both win.
        match self.tables.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(user.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
            }
        }

        self.tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let Some(id) = self.tables.usernames.get(username).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.tables.users.get(&id).map(|u| u.clone()))
    }
}

#[async_trait]
impl AuthenticationRepository for InMemoryRepository {
    async fn add_refresh_token(&self, token: &str) -> Result<()> {
        self.tables.refresh_tokens.insert(token.to_string());
        Ok(())
    }

    async fn has_refresh_token(&self, token: &str) -> Result<bool> {
        Ok(self.tables.refresh_tokens.contains(token))
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool> {
        Ok(self.tables.refresh_tokens.remove(token).is_some())
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryRepository {
    async fn insert(&self, playlist: &Playlist) -> Result<()> {
        if !self.tables.users.contains_key(&playlist.owner) {
            return Err(StorageError::MissingReference(playlist.owner.clone()));
        }

        match self.tables.playlists.entry(playlist.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(playlist.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(playlist.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Playlist>> {
        Ok(self.tables.playlists.get(id).map(|p| p.clone()))
    }

    async fn summary(&self, id: &str) -> Result<Option<PlaylistSummary>> {
        let Some(playlist) = self.tables.playlists.get(id).map(|p| p.clone()) else {
            return Ok(None);
        };
        self.playlist_summary(&playlist).map(Some)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<PlaylistSummary>> {
        let owned: Vec<Playlist> = self
            .tables
            .playlists
            .iter()
            .filter(|p| p.owner == owner)
            .map(|p| p.value().clone())
            .collect();

        let mut summaries = owned
            .iter()
            .map(|p| self.playlist_summary(p))
            .collect::<Result<Vec<_>>>()?;
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        if self.tables.playlists.remove(id).is_none() {
            return Ok(false);
        }
        self.tables
            .playlist_songs
            .retain(|(playlist_id, _), _| playlist_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PlaylistSongRepository for InMemoryRepository {
    async fn add(&self, id: &str, playlist_id: &str, song_id: &str) -> Result<()> {
        if !self.tables.playlists.contains_key(playlist_id) {
            return Err(StorageError::MissingReference(playlist_id.to_string()));
        }
        if !self.tables.songs.contains_key(song_id) {
            return Err(StorageError::MissingReference(song_id.to_string()));
        }

        match self
            .tables
            .playlist_songs
            .entry((playlist_id.to_string(), song_id.to_string()))
        {
            Entry::Occupied(_) => Err(StorageError::Conflict(format!("{playlist_id}/{song_id}"))),
            Entry::Vacant(slot) => {
                slot.insert(id.to_string());
                Ok(())
            }
        }
    }

    async fn songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>> {
        let mut members: Vec<(String, String)> = self
            .tables
            .playlist_songs
            .iter()
            .filter(|m| m.key().0 == playlist_id)
            .map(|m| (m.value().clone(), m.key().1.clone()))
            .collect();
        // Ordered by membership id, like the SQL backend.
        members.sort();

        Ok(members
            .iter()
            .filter_map(|(_, song_id)| self.tables.songs.get(song_id).map(|s| s.summary()))
            .collect())
    }

    async fn remove(&self, playlist_id: &str, song_id: &str) -> Result<bool> {
        Ok(self
            .tables
            .playlist_songs
            .remove(&(playlist_id.to_string(), song_id.to_string()))
            .is_some())
    }
}

#[async_trait]
impl AlbumLikeRepository for InMemoryRepository {
    async fn find(&self, album_id: &str, user_id: &str) -> Result<Option<AlbumLike>> {
        Ok(self
            .tables
            .likes
            .get(&(album_id.to_string(), user_id.to_string()))
            .map(|l| l.clone()))
    }

    async fn insert(&self, like: &AlbumLike) -> Result<()> {
        if !self.tables.albums.contains_key(&like.album_id) {
            return Err(StorageError::MissingReference(like.album_id.clone()));
        }
        if !self.tables.users.contains_key(&like.user_id) {
            return Err(StorageError::MissingReference(like.user_id.clone()));
        }

        match self
            .tables
            .likes
            .entry((like.album_id.clone(), like.user_id.clone()))
        {
            Entry::Occupied(_) => Err(StorageError::Conflict(format!(
                "{}/{}",
                like.user_id, like.album_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(like.clone());
                Ok(())
            }
        }
    }

    async fn delete(&self, album_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .tables
            .likes
            .remove(&(album_id.to_string(), user_id.to_string()))
            .is_some())
    }

    async fn list_likes(&self, album_id: &str) -> Result<Vec<AlbumLike>> {
        let mut likes: Vec<AlbumLike> = self
            .tables
            .likes
            .iter()
            .filter(|l| l.key().0 == album_id)
            .map(|l| l.value().clone())
            .collect();
        likes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(id: &str) -> Album {
        Album {
            id: id.to_string(),
            name: "Viva la Vida".to_string(),
            year: 2008,
            cover_url: None,
        }
    }

    fn song(id: &str, album_id: Option<&str>) -> Song {
        Song {
            id: id.to_string(),
            title: "Lost!".to_string(),
            year: 2008,
            performer: "Coldplay".to_string(),
            genre: "Pop".to_string(),
            duration: Some(235),
            album_id: album_id.map(str::to_string),
        }
    }

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            fullname: "John Doe".to_string(),
        }
    }

    #[tokio::test]
    async fn album_insert_get_update() {
        let repo = InMemoryRepository::new();
        AlbumRepository::insert(&repo, &album("album-1")).await.unwrap();

        assert!(AlbumRepository::update(&repo, "album-1", "Parachutes", 2000)
            .await
            .unwrap());
        let got = AlbumRepository::get(&repo, "album-1").await.unwrap().unwrap();
        assert_eq!(got.name, "Parachutes");
        assert_eq!(got.year, 2000);

        assert!(!AlbumRepository::update(&repo, "album-2", "X", 2000)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn album_delete_detaches_songs_and_drops_likes() {
        let repo = InMemoryRepository::new();
        AlbumRepository::insert(&repo, &album("album-1")).await.unwrap();
        UserRepository::insert(&repo, &user("user-1", "john")).await.unwrap();
        SongRepository::insert(&repo, &song("song-1", Some("album-1")))
            .await
            .unwrap();
        AlbumLikeRepository::insert(
            &repo,
            &AlbumLike {
                id: "like-1".to_string(),
                user_id: "user-1".to_string(),
                album_id: "album-1".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(AlbumRepository::delete(&repo, "album-1").await.unwrap());

        let song = SongRepository::get(&repo, "song-1").await.unwrap().unwrap();
        assert_eq!(song.album_id, None);
        assert_eq!(repo.list_likes("album-1").await.unwrap().len(), 0);
        assert!(!AlbumRepository::delete(&repo, "album-1").await.unwrap());
    }

    #[tokio::test]
    async fn song_requires_existing_album() {
        let repo = InMemoryRepository::new();
        let err = SongRepository::insert(&repo, &song("song-1", Some("album-x")))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingReference(_)));
    }

    #[tokio::test]
    async fn song_filters_match_wildcard_characters_literally() {
        let repo = InMemoryRepository::new();
        for (id, title) in [("song-1", "100% Pure"), ("song-2", "Snake_Case")] {
            let mut s = song(id, None);
            s.title = title.to_string();
            SongRepository::insert(&repo, &s).await.unwrap();
        }

        for (needle, expected) in [("%", "song-1"), ("_", "song-2")] {
            let filter = SongFilter {
                title: Some(needle.to_string()),
                performer: None,
            };
            let found = repo.list(&filter).await.unwrap();
            assert_eq!(found.len(), 1, "filter {needle:?}");
            assert_eq!(found[0].id, expected);
        }
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let repo = InMemoryRepository::new();
        UserRepository::insert(&repo, &user("user-1", "john")).await.unwrap();

        let err = UserRepository::insert(&repo, &user("user-2", "john"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let found = repo.find_by_username("john").await.unwrap().unwrap();
        assert_eq!(found.id, "user-1");
    }

    #[tokio::test]
    async fn refresh_tokens() {
        let repo = InMemoryRepository::new();
        repo.add_refresh_token("token").await.unwrap();

        assert!(repo.has_refresh_token("token").await.unwrap());
        assert!(repo.delete_refresh_token("token").await.unwrap());
        assert!(!repo.has_refresh_token("token").await.unwrap());
        assert!(!repo.delete_refresh_token("token").await.unwrap());
    }

    #[tokio::test]
    async fn playlist_songs_keep_insertion_order_and_cascade() {
        let repo = InMemoryRepository::new();
        UserRepository::insert(&repo, &user("user-1", "john")).await.unwrap();
        PlaylistRepository::insert(
            &repo,
            &Playlist {
                id: "playlist-1".to_string(),
                name: "Favorites".to_string(),
                owner: "user-1".to_string(),
            },
        )
        .await
        .unwrap();
        SongRepository::insert(&repo, &song("song-b", None)).await.unwrap();
        SongRepository::insert(&repo, &song("song-a", None)).await.unwrap();

        repo.add("playlist_song-000001", "playlist-1", "song-b")
            .await
            .unwrap();
        repo.add("playlist_song-000002", "playlist-1", "song-a")
            .await
            .unwrap();
        let err = repo
            .add("playlist_song-000003", "playlist-1", "song-a")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let ids: Vec<_> = repo
            .songs("playlist-1")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["song-b", "song-a"]);

        SongRepository::delete(&repo, "song-b").await.unwrap();
        assert_eq!(repo.songs("playlist-1").await.unwrap().len(), 1);

        PlaylistRepository::delete(&repo, "playlist-1").await.unwrap();
        assert!(repo.songs("playlist-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn playlist_summary_joins_username() {
        let repo = InMemoryRepository::new();
        UserRepository::insert(&repo, &user("user-1", "john")).await.unwrap();
        PlaylistRepository::insert(
            &repo,
            &Playlist {
                id: "playlist-1".to_string(),
                name: "Favorites".to_string(),
                owner: "user-1".to_string(),
            },
        )
        .await
        .unwrap();

        let summaries = repo.list_by_owner("user-1").await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].username, "john");
        assert!(repo.list_by_owner("user-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn likes_are_unique_per_user() {
        let repo = InMemoryRepository::new();
        AlbumRepository::insert(&repo, &album("album-1")).await.unwrap();
        UserRepository::insert(&repo, &user("user-1", "john")).await.unwrap();

        let like = AlbumLike {
            id: "like-1".to_string(),
            user_id: "user-1".to_string(),
            album_id: "album-1".to_string(),
        };
        AlbumLikeRepository::insert(&repo, &like).await.unwrap();
        let err = AlbumLikeRepository::insert(&repo, &like).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        assert_eq!(repo.list_likes("album-1").await.unwrap().len(), 1);
        assert!(AlbumLikeRepository::delete(&repo, "album-1", "user-1")
            .await
            .unwrap());
        assert_eq!(repo.list_likes("album-1").await.unwrap().len(), 0);
    }
}

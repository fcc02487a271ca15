use crate::error::ValidationError;
use crate::song::SongSummary;
use crate::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// A stored playlist row. `owner` is the id of the user who created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// A playlist joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// A playlist with its songs, returned by `GET /playlists/{id}/songs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,
    pub username: String,
    pub songs: Vec<SongSummary>,
}

/// Body of `POST /playlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPayload {
    pub name: String,
}

impl Validate for PlaylistPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("name", &self.name)
    }
}

/// Body of `POST` and `DELETE /playlists/{id}/songs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongPayload {
    pub song_id: String,
}

impl Validate for PlaylistSongPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::id_reference("songId", &self.song_id)
    }
}

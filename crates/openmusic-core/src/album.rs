use crate::error::ValidationError;
use crate::song::SongSummary;
use crate::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// A stored album row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub name: String,
    pub year: i32,
    /// Public URL of the uploaded cover image, if any.
    pub cover_url: Option<String>,
}

/// An album together with the songs that reference it.
///
/// This is the shape returned by `GET /albums/{id}` and the value cached
/// under `album:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub cover_url: Option<String>,
    pub songs: Vec<SongSummary>,
}

impl AlbumDetail {
    pub fn new(album: Album, songs: Vec<SongSummary>) -> Self {
        Self {
            id: album.id,
            name: album.name,
            year: album.year,
            cover_url: album.cover_url,
            songs,
        }
    }
}

/// A user's like of an album. At most one exists per (user, album) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumLike {
    pub id: String,
    pub user_id: String,
    pub album_id: String,
}

/// Body of `POST /albums` and `PUT /albums/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumPayload {
    pub name: String,
    pub year: i32,
}

impl Validate for AlbumPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("name", &self.name)?;
        validation::year("year", self.year)
    }
}

use crate::error::ValidationError;
use crate::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// A stored song row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: String,
    /// Duration in seconds.
    pub duration: Option<i32>,
    pub album_id: Option<String>,
}

impl Song {
    pub fn from_payload(id: impl Into<String>, payload: SongPayload) -> Self {
        Self {
            id: id.into(),
            title: payload.title,
            year: payload.year,
            performer: payload.performer,
            genre: payload.genre,
            duration: payload.duration,
            album_id: payload.album_id,
        }
    }

    pub fn summary(&self) -> SongSummary {
        SongSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            performer: self.performer.clone(),
        }
    }
}

/// The short form of a song used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub performer: String,
}

/// Query filters for `GET /songs`.
///
/// Both filters are case-insensitive substring matches and are combined
/// with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongFilter {
    pub title: Option<String>,
    pub performer: Option<String>,
}

impl SongFilter {
    pub fn matches(&self, song: &Song) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_deref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&song.title, &self.title) && contains(&song.performer, &self.performer)
    }
}

/// Body of `POST /songs` and `PUT /songs/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongPayload {
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: String,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub album_id: Option<String>,
}

impl Validate for SongPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("title", &self.title)?;
        validation::year("year", self.year)?;
        validation::non_empty("performer", &self.performer)?;
        validation::non_empty("genre", &self.genre)?;

        if self.duration.is_some_and(|d| d < 0) {
            return Err(ValidationError::new("\"duration\" must be a positive number"));
        }
        if let Some(album_id) = &self.album_id {
            validation::id_reference("albumId", album_id)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, performer: &str) -> Song {
        Song {
            id: "song-1".to_string(),
            title: title.to_string(),
            year: 2008,
            performer: performer.to_string(),
            genre: "Pop".to_string(),
            duration: Some(242),
            album_id: None,
        }
    }

    #[test]
    fn filter_is_case_insensitive_and_combined() {
        let s = song("Viva la Vida", "Coldplay");

        assert!(SongFilter::default().matches(&s));
        assert!(SongFilter {
            title: Some("VIVA".to_string()),
            performer: None
        }
        .matches(&s));
        assert!(SongFilter {
            title: Some("vida".to_string()),
            performer: Some("cold".to_string())
        }
        .matches(&s));
        assert!(!SongFilter {
            title: Some("vida".to_string()),
            performer: Some("muse".to_string())
        }
        .matches(&s));
    }

    #[test]
    fn payload_rejects_negative_duration() {
        let payload = SongPayload {
            title: "Lost!".to_string(),
            year: 2008,
            performer: "Coldplay".to_string(),
            genre: "Pop".to_string(),
            duration: Some(-1),
            album_id: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn payload_rejects_overlong_album_id() {
        let payload = SongPayload {
            title: "Lost!".to_string(),
            year: 2008,
            performer: "Coldplay".to_string(),
            genre: "Pop".to_string(),
            duration: None,
            album_id: Some("album-".repeat(20)),
        };
        let err = payload.validate().unwrap_err();
        assert!(err.0.contains("albumId"));
    }

    #[test]
    fn payload_deserializes_optional_fields() {
        let payload: SongPayload = serde_json::from_str(
            r#"{"title":"Lost!","year":2008,"performer":"Coldplay","genre":"Pop","albumId":"album-1"}"#,
        )
        .unwrap();

        assert_eq!(payload.album_id.as_deref(), Some("album-1"));
        assert_eq!(payload.duration, None);
        assert!(payload.validate().is_ok());
    }
}

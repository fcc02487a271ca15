use openmusic_core::{AlbumDetail, PlaylistDetail, PlaylistSummary, Song, SongSummary, UserProfile};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumIdData {
    pub album_id: String,
}

#[derive(Debug, Serialize)]
pub struct AlbumData {
    pub album: AlbumDetail,
}

#[derive(Debug, Serialize)]
pub struct LikesData {
    pub likes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongIdData {
    pub song_id: String,
}

#[derive(Debug, Serialize)]
pub struct SongsData {
    pub songs: Vec<SongSummary>,
}

#[derive(Debug, Serialize)]
pub struct SongData {
    pub song: Song,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdData {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensData {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenData {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistIdData {
    pub playlist_id: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistsData {
    pub playlists: Vec<PlaylistSummary>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistData {
    pub playlist: PlaylistDetail,
}

use crate::error::ValidationError;
use crate::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// Queue consumed by the external playlist-export worker.
pub const EXPORT_PLAYLISTS_QUEUE: &str = "export:playlists";

/// A request for the export worker to e-mail a playlist's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    pub playlist_id: String,
    pub target_email: String,
}

/// Body of `POST /export/playlists/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub target_email: String,
}

impl Validate for ExportPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::email("targetEmail", &self.target_email)
    }
}

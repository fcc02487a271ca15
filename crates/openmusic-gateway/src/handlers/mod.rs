mod albums;
mod authentications;
mod exports;
mod health;
mod playlist_songs;
mod playlists;
mod songs;
mod users;

pub use albums::*;
pub use authentications::*;
pub use exports::*;
pub use health::*;
pub use playlist_songs::*;
pub use playlists::*;
pub use songs::*;
pub use users::*;

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;
use crate::model::Envelope;

/// A JSON request body whose rejections use the API's error envelope.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

pub type Reply<T = ()> = (StatusCode, Json<Envelope<T>>);

fn created<T: Serialize>(data: T) -> Reply<T> {
    (StatusCode::CREATED, Json(Envelope::data(data)))
}

fn ok<T: Serialize>(data: T) -> Reply<T> {
    (StatusCode::OK, Json(Envelope::data(data)))
}

fn ok_message(message: &str) -> Reply {
    (StatusCode::OK, Json(Envelope::message(message)))
}

fn created_message(message: &str) -> Reply {
    (StatusCode::CREATED, Json(Envelope::message(message)))
}

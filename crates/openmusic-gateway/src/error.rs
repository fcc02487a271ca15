use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openmusic_service::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::model::Envelope;

pub type Result<T> = std::result::Result<T, AppError>;

const SERVER_ERROR_MESSAGE: &str = "Sorry, something went wrong on our server.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The request body or query string could not be read.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Service(err) => match err {
                ServiceError::Invariant(_) => StatusCode::BAD_REQUEST,
                ServiceError::Authentication(_) => StatusCode::UNAUTHORIZED,
                ServiceError::Authorization(_) => StatusCode::FORBIDDEN,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed");
            return (status, Json(Envelope::error(SERVER_ERROR_MESSAGE))).into_response();
        }

        (status, Json(Envelope::fail(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(value: MultipartRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(value: MultipartError) -> Self {
        if value.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(value.body_text())
        } else {
            AppError::BadRequest(value.body_text())
        }
    }
}

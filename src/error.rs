//! Error handling

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, info};

use crate::images::{ImageGenError, ImageResponse};
use crate::story::StoryError;

/// Errors surfaced by the storybook service.
#[derive(Debug)]
pub enum StorybookError {
    /// When the caller sent something unusable
    BadRequest(String),
    /// When a requested resource is not found
    NotFound(String),
    /// When the image engine could not produce an image
    ImageGeneration(ImageGenError),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<StoryError> for StorybookError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::EmptyIdea => StorybookError::BadRequest(err.to_string()),
            StoryError::MissingDefaultTemplate(..) | StoryError::InvalidTemplate { .. } => {
                StorybookError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ImageGenError> for StorybookError {
    fn from(err: ImageGenError) -> Self {
        StorybookError::ImageGeneration(err)
    }
}

impl From<JsonRejection> for StorybookError {
    fn from(err: JsonRejection) -> Self {
        StorybookError::BadRequest(err.body_text())
    }
}

impl From<std::io::Error> for StorybookError {
    fn from(err: std::io::Error) -> Self {
        StorybookError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for StorybookError {
    fn into_response(self) -> axum::response::Response {
        match self {
            StorybookError::BadRequest(message) => {
                info!("Bad request received: {message}");
                (StatusCode::BAD_REQUEST, Json(ImageResponse::failed(message))).into_response()
            }
            StorybookError::NotFound(what) => {
                info!("404 {what}");
                (StatusCode::NOT_FOUND, Json(ImageResponse::failed("Not Found"))).into_response()
            }
            StorybookError::ImageGeneration(err) => {
                error!("Image generation error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ImageResponse::from(err)),
                )
                    .into_response()
            }
            StorybookError::InternalServerError(message) => {
                error!("Internal server error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ImageResponse::failed("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

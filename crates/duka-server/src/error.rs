//! HTTP error mapping

use duka_core::ControllerError;
use duka_inventory::ClientError;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    NotFound(#[from] ControllerError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl warp::reject::Reject for ApiError {}

/// Errors starting the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to build sources: {0}")]
    Sources(#[from] ClientError),

    #[error("Failed to bind listener: {0}")]
    Bind(#[from] warp::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Render every rejection as `{"error": "..."}` with a matching status
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Route not found".to_string())
    } else if let Some(api) = err.find::<ApiError>() {
        (api.status(), api.to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Malformed payload: {e}"))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected application/json".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        tracing::warn!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
        )
    };

    if status.is_server_error() {
        tracing::error!(%status, "{message}");
    } else {
        tracing::debug!(%status, "{message}");
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { error: message }),
        status,
    ))
}

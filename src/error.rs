// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing credential: {0}")]
    MissingCredentials(&'static str),

    #[error("Spotify API error: {0}")]
    SpotifyApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::MissingCredentials(field) => (
                StatusCode::BAD_REQUEST,
                "Missing credentials",
                Some(format!(
                    "{} was not provided; supply it via headers \
                     (x-spotify-client-id, x-spotify-client-secret, \
                     x-spotify-refresh-token), query parameters, or environment",
                    field
                )),
            ),
            AppError::SpotifyApi(msg) => {
                tracing::error!(error = %msg, "Spotify API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch Spotify statistics",
                    Some(msg.clone()),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the request. Bodies are plain text since the
/// caller asked for an image.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Upstream feed returned status {status}")]
    UpstreamFetch { status: u16 },

    #[error("Upstream feed unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::UpstreamFetch { status } => {
                tracing::error!(upstream_status = status, "Feed fetch failed");
                "Feed error"
            }
            AppError::UpstreamUnavailable(e) => {
                tracing::error!("Feed unreachable: {e}");
                "Feed error"
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                "Render error"
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Internal error"
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            message,
        )
            .into_response()
    }
}

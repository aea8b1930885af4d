//! Mapping of coordinator failures onto HTTP responses.

use crate::protocol::ErrorBody;
use crate::registry::services::DispatchError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by coordinator handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The dispatcher rejected the request.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The management view failed to render.
    #[error("failed to render task listing: {0}")]
    Render(#[from] minijinja::Error),
}

impl ApiError {
    /// Returns the HTTP status the error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Dispatch(DispatchError::Payload(_)) => StatusCode::BAD_REQUEST,
            Self::Dispatch(DispatchError::NodeNotFound(_) | DispatchError::TargetNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            Self::Dispatch(DispatchError::Registry(_) | DispatchError::Directory(_))
            | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

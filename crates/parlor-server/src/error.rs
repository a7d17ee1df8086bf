//! HTTP-level error type and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parlor_kernel::SupervisorError;

/// Application-level error for HTTP handlers.
///
/// Wraps [`SupervisorError`] for everything the kernel reports and adds
/// the boundary-only cases (bad input, auth, timeout). Implements
/// [`IntoResponse`] so every failure renders as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An orchestration or game-model error from the kernel.
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    /// Malformed request input (bad UUID, unknown game type, bad body).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The supervisor did not answer within the ask timeout. The
    /// command may still be processed; its reply is discarded.
    #[error("request timed out")]
    Timeout,
}

/// Convenience alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Supervisor(e) => {
                let status = match e {
                    SupervisorError::LobbyNotFound
                    | SupervisorError::GameNotFound
                    | SupervisorError::MatchNotFound => StatusCode::NOT_FOUND,

                    // Game-model rejections surface as 404, the
                    // contract clients already depend on.
                    SupervisorError::Game(_) => StatusCode::NOT_FOUND,

                    SupervisorError::LobbyFull
                    | SupervisorError::AlreadyJoined
                    | SupervisorError::NotJoinable
                    | SupervisorError::NotStartable
                    | SupervisorError::UnsupportedGameType(_) => StatusCode::BAD_REQUEST,

                    SupervisorError::StashOverflow | SupervisorError::Unexpected => {
                        tracing::error!(error = %e, "supervisor failure");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Timeout => {
                tracing::error!("supervisor ask timed out");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

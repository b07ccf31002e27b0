use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{error_payload::ErrorPayload, follow_error::FollowError};

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Follow(#[from] FollowError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    pub fn code(&self) -> StatusCode {
        match self {
            AppError::Follow(e) => e.code(),
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_type(&self) -> String {
        match self {
            AppError::Follow(e) => e.error_type(),
            AppError::Unauthorized(_) => "UNAUTHORIZED",
        }
        .to_string()
    }

    /// Storage failures keep their detail in the logs, not in the response.
    fn public_message(&self) -> String {
        match self {
            AppError::Follow(FollowError::DatabaseError(_)) => {
                "An error occurred while accessing the database".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code();
        let error_response = ErrorPayload {
            message: self.public_message(),
            code: status.as_u16(),
            r#type: self.error_type(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::Envelope;

/// Everything a request can fail with. Rendered as an error envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Sorry, user with this email already exist!")]
    Conflict,

    #[error("invalid Password or Email")]
    Authentication,

    #[error("Unauthorized")]
    Authorization,

    #[error("{0}")]
    Token(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authorization => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "rejected request body");
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Store(e) => {
                error!(error = ?e, "store operation failed");
                "Sorry, failed to access the database".to_string()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        Envelope::failure(status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Authentication.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Authorization.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Token("jwt expired".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("gone").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Store(anyhow::anyhow!("boom")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("hash".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_wire_text() {
        assert_eq!(
            AppError::Conflict.to_string(),
            "Sorry, user with this email already exist!"
        );
        assert_eq!(AppError::Authentication.to_string(), "invalid Password or Email");
        assert_eq!(AppError::Authorization.to_string(), "Unauthorized");
        assert_eq!(AppError::NotFound("Sorry, invalid ID note").to_string(), "Sorry, invalid ID note");
    }
}

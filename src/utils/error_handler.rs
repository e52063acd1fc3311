use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    auth::{AuthError, OtpError},
    models::ErrorResponse,
};

#[derive(Debug)]
pub enum AppError {
    BadRequestErr(String),
    NotFound(String),
    Auth(String),
    Conflict(String),
    Session(AuthError),
    Otp(OtpError),
    AnyError(anyhow::Error),
}

impl AppError {
    /// HTTP status and stable error code for the response
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequestErr(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Auth(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Session(err) => {
                let status = match err {
                    AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
                    AuthError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::UNAUTHORIZED,
                };
                (status, err.code())
            }
            Self::Otp(err) => {
                let status = match err {
                    OtpError::NotFound => StatusCode::NOT_FOUND,
                    OtpError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
                    OtpError::Expired | OtpError::Mismatch { .. } => StatusCode::UNAUTHORIZED,
                };
                (status, err.code())
            }
            Self::AnyError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequestErr(msg)
            | Self::NotFound(msg)
            | Self::Auth(msg)
            | Self::Conflict(msg) => msg.to_owned(),
            Self::Session(err) => err.to_string(),
            Self::Otp(err) => err.to_string(),
            Self::AnyError(err) => format!("Something went wrong: {err}"),
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self::AnyError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let msg = self.message();
        match &self {
            Self::AnyError(_) | Self::Session(AuthError::Encoding(_)) => {
                tracing::error!("{code}: {msg}")
            }
            _ => tracing::debug!("{code}: {msg}"),
        }
        let response = ErrorResponse::new(msg, code);
        (status, Json(response)).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, ComposeError, EngineError},
    views,
};

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Compose(ComposeError::MissingCredential) => StatusCode::UNAUTHORIZED,
            AppError::Compose(_) => StatusCode::BAD_REQUEST,
            AppError::Engine(EngineError::InvalidKey) => StatusCode::UNAUTHORIZED,
            AppError::Engine(EngineError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Engine(_) => StatusCode::BAD_GATEWAY,
            AppError::File(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if self.is_user_error() {
            tracing::warn!("request rejected: {self}");
        } else {
            tracing::error!("request failed: {self}");
        }

        let notice = match &self {
            AppError::Compose(ComposeError::MissingCredential) => {
                views::results::blocking_notice(&self.to_string())
            }
            AppError::File(_) | AppError::Config(_) => {
                views::results::error_notice("Something went wrong on our side. Please try again.")
            }
            _ => views::results::error_notice(&self.to_string()),
        };

        (code, notice).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::Compose(ComposeError::MalformedForm {
            reason: err.body_text(),
        })
    }
}

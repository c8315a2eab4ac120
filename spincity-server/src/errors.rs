use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use spincity_core::ErrorCode;
use spincity_market::{MarketError, OnboardingError};
use thiserror::Error;
use validator::ValidationErrors;

use crate::serialized::ErrorBody;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    /// A failure reported by a procedure the handler depends on, with its own status
    #[error("{message}")]
    Upstream { message: String, status: u16 },
}

impl ServerError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Internal(_) => ErrorCode::InternalServerError,
            Self::Upstream { status, .. } => ErrorCode::from_http_status(*status),
        }
    }

    fn as_status_code(&self) -> StatusCode {
        let status = match self {
            Self::Upstream { status, .. } => *status,
            e => e.code().http_status(),
        };

        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };

        (self.as_status_code(), Json(body)).into_response()
    }
}

impl From<MarketError> for ServerError {
    fn from(value: MarketError) -> Self {
        match value {
            MarketError::NotFound(message) => Self::NotFound(message),
            MarketError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<OnboardingError> for ServerError {
    fn from(value: OnboardingError) -> Self {
        match value {
            OnboardingError::MissingEmail => Self::BadRequest(value.to_string()),
            _ => Self::Internal("Failed to create seller".to_string()),
        }
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(value: ValidationErrors) -> Self {
        warn!("Rejected request body: {}", value);
        Self::BadRequest("Request body is invalid".to_string())
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The codes a remote procedure can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The input did not match the declared shape
    BadRequest,
    /// The caller has no valid session
    Unauthorized,
    /// The identifier of a single-entity lookup did not resolve
    NotFound,
    /// Anything else, including connectivity
    InternalServerError,
}

impl ErrorCode {
    /// The HTTP status conventionally associated with this code
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// The code conventionally associated with an HTTP status
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => Self::InternalServerError,
        }
    }
}

/// A tagged error returned by a collection fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub code: ErrorCode,
    pub message: String,
    /// The HTTP status reported upstream, if any
    pub http_status: Option<u16>,
}

impl FetchError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalServerError, message)
    }

    /// Attaches the HTTP status reported by the transport
    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Returns true if the store reported that the identifier doesn't exist
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_codes_serialize_like_the_wire() {
        let json = serde_json::to_string(&ErrorCode::InternalServerError).unwrap();
        assert_eq!(json, "\"INTERNAL_SERVER_ERROR\"");

        let code: ErrorCode = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(code, ErrorCode::NotFound);
    }

    #[test]
    fn test_status_mapping() {
        for code in [
            ErrorCode::BadRequest,
            ErrorCode::Unauthorized,
            ErrorCode::NotFound,
            ErrorCode::InternalServerError,
        ] {
            assert_eq!(ErrorCode::from_http_status(code.http_status()), code);
        }

        assert_eq!(
            ErrorCode::from_http_status(503),
            ErrorCode::InternalServerError
        );
    }
}

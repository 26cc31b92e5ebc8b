use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AuthError, CatalogError, RatingError};

#[derive(Debug)]
pub enum ApiError {
    /// Every violated rule of a rejected payload.
    Validation(Vec<String>),

    BadRequest(String),

    NotFound { code: &'static str, message: String },

    Conflict { code: &'static str, message: String },

    Unauthorized { code: &'static str, message: String },

    Forbidden(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "Validation failed: {}", errors.join(", ")),
            Self::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            Self::NotFound { message, .. } => write!(f, "Not found: {message}"),
            Self::Conflict { message, .. } => write!(f, "Conflict: {message}"),
            Self::Unauthorized { message, .. } => write!(f, "Unauthorized: {message}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error("Validation failed")
                    .with_code("VALIDATION_ERROR")
                    .with_errors(errors),
            ),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::error(msg).with_code("BAD_REQUEST"),
            ),
            Self::NotFound { code, message } => (
                StatusCode::NOT_FOUND,
                ApiResponse::error(message).with_code(code),
            ),
            Self::Conflict { code, message } => (
                StatusCode::CONFLICT,
                ApiResponse::error(message).with_code(code),
            ),
            Self::Unauthorized { code, message } => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::error(message).with_code(code),
            ),
            Self::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ApiResponse::error(msg).with_code("INSUFFICIENT_PERMISSIONS"),
            ),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("An internal error occurred").with_code("INTERNAL_ERROR"),
                )
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("An internal error occurred").with_code("INTERNAL_ERROR"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(errors) => Self::Validation(errors),
            CatalogError::NotFound { code, message } => Self::NotFound { code, message },
            CatalogError::Conflict { code, message } => Self::Conflict { code, message },
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<RatingError> for ApiError {
    fn from(err: RatingError) -> Self {
        match err {
            RatingError::Validation(errors) => Self::Validation(errors),
            RatingError::NotFound { code, message } => Self::NotFound { code, message },
            RatingError::Conflict { code, message } => Self::Conflict { code, message },
            RatingError::Database(msg) => Self::DatabaseError(msg),
            RatingError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => Self::Validation(errors),
            AuthError::InvalidCredentials => Self::Unauthorized {
                code: "INVALID_CREDENTIALS",
                message: "Invalid email or password".to_string(),
            },
            AuthError::UserExists => Self::Conflict {
                code: "USER_EXISTS",
                message: "User already exists".to_string(),
            },
            AuthError::NotFound { code, message } => Self::NotFound { code, message },
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Keeps the status and code of a not-found error but swaps its message.
    /// Other errors pass through unchanged.
    #[must_use]
    pub fn reword_not_found(self, message: &str) -> Self {
        match self {
            Self::NotFound { code, .. } => Self::NotFound {
                code,
                message: message.to_string(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_keep_their_codes() {
        let err = ApiError::from(CatalogError::Conflict {
            code: "SEASON_EXISTS",
            message: "Season already exists".to_string(),
        });
        assert!(matches!(err, ApiError::Conflict { code: "SEASON_EXISTS", .. }));

        let err = ApiError::from(CatalogError::Validation(vec!["Title is required".into()]));
        assert!(matches!(err, ApiError::Validation(ref e) if e.len() == 1));
    }

    #[test]
    fn test_conflicts_answer_409() {
        let response = ApiError::from(CatalogError::Conflict {
            code: "SEASON_EXISTS",
            message: "Season already exists".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::from(RatingError::Conflict {
            code: "RATING_EXISTS",
            message: "You have already rated this item".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = ApiError::internal("disk on fire").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_reword_not_found() {
        let err = ApiError::not_found("SERIES_NOT_FOUND", "Series with ID '3' not found")
            .reword_not_found("Series not found");
        assert!(
            matches!(err, ApiError::NotFound { code: "SERIES_NOT_FOUND", ref message } if message == "Series not found")
        );

        let err = ApiError::bad_request("nope").reword_not_found("Series not found");
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}

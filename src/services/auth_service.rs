//! Domain service for accounts, bearer tokens and favorites.
//!
//! Tokens are the per-user API keys stored with each account; they stay
//! valid until the key is regenerated.

use thiserror::Error;

use crate::models::media::Media;
use crate::models::user::User;
use crate::validation::Payload;

/// Errors specific to authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub(crate) fn user_not_found(id: i32) -> Self {
        Self::NotFound {
            code: "USER_NOT_FOUND",
            message: format!("User with ID '{id}' not found"),
        }
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular account. The returned user's API key is its token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserExists`] when the email or username is taken.
    async fn register(&self, payload: &Payload) -> Result<User, AuthError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, payload: &Payload) -> Result<User, AuthError>;

    /// Resolves a bearer token to its owner, if any.
    async fn authenticate(&self, token: &str) -> Result<Option<User>, AuthError>;

    async fn get_user(&self, id: i32) -> Result<User, AuthError>;

    /// Applies a partial change of email, username or password.
    async fn update_profile(&self, id: i32, payload: &Payload) -> Result<User, AuthError>;

    /// Adds a media record to the user's favorites. Adding twice is a no-op.
    async fn add_favorite(&self, user_id: i32, media_id: i32) -> Result<User, AuthError>;

    async fn remove_favorite(&self, user_id: i32, media_id: i32) -> Result<User, AuthError>;

    /// Full media records of every favorite, in the order they were added.
    async fn favorite_media(&self, user_id: i32) -> Result<Vec<Media>, AuthError>;
}

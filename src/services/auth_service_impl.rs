//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::config::SecurityConfig;
use crate::db::{Store, is_unique_violation};
use crate::domain::Role;
use crate::models::media::Media;
use crate::models::user::{ProfileUpdate, User};
use crate::services::auth_service::{AuthError, AuthService};
use crate::validation::payload::{as_text, provided};
use crate::validation::{Payload, validate_login, validate_profile_update, validate_registration};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn text(payload: &Payload, key: &str) -> Option<String> {
    provided(payload, key).and_then(as_text).map(str::to_string)
}

fn exists_on_duplicate(err: anyhow::Error) -> AuthError {
    if is_unique_violation(&err) {
        AuthError::UserExists
    } else {
        AuthError::from(err)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, payload: &Payload) -> Result<User, AuthError> {
        validate_registration(payload)
            .into_result()
            .map_err(AuthError::Validation)?;

        let email = text(payload, "email").unwrap_or_default();
        let username = text(payload, "username").unwrap_or_default();
        let password = text(payload, "password").unwrap_or_default();

        if self
            .store
            .user_identity_taken(Some(&email), Some(&username), None)
            .await?
        {
            return Err(AuthError::UserExists);
        }

        self.store
            .create_user(&email, &username, &password, Role::User, &self.security)
            .await
            .map_err(exists_on_duplicate)
    }

    async fn login(&self, payload: &Payload) -> Result<User, AuthError> {
        validate_login(payload)
            .into_result()
            .map_err(AuthError::Validation)?;

        let email = text(payload, "email").unwrap_or_default();
        let password = text(payload, "password").unwrap_or_default();

        self.store
            .verify_credentials(&email, &password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn authenticate(&self, token: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.verify_api_key(token).await?)
    }

    async fn get_user(&self, id: i32) -> Result<User, AuthError> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AuthError::user_not_found(id))
    }

    async fn update_profile(&self, id: i32, payload: &Payload) -> Result<User, AuthError> {
        validate_profile_update(payload)
            .into_result()
            .map_err(AuthError::Validation)?;

        let update = ProfileUpdate {
            email: text(payload, "email"),
            username: text(payload, "username"),
            password: text(payload, "password"),
        };

        if self
            .store
            .user_identity_taken(update.email.as_deref(), update.username.as_deref(), Some(id))
            .await?
        {
            return Err(AuthError::UserExists);
        }

        self.store
            .update_user_profile(id, update, &self.security)
            .await
            .map_err(exists_on_duplicate)?
            .ok_or_else(|| AuthError::user_not_found(id))
    }

    async fn add_favorite(&self, user_id: i32, media_id: i32) -> Result<User, AuthError> {
        if self.store.get_media(media_id).await?.is_none() {
            return Err(AuthError::NotFound {
                code: "MEDIA_NOT_FOUND",
                message: format!("Media with ID '{media_id}' not found"),
            });
        }

        // Already a favorite.
        if let Err(e) = self.store.add_favorite(user_id, media_id).await
            && !is_unique_violation(&e)
        {
            return Err(e.into());
        }

        self.get_user(user_id).await
    }

    async fn remove_favorite(&self, user_id: i32, media_id: i32) -> Result<User, AuthError> {
        if !self.store.remove_favorite(user_id, media_id).await? {
            return Err(AuthError::NotFound {
                code: "FAVORITE_NOT_FOUND",
                message: format!("Media with ID '{media_id}' is not a favorite"),
            });
        }

        self.get_user(user_id).await
    }

    async fn favorite_media(&self, user_id: i32) -> Result<Vec<Media>, AuthError> {
        let user = self.get_user(user_id).await?;
        Ok(self.store.media_by_ids(&user.favorites).await?)
    }
}

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::Role;
use crate::entities::{favorites, prelude::*, users};
use crate::models::user::{ProfileUpdate, User};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn hydrate(&self, model: users::Model) -> Result<User> {
        let favorites = self.list_favorites(model.id).await?;
        Ok(User {
            id: model.id,
            email: model.email,
            username: model.username,
            role: model.role.parse().unwrap_or_default(),
            api_key: model.api_key,
            favorites,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn hydrate_opt(&self, model: Option<users::Model>) -> Result<Option<User>> {
        match model {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    /// Creates an account with a freshly generated API key.
    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User> {
        let password = password.to_string();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();
        let active = users::ActiveModel {
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
            api_key: Set(generate_api_key()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        self.hydrate(model).await
    }

    /// True when another account already uses `email` or `username`.
    pub async fn identity_taken(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        except_id: Option<i32>,
    ) -> Result<bool> {
        let mut any = Condition::any();
        if let Some(email) = email {
            any = any.add(users::Column::Email.eq(email));
        }
        if let Some(username) = username {
            any = any.add(users::Column::Username.eq(username));
        }
        if email.is_none() && username.is_none() {
            return Ok(false);
        }

        let mut query = Users::find().filter(any);
        if let Some(id) = except_id {
            query = query.filter(users::Column::Id.ne(id));
        }

        Ok(query.count(&self.conn).await? > 0)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        self.hydrate_opt(user).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        self.hydrate_opt(user).await
    }

    /// Checks `password` against the stored hash of the account registered
    /// under `email`. Returns the user only on a match.
    /// Argon2 verification is CPU-heavy, so it runs on the blocking pool.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        if is_valid {
            Ok(Some(self.hydrate(user).await?))
        } else {
            Ok(None)
        }
    }

    /// Resolves a bearer token or API key to its owner.
    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        self.hydrate_opt(user).await
    }

    pub async fn update_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(username) = update.username {
            active.username = Set(username);
        }
        if let Some(password) = update.password {
            let security = security.clone();
            let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
                .await
                .context("Password hashing task panicked")??;
            active.password_hash = Set(new_hash);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn set_role(&self, username: &str, role: Role) -> Result<Option<User>> {
        let Some(user) = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn regenerate_api_key(&self, id: i32) -> Result<String> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for API key regeneration")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let new_api_key = generate_api_key();

        let mut active: users::ActiveModel = user.into();
        active.api_key = Set(new_api_key.clone());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(new_api_key)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let models = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(self.hydrate(model).await?);
        }
        Ok(out)
    }

    pub async fn list_favorites(&self, user_id: i32) -> Result<Vec<i32>> {
        let ids: Vec<i32> = Favorites::find()
            .select_only()
            .column(favorites::Column::MediaId)
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_asc(favorites::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to list favorites")?;

        Ok(ids)
    }

    /// Adds `media_id` to the user's favorites. Returns false if it was already there.
    pub async fn add_favorite(&self, user_id: i32, media_id: i32) -> Result<bool> {
        let exists = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MediaId.eq(media_id))
            .count(&self.conn)
            .await?
            > 0;
        if exists {
            return Ok(false);
        }

        favorites::ActiveModel {
            user_id: Set(user_id),
            media_id: Set(media_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert favorite")?;

        Ok(true)
    }

    pub async fn remove_favorite(&self, user_id: i32, media_id: i32) -> Result<bool> {
        let result = Favorites::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MediaId.eq(media_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

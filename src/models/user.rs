use serde::Serialize;

use crate::domain::Role;

/// Account data safe to hand to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub role: Role,
    #[serde(skip)]
    pub api_key: String,
    pub favorites: Vec<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

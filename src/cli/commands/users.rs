//! Account maintenance commands

use crate::config::Config;
use crate::db::Store;
use crate::domain::Role;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;
    let users = store.user_repo().list().await?;

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<60}", "");

    for user in users {
        println!("[{}] {} <{}>", user.id, user.username, user.email);
        println!(
            "    Role: {} | Favorites: {} | Since: {}",
            user.role,
            user.favorites.len(),
            user.created_at
        );
    }

    Ok(())
}

pub async fn cmd_promote_user(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    match store.user_repo().set_role(username, Role::Admin).await? {
        Some(user) => println!("✓ {} is now an admin", user.username),
        None => println!("No user named '{username}'"),
    }

    Ok(())
}

pub async fn cmd_rotate_key(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;
    let repo = store.user_repo();

    let Some(user) = repo.get_by_username(username).await? else {
        println!("No user named '{username}'");
        return Ok(());
    };

    let key = repo.regenerate_api_key(user.id).await?;
    println!("✓ New API key for {}: {key}", user.username);
    println!("  The previous key no longer works.");

    Ok(())
}

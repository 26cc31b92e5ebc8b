use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::user::User;

/// The authenticated caller, inserted into request extensions by
/// [`require_user`] and [`require_admin`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Rejects requests without a valid bearer token or `X-Api-Key`.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Like [`require_user`], and additionally requires the admin role.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    if !user.is_admin() {
        tracing::warn!(user_id = user.id, "Admin route refused");
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()));
    }
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let Some(token) = extract_token(headers) else {
        return Err(ApiError::Unauthorized {
            code: "NO_TOKEN",
            message: "Access denied. No token provided.".to_string(),
        });
    };

    let user = state
        .auth()
        .authenticate(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized {
            code: "INVALID_TOKEN",
            message: "Invalid token.".to_string(),
        })?;

    tracing::Span::current().record("user_id", user.id);
    Ok(user)
}

/// Token from `Authorization: Bearer <token>`, falling back to `X-Api-Key`.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && !token.trim().is_empty()
    {
        return Some(token.trim().to_string());
    }

    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
        && !key_str.is_empty()
    {
        return Some(key_str.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert("X-Api-Key", HeaderValue::from_static("key-1"));
        assert_eq!(extract_token(&headers).as_deref(), Some("key-1"));

        headers.insert("Authorization", HeaderValue::from_static("Bearer tok-2"));
        assert_eq!(extract_token(&headers).as_deref(), Some("tok-2"));

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&headers), None);
    }
}

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{auth, models::Profile, AppError, AppState};

/// Reads the bearer token off the Authorization header.
fn bearer_token(parts: &Parts) -> Option<String> {
    let auth_header = parts.headers.get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(|t| t.to_string())
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Unauthorized("Missing Authorization bearer token".to_string())
        })?;

        authenticate(&token, state).await
    }
}

/// Routes open to both signed-in and anonymous callers take
/// `Option<AuthenticatedUser>`: a missing header means anonymous, but a
/// present-and-invalid token is still rejected.
impl OptionalFromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => authenticate(&token, state).await.map(Some),
            None => Ok(None),
        }
    }
}

async fn authenticate(token: &str, state: &Arc<AppState>) -> Result<AuthenticatedUser, AppError> {
    let claims =
        auth::validate_token(token, &state.config.auth_jwt_secret).map_err(AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        AppError::Unauthorized("Subject claim is not a valid user id".to_string())
    })?;

    let profile = load_profile(state, user_id).await?;

    Ok(AuthenticatedUser {
        user_id,
        username: profile.username,
        is_admin: profile.is_admin,
    })
}

/// Profile rows change rarely; the cache TTL bounds admin-flag staleness.
async fn load_profile(state: &Arc<AppState>, user_id: Uuid) -> Result<Profile, AppError> {
    if let Some(profile) = state.profile_cache.get(&user_id).await {
        tracing::debug!(%user_id, "profile resolved from cache");
        return Ok(profile);
    }

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            tracing::warn!(%user_id, "token subject has no profile row");
            AppError::Unauthorized(format!("No profile registered for user {}", user_id))
        })?;

    state.profile_cache.insert(user_id, profile.clone()).await;

    Ok(profile)
}

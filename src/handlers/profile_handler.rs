use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedUser,
    models::{Profile, ProfileStats},
    streak, AppResult, AppState,
};

/// GET /api/profile/me
#[utoipa::path(
    get,
    path = "/api/profile/me",
    responses(
        (status = 200, description = "The caller's profile projection", body = Profile),
        (status = 401, description = "Not signed in")
    ),
    tag = "profile",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(auth.user_id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(profile))
}

/// GET /api/profile/stats
#[utoipa::path(
    get,
    path = "/api/profile/stats",
    responses(
        (status = 200, description = "Written/published totals and the current streak", body = ProfileStats),
        (status = 401, description = "Not signed in")
    ),
    tag = "profile",
    security(("bearer_auth" = []))
)]
pub async fn get_my_stats(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<ProfileStats>> {
    let (written, published): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COUNT(*) FILTER (WHERE visibility = 'public')
        FROM submissions
        WHERE author_id = $1
        "#,
    )
    .bind(auth.user_id)
    .fetch_one(&state.db)
    .await?;

    let as_of = state.config.today();
    let streak_days = streak::current_streak(&state.db, auth.user_id, as_of).await?;

    Ok(Json(ProfileStats {
        written,
        published,
        streak_days,
        as_of,
    }))
}

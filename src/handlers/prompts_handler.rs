use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use moka::future::Cache;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    config::ConflictPolicy,
    extractors::AuthenticatedUser,
    models::{
        ApprovePromptInput, CandidatesResponse, GenerateCandidatesInput, PromptInstance,
        TodayPromptResponse,
    },
    AppError, AppResult, AppState,
};

// Calendar lookups are read-heavy; cache per date with a short TTL and
// invalidate on approval. The reciprocity gate is never cached.
static PROMPT_CACHE: Lazy<Cache<NaiveDate, Option<PromptInstance>>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .max_capacity(64)
        .build()
});

async fn invalidate_prompt_cache(date: NaiveDate) {
    PROMPT_CACHE.invalidate(&date).await;
}

/// Approved prompt for a date, if any. Shared by the feed and submission
/// paths; negative lookups are cached too.
pub async fn prompt_for_date(
    db: &sqlx::PgPool,
    date: NaiveDate,
) -> Result<Option<PromptInstance>, sqlx::Error> {
    if let Some(cached) = PROMPT_CACHE.get(&date).await {
        return Ok(cached);
    }

    let prompt =
        sqlx::query_as::<_, PromptInstance>("SELECT * FROM prompts WHERE date = $1 AND approved")
            .bind(date)
            .fetch_optional(db)
            .await?;

    PROMPT_CACHE.insert(date, prompt.clone()).await;

    Ok(prompt)
}

/// Approval preconditions: non-blank text, date not in the past. Returns the
/// trimmed text that gets stored.
fn validate_approval(text: &str, date: NaiveDate, today: NaiveDate) -> Result<String, AppError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(AppError::Validation(
            "Prompt text must not be empty".to_string(),
        ));
    }

    if date < today {
        return Err(AppError::Validation(format!(
            "Cannot approve a prompt for {}: the date is in the past",
            date
        )));
    }

    Ok(text.to_string())
}

/// Future prompts are curation material, same posture as the upcoming
/// listing: public reads see a date only once it has arrived in the service
/// zone. Admins see ahead.
pub fn date_is_visible(date: NaiveDate, today: NaiveDate, is_admin: bool) -> bool {
    date <= today || is_admin
}

/// POST /api/prompts/candidates
#[utoipa::path(
    post,
    path = "/api/prompts/candidates",
    request_body = GenerateCandidatesInput,
    responses(
        (status = 200, description = "Parsed candidates; may be empty when the generator's reply matched no numbered line", body = CandidatesResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 502, description = "Generator call failed")
    ),
    tag = "prompts",
    security(("bearer_auth" = []))
)]
pub async fn generate_candidates(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<GenerateCandidatesInput>,
) -> AppResult<Json<CandidatesResponse>> {
    if !auth.is_admin {
        return Err(AppError::Forbidden(
            "Prompt curation requires the admin capability".to_string(),
        ));
    }

    let context = input.context.as_deref().unwrap_or("");
    let raw = state.generator.generate(input.category, context).await?;
    let candidates = crate::generator::parse_candidates(&raw);

    if candidates.is_empty() {
        tracing::warn!(category = %input.category, "generator reply contained no numbered candidates");
    }

    Ok(Json(CandidatesResponse { candidates }))
}

/// POST /api/prompts
#[utoipa::path(
    post,
    path = "/api/prompts",
    request_body = ApprovePromptInput,
    responses(
        (status = 200, description = "Approved prompt for the date", body = PromptInstance),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "A prompt already exists for the date (reject policy)"),
        (status = 422, description = "Blank text or past date")
    ),
    tag = "prompts",
    security(("bearer_auth" = []))
)]
pub async fn approve_prompt(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<ApprovePromptInput>,
) -> AppResult<Json<PromptInstance>> {
    if !auth.is_admin {
        return Err(AppError::Forbidden(
            "Prompt curation requires the admin capability".to_string(),
        ));
    }

    let text = validate_approval(&input.text, input.date, state.config.today())?;

    let prompt = match state.config.approval_conflict_policy {
        ConflictPolicy::Replace => {
            sqlx::query_as::<_, PromptInstance>(
                r#"
                INSERT INTO prompts (id, date, text, category, approved)
                VALUES ($1, $2, $3, $4, TRUE)
                ON CONFLICT (date) DO UPDATE
                SET text = EXCLUDED.text,
                    category = EXCLUDED.category,
                    approved = TRUE,
                    created_at = now()
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(input.date)
            .bind(&text)
            .bind(input.category)
            .fetch_one(&state.db)
            .await?
        }
        ConflictPolicy::Reject => sqlx::query_as::<_, PromptInstance>(
            r#"
            INSERT INTO prompts (id, date, text, category, approved)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.date)
        .bind(&text)
        .bind(input.category)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("A prompt is already approved for {}", input.date))
        })?,
    };

    invalidate_prompt_cache(input.date).await;

    tracing::info!(date = %prompt.date, category = %prompt.category, "prompt approved");

    Ok(Json(prompt))
}

/// GET /api/prompts/today
#[utoipa::path(
    get,
    path = "/api/prompts/today",
    responses(
        (status = 200, description = "Today's slot; prompt is null when none is approved yet", body = TodayPromptResponse)
    ),
    tag = "prompts"
)]
pub async fn get_today_prompt(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<TodayPromptResponse>> {
    let date = state.config.today();
    let prompt = prompt_for_date(&state.db, date).await?;

    Ok(Json(TodayPromptResponse { date, prompt }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UpcomingQuery {
    pub from: Option<String>,
}

/// GET /api/prompts/upcoming?from=
#[utoipa::path(
    get,
    path = "/api/prompts/upcoming",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Approved prompts from the date onward, ascending", body = Vec<PromptInstance>),
        (status = 400, description = "Invalid date format"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "prompts",
    security(("bearer_auth" = []))
)]
pub async fn get_upcoming_prompts(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<Json<Vec<PromptInstance>>> {
    if !auth.is_admin {
        return Err(AppError::Forbidden(
            "The upcoming calendar is admin-only".to_string(),
        ));
    }

    let from = match query.from {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| AppError::BadRequest(format!("Invalid date format: {}", e)))?,
        None => state.config.today(),
    };

    let prompts = sqlx::query_as::<_, PromptInstance>(
        "SELECT * FROM prompts WHERE approved AND date >= $1 ORDER BY date ASC",
    )
    .bind(from)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(prompts))
}

/// GET /api/prompts/{date}
#[utoipa::path(
    get,
    path = "/api/prompts/{date}",
    params(
        ("date" = NaiveDate, Path, description = "Calendar date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Approved prompt for the date", body = PromptInstance),
        (status = 404, description = "No approved prompt for the date; dates after today answer the same unless the caller is an admin")
    ),
    tag = "prompts"
)]
pub async fn get_prompt_by_date(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthenticatedUser>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<PromptInstance>> {
    let is_admin = viewer.as_ref().map(|u| u.is_admin).unwrap_or(false);

    // Same message as a missing prompt: a future date reveals nothing
    if !date_is_visible(date, state.config.today(), is_admin) {
        return Err(AppError::NotFound(format!(
            "No approved prompt for {}",
            date
        )));
    }

    let prompt = prompt_for_date(&state.db, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No approved prompt for {}", date)))?;

    Ok(Json(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_approval_trims_the_stored_text() {
        let today = date(2025, 6, 10);
        let text = validate_approval("  Write about a lost object  ", today, today).unwrap();
        assert_eq!(text, "Write about a lost object");
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let today = date(2025, 6, 10);
        assert!(validate_approval("   ", today, today).is_err());
    }

    #[test]
    fn test_past_date_is_rejected_today_and_future_pass() {
        let today = date(2025, 6, 10);
        assert!(validate_approval("x", date(2025, 6, 9), today).is_err());
        assert!(validate_approval("x", today, today).is_ok());
        assert!(validate_approval("x", date(2025, 6, 11), today).is_ok());
    }

    #[test]
    fn test_future_dates_are_hidden_from_public_reads() {
        let today = date(2025, 6, 10);
        assert!(date_is_visible(date(2025, 6, 9), today, false));
        assert!(date_is_visible(today, today, false));
        assert!(!date_is_visible(date(2025, 6, 11), today, false));
    }

    #[test]
    fn test_admins_see_future_dates() {
        let today = date(2025, 6, 10);
        assert!(date_is_visible(date(2025, 6, 11), today, true));
    }

    // Requires a live database; run with `cargo test -- --ignored` against a
    // migrated DATABASE_URL.
    #[tokio::test]
    #[ignore]
    async fn test_both_conflict_policies_against_an_occupied_date() {
        use crate::models::Category;

        let url = std::env::var("DATABASE_URL").unwrap();
        let db = sqlx::PgPool::connect(&url).await.unwrap();

        let occupied = date(2099, 1, 15);

        let upsert = r#"
            INSERT INTO prompts (id, date, text, category, approved)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (date) DO UPDATE
            SET text = EXCLUDED.text,
                category = EXCLUDED.category,
                approved = TRUE,
                created_at = now()
            RETURNING *
        "#;

        let first = sqlx::query_as::<_, PromptInstance>(upsert)
            .bind(Uuid::new_v4())
            .bind(occupied)
            .bind("Write about a lost object")
            .bind(Category::Object)
            .fetch_one(&db)
            .await
            .unwrap();

        // Replace policy: the later approval wins, updating the row in place
        let second = sqlx::query_as::<_, PromptInstance>(upsert)
            .bind(Uuid::new_v4())
            .bind(occupied)
            .bind("Describe a childhood kitchen")
            .bind(Category::Place)
            .fetch_one(&db)
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.text, "Describe a childhood kitchen");

        // Reject policy: DO NOTHING yields no row for an occupied date
        let rejected = sqlx::query_as::<_, PromptInstance>(
            r#"
            INSERT INTO prompts (id, date, text, category, approved)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(occupied)
        .bind("A third text")
        .bind(Category::Memory)
        .fetch_optional(&db)
        .await
        .unwrap();

        assert!(rejected.is_none());
    }
}

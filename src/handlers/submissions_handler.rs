use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::AuthenticatedUser,
    gate,
    models::{CreateSubmissionInput, Submission, SubmissionDetail, Visibility},
    AppError, AppResult, AppState,
};

fn validate_content(raw: &str) -> Result<(), AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Blank titles are stored as absent.
fn normalize_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Tags arrive user-typed: trim each, drop empties, keep order. An empty
/// list is stored as absent.
fn normalize_tags(tags: Option<Vec<String>>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = tags?
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

async fn insert_submission<'e, E>(
    db: E,
    author_id: Option<Uuid>,
    prompt_date: NaiveDate,
    content: &str,
    title: Option<&str>,
    tags: Option<&[String]>,
    visibility: Visibility,
) -> Result<Submission, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Submission>(
        r#"
        INSERT INTO submissions (id, author_id, prompt_date, content, title, tags, visibility)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(prompt_date)
    .bind(content)
    .bind(title)
    .bind(tags)
    .bind(visibility)
    .fetch_one(db)
    .await
}

/// POST /api/submissions
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionInput,
    responses(
        (status = 200, description = "Recorded submission", body = Submission),
        (status = 404, description = "No prompt is approved for today"),
        (status = 409, description = "Author already submitted today and the deployment allows one per day"),
        (status = 422, description = "Content is blank")
    ),
    tag = "submissions",
    security(("bearer_auth" = []))
)]
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthenticatedUser>,
    Json(input): Json<CreateSubmissionInput>,
) -> AppResult<Json<Submission>> {
    validate_content(&input.content)?;

    let today = state.config.today();
    let prompt = crate::handlers::prompts_handler::prompt_for_date(&state.db, today)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No prompt is scheduled for {}", today)))?;

    let author_id = viewer.as_ref().map(|u| u.user_id);
    let title = normalize_title(input.title);
    let tags = normalize_tags(input.tags);

    // One per day when the deployment says so. Anonymous submissions carry
    // no identity to deduplicate on and are always accepted. The duplicate
    // check and the insert share a transaction that holds an advisory lock
    // on (author, date); racing posts for the same key serialize there.
    let submission = match (state.config.allow_multiple_per_day, author_id) {
        (false, Some(author)) => {
            let mut tx = state.db.begin().await?;

            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
                .bind(author.to_string())
                .bind(prompt.date.to_string())
                .execute(&mut *tx)
                .await?;

            if gate::is_unlocked(&mut *tx, author, prompt.date).await? {
                return Err(AppError::Conflict(format!(
                    "A submission for {} already exists",
                    prompt.date
                )));
            }

            let submission = insert_submission(
                &mut *tx,
                author_id,
                prompt.date,
                &input.content,
                title.as_deref(),
                tags.as_deref(),
                input.visibility,
            )
            .await?;

            tx.commit().await?;
            submission
        }
        _ => {
            insert_submission(
                &state.db,
                author_id,
                prompt.date,
                &input.content,
                title.as_deref(),
                tags.as_deref(),
                input.visibility,
            )
            .await?
        }
    };

    tracing::info!(
        submission_id = %submission.id,
        prompt_date = %submission.prompt_date,
        visibility = %submission.visibility,
        anonymous = author_id.is_none(),
        "submission recorded"
    );

    Ok(Json(submission))
}

/// GET /api/submissions/mine
#[utoipa::path(
    get,
    path = "/api/submissions/mine",
    responses(
        (status = 200, description = "The caller's submissions, most recent first", body = Vec<Submission>),
        (status = 401, description = "Not signed in")
    ),
    tag = "submissions",
    security(("bearer_auth" = []))
)]
pub async fn get_my_submissions(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<Submission>>> {
    let submissions = sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions WHERE author_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(submissions))
}

/// GET /api/submissions/{id}
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(
        ("id" = Uuid, Path, description = "Submission id")
    ),
    responses(
        (status = 200, description = "Submission with author name and prompt text", body = SubmissionDetail),
        (status = 403, description = "Public submission, viewer not unlocked for its date"),
        (status = 404, description = "Unknown id, or a private submission of someone else")
    ),
    tag = "submissions",
    security(("bearer_auth" = []))
)]
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionDetail>> {
    let detail = sqlx::query_as::<_, SubmissionDetail>(
        r#"
        SELECT
            s.id,
            s.author_id,
            p.username AS author_name,
            s.prompt_date,
            pr.text AS prompt_text,
            s.content,
            s.title,
            s.tags,
            s.visibility,
            s.created_at
        FROM submissions s
        LEFT JOIN profiles p ON s.author_id = p.id
        LEFT JOIN prompts pr ON s.prompt_date = pr.date AND pr.approved
        WHERE s.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", id)))?;

    let viewer_id = viewer.as_ref().map(|u| u.user_id);
    let is_author = viewer_id.is_some() && viewer_id == detail.author_id;

    // Private texts belong to their author alone; do not reveal existence
    if detail.visibility == Visibility::Private && !is_author {
        return Err(AppError::NotFound(format!("Submission {} not found", id)));
    }

    if !is_author {
        let unlocked = match viewer_id {
            Some(v) => gate::is_unlocked(&state.db, v, detail.prompt_date).await?,
            None => false,
        };
        if !unlocked {
            return Err(AppError::Forbidden(
                "Write your own text for this prompt before reading others".to_string(),
            ));
        }
    }

    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_content_is_rejected() {
        assert!(validate_content("   \n\t ").is_err());
        assert!(validate_content("one line").is_ok());
    }

    #[test]
    fn test_titles_are_trimmed_or_dropped() {
        assert_eq!(
            normalize_title(Some("  La cocina  ".to_string())),
            Some("La cocina".to_string())
        );
        assert_eq!(normalize_title(Some("   ".to_string())), None);
        assert_eq!(normalize_title(None), None);
    }

    #[test]
    fn test_tags_are_cleaned() {
        let tags = Some(vec![
            " memoria ".to_string(),
            "".to_string(),
            "infancia".to_string(),
        ]);
        assert_eq!(
            normalize_tags(tags),
            Some(vec!["memoria".to_string(), "infancia".to_string()])
        );
        assert_eq!(normalize_tags(Some(vec!["  ".to_string()])), None);
        assert_eq!(normalize_tags(None), None);
    }

    // Requires a live database; run with `cargo test -- --ignored` against a
    // migrated DATABASE_URL.
    #[tokio::test]
    #[ignore]
    async fn test_duplicate_guard_lock_is_exclusive_per_author_and_date() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let db = sqlx::PgPool::connect(&url).await.unwrap();

        let author = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2099, 2, 20).unwrap();

        let mut holder = db.begin().await.unwrap();
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
            .bind(author.to_string())
            .bind(date.to_string())
            .execute(&mut *holder)
            .await
            .unwrap();

        // A second writer contends on the same (author, date) key until the
        // first transaction ends; another date does not.
        let mut contender = db.begin().await.unwrap();
        let (same_key,): (bool,) =
            sqlx::query_as("SELECT pg_try_advisory_xact_lock(hashtext($1), hashtext($2))")
                .bind(author.to_string())
                .bind(date.to_string())
                .fetch_one(&mut *contender)
                .await
                .unwrap();
        assert!(!same_key);

        let (next_day,): (bool,) =
            sqlx::query_as("SELECT pg_try_advisory_xact_lock(hashtext($1), hashtext($2))")
                .bind(author.to_string())
                .bind(date.succ_opt().unwrap().to_string())
                .fetch_one(&mut *contender)
                .await
                .unwrap();
        assert!(next_day);

        contender.rollback().await.unwrap();
        holder.rollback().await.unwrap();
    }
}

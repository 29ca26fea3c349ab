use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    extractors::AuthenticatedUser,
    gate,
    models::{FeedItem, FeedResponse, FeedState, PromptInstance, SortMode},
    AppError, AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedQuery {
    /// Defaults to today in the service zone.
    pub date: Option<String>,
    /// recent | brief | popular; defaults to recent.
    pub sort: Option<SortMode>,
}

/// Whitespace-delimited token count; blank content counts zero.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn apply_sort(items: &mut [FeedItem], sort: SortMode) {
    match sort {
        // Rows already arrive most-recent-first from the ledger
        SortMode::Recent => {}
        SortMode::Brief => items.sort_by_key(|item| item.word_count),
        // No persisted popularity metric; keeps the recent ordering
        SortMode::Popular => {}
    }
}

/// Pure assembly of the three-state feed. A missing prompt is its own state,
/// not "locked"; locked viewers keep the prompt and the aggregate count but
/// no submission bodies.
fn assemble(
    date: NaiveDate,
    prompt: Option<PromptInstance>,
    unlocked: bool,
    response_count: i64,
    mut items: Vec<FeedItem>,
    sort: SortMode,
) -> FeedResponse {
    let Some(prompt) = prompt else {
        return FeedResponse {
            date,
            state: FeedState::NoPrompt,
            prompt: None,
            response_count: 0,
            submissions: Vec::new(),
        };
    };

    if !unlocked {
        return FeedResponse {
            date,
            state: FeedState::Locked,
            prompt: Some(prompt),
            response_count,
            submissions: Vec::new(),
        };
    }

    apply_sort(&mut items, sort);

    FeedResponse {
        date,
        state: FeedState::Open,
        prompt: Some(prompt),
        response_count,
        submissions: items,
    }
}

async fn public_submissions(
    db: &sqlx::PgPool,
    date: NaiveDate,
) -> Result<Vec<FeedItem>, sqlx::Error> {
    type Row = (
        Uuid,
        Option<String>,
        Option<String>,
        String,
        Option<Vec<String>>,
        DateTime<Utc>,
    );

    let rows: Vec<Row> = sqlx::query_as(
        r#"
        SELECT s.id, p.username, s.title, s.content, s.tags, s.created_at
        FROM submissions s
        LEFT JOIN profiles p ON s.author_id = p.id
        WHERE s.prompt_date = $1 AND s.visibility = 'public'
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(date)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, author_name, title, content, tags, created_at)| {
            let word_count = word_count(&content);
            FeedItem {
                id,
                author_name,
                title,
                content,
                tags,
                word_count,
                created_at,
            }
        })
        .collect())
}

async fn count_public_submissions(
    db: &sqlx::PgPool,
    date: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM submissions WHERE prompt_date = $1 AND visibility = 'public'",
    )
    .bind(date)
    .fetch_one(db)
    .await?;

    Ok(count)
}

/// GET /api/feed?date=&sort=
#[utoipa::path(
    get,
    path = "/api/feed",
    params(FeedQuery),
    responses(
        (status = 200, description = "Feed for the date: no_prompt, locked (aggregate count only) or open with ordered public submissions", body = FeedResponse),
        (status = 400, description = "Invalid date format")
    ),
    tag = "feed",
    security(("bearer_auth" = []))
)]
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthenticatedUser>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<FeedResponse>> {
    let today = state.config.today();
    let date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| AppError::BadRequest(format!("Invalid date format: {}", e)))?,
        None => today,
    };
    let sort = query.sort.unwrap_or_default();

    // Future dates read as empty for non-admins; even the locked state
    // carries the prompt text, which stays unseen until its day
    let is_admin = viewer.as_ref().map(|u| u.is_admin).unwrap_or(false);
    let prompt = if crate::handlers::prompts_handler::date_is_visible(date, today, is_admin) {
        crate::handlers::prompts_handler::prompt_for_date(&state.db, date).await?
    } else {
        None
    };

    if prompt.is_none() {
        return Ok(Json(assemble(date, None, false, 0, Vec::new(), sort)));
    }

    let response_count = count_public_submissions(&state.db, date).await?;

    let unlocked = match viewer.as_ref() {
        Some(user) => gate::is_unlocked(&state.db, user.user_id, date).await?,
        None => false,
    };

    let items = if unlocked {
        public_submissions(&state.db, date).await?
    } else {
        Vec::new()
    };

    Ok(Json(assemble(
        date,
        prompt,
        unlocked,
        response_count,
        items,
        sort,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prompt_for(d: NaiveDate) -> PromptInstance {
        PromptInstance {
            id: Uuid::new_v4(),
            date: d,
            text: "Write about a lost object".to_string(),
            category: Category::Object,
            approved: true,
            created_at: Utc::now(),
        }
    }

    fn item(content: &str, minutes_ago: i64) -> FeedItem {
        FeedItem {
            id: Uuid::new_v4(),
            author_name: Some("ana".to_string()),
            title: None,
            content: content.to_string(),
            tags: None,
            word_count: word_count(content),
            created_at: Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
                - chrono::Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_word_count_splits_on_whitespace() {
        assert_eq!(word_count("  three  little words \n"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_missing_prompt_is_its_own_state() {
        let feed = assemble(
            date(2025, 6, 10),
            None,
            false,
            0,
            Vec::new(),
            SortMode::Recent,
        );
        assert_eq!(feed.state, FeedState::NoPrompt);
        assert!(feed.prompt.is_none());
        assert_eq!(feed.response_count, 0);
        assert!(feed.submissions.is_empty());
    }

    #[test]
    fn test_locked_keeps_prompt_and_count_but_hides_items() {
        let d = date(2025, 6, 10);
        let items = vec![item("hidden text", 1)];

        let feed = assemble(d, Some(prompt_for(d)), false, 4, items, SortMode::Recent);

        assert_eq!(feed.state, FeedState::Locked);
        assert!(feed.prompt.is_some());
        assert_eq!(feed.response_count, 4);
        assert!(feed.submissions.is_empty());
    }

    #[test]
    fn test_open_recent_keeps_ledger_order() {
        let d = date(2025, 6, 10);
        let items = vec![item("newest entry here", 1), item("older entry", 30)];

        let feed = assemble(d, Some(prompt_for(d)), true, 2, items, SortMode::Recent);

        assert_eq!(feed.state, FeedState::Open);
        assert_eq!(feed.submissions[0].content, "newest entry here");
        assert!(feed.submissions[0].created_at >= feed.submissions[1].created_at);
    }

    #[test]
    fn test_brief_orders_by_word_count_ascending() {
        let d = date(2025, 6, 10);
        let items = vec![
            item("five words of rambling prose", 1),
            item("two words", 2),
            item("one", 3),
        ];

        let feed = assemble(d, Some(prompt_for(d)), true, 3, items, SortMode::Brief);

        let counts: Vec<usize> = feed.submissions.iter().map(|i| i.word_count).collect();
        assert_eq!(counts, vec![1, 2, 5]);
    }

    #[test]
    fn test_popular_falls_back_to_recent_order() {
        let d = date(2025, 6, 10);
        let items = vec![item("first", 1), item("second", 2)];
        let expected: Vec<Uuid> = items.iter().map(|i| i.id).collect();

        let feed = assemble(d, Some(prompt_for(d)), true, 2, items, SortMode::Popular);

        let got: Vec<Uuid> = feed.submissions.iter().map(|i| i.id).collect();
        assert_eq!(got, expected);
    }
}

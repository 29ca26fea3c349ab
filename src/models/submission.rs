use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "submission_visibility", rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable entry in the submission ledger. `author_id` is null for
/// anonymous submissions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub prompt_date: NaiveDate,
    pub content: String,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

/// Single-submission read, joined with the author's display name and the
/// day's prompt text for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubmissionDetail {
    pub id: Uuid,
    #[serde(skip)]
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub prompt_date: NaiveDate,
    pub prompt_text: Option<String>,
    pub content: String,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

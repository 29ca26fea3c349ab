use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::prompt::PromptInstance;

/// Feed ordering requested by the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Recent,
    Brief,
    /// No persisted popularity metric exists yet; orders like `recent`.
    Popular,
}

/// Whether the feed body is visible, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    /// No approved prompt exists for the date. Distinct from locked: there
    /// is nothing to show and nothing can be written.
    NoPrompt,
    /// A prompt exists but the viewer has not submitted for the date.
    Locked,
    Open,
}

/// One public submission as rendered in the feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedItem {
    pub id: Uuid,
    /// Null for anonymous submissions.
    pub author_name: Option<String>,
    pub title: Option<String>,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedResponse {
    pub date: NaiveDate,
    pub state: FeedState,
    pub prompt: Option<PromptInstance>,
    /// Aggregate count of public submissions for the date; visible even
    /// when the feed is locked.
    pub response_count: i64,
    /// Empty unless `state` is `open`.
    pub submissions: Vec<FeedItem>,
}

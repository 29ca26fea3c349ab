use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Closed set of prompt categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "prompt_category", rename_all = "lowercase")]
pub enum Category {
    Emotion,
    Place,
    Character,
    Object,
    Time,
    Memory,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Emotion => "emotion",
            Category::Place => "place",
            Category::Character => "character",
            Category::Object => "object",
            Category::Time => "time",
            Category::Memory => "memory",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single approved writing prompt bound to one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromptInstance {
    pub id: Uuid,
    pub date: NaiveDate,
    pub text: String,
    pub category: Category,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

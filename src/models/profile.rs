use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Local projection of the external identity provider. Rows are provisioned
/// by the identity system; this service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub bio: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Participation figures for the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileStats {
    /// Every submission ever recorded by the user.
    pub written: i64,
    /// Submissions with public visibility.
    pub published: i64,
    /// Consecutive days with at least one submission, ending at `as_of`.
    pub streak_days: u32,
    pub as_of: NaiveDate,
}

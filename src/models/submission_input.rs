use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::submission::Visibility;

/// Input for recording a submission against today's prompt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSubmissionInput {
    pub content: String,
    /// Blank titles are stored as absent.
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Visibility,
}

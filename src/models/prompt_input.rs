use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::prompt::{Category, PromptInstance};

/// Input for requesting prompt candidates from the generator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateCandidatesInput {
    pub category: Category,
    /// Free-text steering for the generator; may be empty or absent.
    pub context: Option<String>,
}

/// Candidate strings parsed out of the generator's reply. May legitimately
/// be empty when the reply matched no numbered-line pattern.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidatesResponse {
    pub candidates: Vec<String>,
}

/// Input for approving a prompt for a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApprovePromptInput {
    pub text: String,
    pub category: Category,
    pub date: NaiveDate,
}

/// Today's calendar slot; `prompt` is null when nothing is approved yet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodayPromptResponse {
    pub date: NaiveDate,
    pub prompt: Option<PromptInstance>,
}

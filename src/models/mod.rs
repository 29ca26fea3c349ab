pub mod feed;
pub mod profile;
pub mod prompt;
pub mod prompt_input;
pub mod submission;
pub mod submission_input;

pub use feed::{FeedItem, FeedResponse, FeedState, SortMode};
pub use profile::{Profile, ProfileStats};
pub use prompt::{Category, PromptInstance};
pub use prompt_input::{
    ApprovePromptInput, CandidatesResponse, GenerateCandidatesInput, TodayPromptResponse,
};
pub use submission::{Submission, SubmissionDetail, Visibility};
pub use submission_input::CreateSubmissionInput;

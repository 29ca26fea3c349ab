use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Renglon API",
        version = "1.0.0",
        description = "Backend API for the Renglon daily writing prompt service",
        contact(
            name = "API Support",
            email = "support@renglon.app"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Prompts
        crate::handlers::prompts_handler::generate_candidates,
        crate::handlers::prompts_handler::approve_prompt,
        crate::handlers::prompts_handler::get_today_prompt,
        crate::handlers::prompts_handler::get_upcoming_prompts,
        crate::handlers::prompts_handler::get_prompt_by_date,

        // Submissions
        crate::handlers::submissions_handler::create_submission,
        crate::handlers::submissions_handler::get_my_submissions,
        crate::handlers::submissions_handler::get_submission,

        // Feed
        crate::handlers::feed_handler::get_feed,

        // Profile
        crate::handlers::profile_handler::get_me,
        crate::handlers::profile_handler::get_my_stats,
    ),
    components(
        schemas(
            // Core models
            crate::models::Category,
            crate::models::PromptInstance,
            crate::models::Visibility,
            crate::models::Submission,
            crate::models::SubmissionDetail,
            crate::models::Profile,
            crate::models::ProfileStats,
            crate::models::SortMode,
            crate::models::FeedState,
            crate::models::FeedItem,
            crate::models::FeedResponse,

            // Input models
            crate::models::GenerateCandidatesInput,
            crate::models::CandidatesResponse,
            crate::models::ApprovePromptInput,
            crate::models::TodayPromptResponse,
            crate::models::CreateSubmissionInput,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "prompts", description = "Prompt calendar management"),
        (name = "submissions", description = "Submission ledger"),
        (name = "feed", description = "Daily reading feed"),
        (name = "profile", description = "Profile and writing stats"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub mod feed_handler;
pub mod health;
pub mod metrics;
pub mod profile_handler;
pub mod prompts_handler;
pub mod submissions_handler;

pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};

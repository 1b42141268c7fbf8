// Core algorithm exports
pub mod difficulty;
pub mod engine;
pub mod group;
pub mod scoring;

pub use difficulty::adjusted_difficulty;
pub use engine::{RecommendOptions, RecommendationEngine, DEFAULT_LIMIT};
pub use group::calculate_group_score;
pub use scoring::calculate_match_score;

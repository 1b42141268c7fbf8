//! GolfMatch API - AI-assisted golf course recommendation service
//!
//! This library provides the recommendation engine used by the GolfMatch
//! app: a weighted per-request scoring pipeline over the course catalog,
//! blending stylistic preference, handicap fit, social proof, course
//! conditions, live weather, and model-generated explanations.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    adjusted_difficulty, calculate_group_score, calculate_match_score, RecommendOptions,
    RecommendationEngine, DEFAULT_LIMIT,
};
pub use crate::models::{
    CandidateCourse, Course, Recommendation, Review, ScoringWeights, SentimentAnalysis, User,
    WeatherSnapshot,
};

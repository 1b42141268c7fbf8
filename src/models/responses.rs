use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    Course, CourseConditions, CurrentWeather, MatchFactor, Recommendation, Review,
    WeatherSnapshot,
};

/// Issued access/refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// User profile as returned by the API (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub handicap: Option<f64>,
    pub playing_style: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Course fields exposed on listings and inside recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub difficulty_rating: Option<f64>,
    pub price_range: Option<String>,
    pub vibe_tags: Vec<String>,
    pub description: Option<String>,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            location: course.location.clone(),
            difficulty_rating: course.difficulty_rating,
            price_range: course.price_range.clone(),
            vibe_tags: course.vibe_tags.clone(),
            description: course.description.clone(),
        }
    }
}

/// Review fields exposed on the course detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub sentiment_score: Option<f64>,
}

impl From<&Review> for ReviewSummary {
    fn from(review: &Review) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
            sentiment_score: review.sentiment_score,
        }
    }
}

/// Full course detail with reviews and a live forecast
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseSummary,
    pub features: Vec<String>,
    pub current_conditions: Option<CourseConditions>,
    pub weather_forecast: Option<WeatherSnapshot>,
    pub reviews: Vec<ReviewSummary>,
}

/// Acknowledgement for a submitted review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewResponse {
    pub message: String,
    pub review_id: i64,
}

/// One entry of the ranked recommendation list
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub course: CourseSummary,
    pub match_score: f64,
    pub reason: String,
    pub factors: Vec<MatchFactor>,
    pub adjusted_difficulty: f64,
    pub current_weather: Option<CurrentWeather>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            course: CourseSummary::from(&rec.course),
            match_score: rec.score,
            reason: rec.reason,
            factors: rec.factors,
            adjusted_difficulty: rec.adjusted_difficulty,
            current_weather: rec.weather.current,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    is_valid_playing_style, CandidateCourse, Course, CourseConditions, CurrentWeather,
    ForecastDay, MatchFactor, Recommendation, Review, ScoringWeights, SentimentAnalysis, User,
    WeatherSnapshot, DEFAULT_DIFFICULTY, PLAYING_STYLES,
};
pub use requests::{
    CourseFilterQuery, CreateReviewRequest, LoginRequest, RecommendationQuery, RegisterRequest,
    UpdateProfileRequest,
};
pub use responses::{
    CourseDetailResponse, CourseSummary, CreateReviewResponse, ErrorResponse, HealthResponse,
    ProfileResponse, RecommendationResponse, ReviewSummary, TokenResponse,
};

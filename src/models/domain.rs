use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty assumed for courses that have not been rated yet
pub const DEFAULT_DIFFICULTY: f64 = 5.0;

/// Playing styles accepted on user profiles
pub const PLAYING_STYLES: [&str; 4] = ["Competitive", "Scenic", "Social", "Challenging"];

/// Whether a profile's playing style is one of the accepted values
pub fn is_valid_playing_style(style: &str) -> bool {
    PLAYING_STYLES.contains(&style)
}

/// Registered player with golf-specific profile attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub handicap: Option<f64>,
    pub playing_style: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Operator-reported course conditions, refreshed out of band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConditions {
    /// Condition quality on a 0-10 scale
    pub quality: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Golf course with the attributes used for matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub difficulty_rating: Option<f64>,
    pub description: Option<String>,
    pub price_range: Option<String>,
    #[serde(default)]
    pub vibe_tags: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub current_conditions: Option<CourseConditions>,
    #[serde(default)]
    pub last_condition_update: Option<DateTime<Utc>>,
}

impl Course {
    /// Difficulty rating with the unrated-course default applied
    pub fn difficulty_or_default(&self) -> f64 {
        self.difficulty_rating.unwrap_or(DEFAULT_DIFFICULTY)
    }
}

/// Course review; sentiment fields are written once at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    /// Star rating, 1-5
    pub rating: i32,
    pub comment: String,
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub extracted_features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Structured result of running sentiment extraction over a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment_score: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub vibe_tags: Vec<String>,
}

impl Default for SentimentAnalysis {
    /// Neutral analysis used when the language model is unavailable
    fn default() -> Self {
        Self {
            sentiment_score: 0.0,
            features: Vec::new(),
            vibe_tags: Vec::new(),
        }
    }
}

/// Current conditions at a course location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub wind_mph: f64,
    pub precip_mm: f64,
    pub condition: String,
}

/// One day of the multi-day forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub max_temp_f: Option<f64>,
    pub min_temp_f: Option<f64>,
    pub chance_of_rain: Option<f64>,
    pub condition: Option<String>,
}

/// Forecast fetched per request; the empty snapshot is the degraded form
/// used when the weather service is unreachable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: Option<CurrentWeather>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    pub fn wind_mph(&self) -> f64 {
        self.current.as_ref().map_or(0.0, |c| c.wind_mph)
    }

    pub fn precip_mm(&self) -> f64 {
        self.current.as_ref().map_or(0.0, |c| c.precip_mm)
    }

    pub fn condition_text(&self) -> &str {
        self.current.as_ref().map_or("Unknown", |c| c.condition.as_str())
    }
}

/// Scoring component that contributed to a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    StyleMatch,
    DifficultyMatch,
    SocialProof,
    RecentConditions,
}

impl MatchFactor {
    pub fn label(&self) -> &'static str {
        match self {
            MatchFactor::StyleMatch => "style match",
            MatchFactor::DifficultyMatch => "difficulty fit",
            MatchFactor::SocialProof => "highly rated by players",
            MatchFactor::RecentConditions => "fresh course conditions",
        }
    }
}

/// Candidate course together with its review history
#[derive(Debug, Clone)]
pub struct CandidateCourse {
    pub course: Course,
    pub reviews: Vec<Review>,
}

/// Ranked recommendation produced for a single request
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub course: Course,
    pub score: f64,
    pub reason: String,
    pub factors: Vec<MatchFactor>,
    pub weather: WeatherSnapshot,
    pub adjusted_difficulty: f64,
}

/// Match score component weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub style: f64,
    pub difficulty: f64,
    pub social: f64,
    pub conditions: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            style: 0.3,
            difficulty: 0.3,
            social: 0.2,
            conditions: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playing_style_validation() {
        assert!(is_valid_playing_style("Scenic"));
        assert!(is_valid_playing_style("Competitive"));
        assert!(!is_valid_playing_style("Aggressive"));
        assert!(!is_valid_playing_style("scenic"));
    }

    #[test]
    fn test_weather_snapshot_defaults() {
        let empty = WeatherSnapshot::default();
        assert_eq!(empty.wind_mph(), 0.0);
        assert_eq!(empty.precip_mm(), 0.0);
        assert_eq!(empty.condition_text(), "Unknown");
    }
}


use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new user
///
/// The playing style value is checked against the accepted set in the
/// handler, on top of the derive-level validation here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(range(min = 0.0))]
    pub handicap: Option<f64>,
    pub playing_style: Option<String>,
}

/// Request to log in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(range(min = 0.0))]
    pub handicap: Option<f64>,
    pub playing_style: Option<String>,
}

/// Request to submit a course review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub course_id: i64,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
}

/// Query parameters for the course listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFilterQuery {
    pub location: Option<String>,
    pub vibe: Option<String>,
    pub min_rating: Option<f64>,
}

/// Query parameters for the recommendations endpoint
///
/// `handicaps` is a comma-separated list of floats, one per player in the
/// group, e.g. `?group_size=3&handicaps=8,15,22`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<u16>,
    pub group_size: Option<u16>,
    pub handicaps: Option<String>,
}

impl RecommendationQuery {
    /// Parse the comma-separated handicap list, dropping malformed entries
    pub fn parsed_handicaps(&self) -> Vec<f64> {
        self.handicaps
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|part| part.trim().parse::<f64>().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            username: "golfer42".to_string(),
            email: "golfer@example.com".to_string(),
            password: "longenough".to_string(),
            handicap: Some(12.5),
            playing_style: Some("Scenic".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            username: "golfer42".to_string(),
            email: "golfer@example.com".to_string(),
            password: "short".to_string(),
            handicap: None,
            playing_style: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_negative_handicap() {
        let req = RegisterRequest {
            username: "golfer42".to_string(),
            email: "golfer@example.com".to_string(),
            password: "longenough".to_string(),
            handicap: Some(-3.0),
            playing_style: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_review_request_rating_bounds() {
        let mut req = CreateReviewRequest {
            course_id: 1,
            rating: 5,
            comment: "Great greens".to_string(),
        };
        assert!(req.validate().is_ok());

        req.rating = 6;
        assert!(req.validate().is_err());

        req.rating = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_handicap_parsing() {
        let query = RecommendationQuery {
            limit: None,
            group_size: Some(3),
            handicaps: Some("8, 15,22.5".to_string()),
        };
        assert_eq!(query.parsed_handicaps(), vec![8.0, 15.0, 22.5]);

        let empty = RecommendationQuery {
            limit: None,
            group_size: None,
            handicaps: None,
        };
        assert!(empty.parsed_handicaps().is_empty());
    }
}

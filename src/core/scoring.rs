use chrono::{DateTime, Duration, Utc};

use crate::models::{Course, MatchFactor, Review, ScoringWeights, User};

/// Conditions older than this no longer earn the freshness bonus
const RECENT_CONDITIONS_MAX_AGE_DAYS: i64 = 2;

/// Calculate how well a course matches a single user's preferences
///
/// Scoring formula (with default weights):
/// score = style_match * 0.3          # playing style found in vibe tags
///       + difficulty_score * 0.3     # handicap vs. course difficulty
///       + (avg_rating / 5) * 0.2     # social proof from reviews
///       + (quality / 10) * 0.2       # freshly updated conditions
///
/// Each component contributes only when its inputs are present, so a sparse
/// profile simply scores lower instead of failing. Returns the score together
/// with the factors that fired, which feed the generated explanation.
pub fn calculate_match_score(
    user: &User,
    course: &Course,
    reviews: &[Review],
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> (f64, Vec<MatchFactor>) {
    let mut score = 0.0;
    let mut factors = Vec::new();

    // Style match
    if let Some(style) = &user.playing_style {
        if course
            .vibe_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(style))
        {
            score += weights.style;
            factors.push(MatchFactor::StyleMatch);
        }
    }

    // Difficulty match, scaled by how close the course sits to the
    // handicap-implied comfort zone
    if let (Some(handicap), Some(rating)) = (user.handicap, course.difficulty_rating) {
        let diff = (rating - handicap / 5.0).abs();
        let difficulty_score = (1.0 - diff / 10.0).max(0.0);
        score += weights.difficulty * difficulty_score;
        factors.push(MatchFactor::DifficultyMatch);
    }

    // Social proof from review ratings
    if !reviews.is_empty() {
        let avg_rating =
            reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64;
        score += weights.social * (avg_rating / 5.0);
        factors.push(MatchFactor::SocialProof);
    }

    // Freshness bonus for recently updated conditions
    if let (Some(conditions), Some(updated)) =
        (&course.current_conditions, course.last_condition_update)
    {
        if now - updated < Duration::days(RECENT_CONDITIONS_MAX_AGE_DAYS) {
            score += weights.conditions * (conditions.quality / 10.0);
            factors.push(MatchFactor::RecentConditions);
        }
    }

    (score, factors)
}

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;

use crate::core::{
    difficulty::adjusted_difficulty, group::calculate_group_score, scoring::calculate_match_score,
};
use crate::models::{
    CandidateCourse, Recommendation, Review, ScoringWeights, User, WeatherSnapshot,
};
use crate::services::openai::ExplanationContext;
use crate::services::{OpenAiClient, WeatherClient};

/// Recommendations returned when the caller does not ask for more
pub const DEFAULT_LIMIT: usize = 5;

/// Per-request recommendation parameters
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    pub limit: usize,
    pub group_size: usize,
    pub group_handicaps: Vec<f64>,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            group_size: 1,
            group_handicaps: Vec::new(),
        }
    }
}

/// Course ids the user has already rated below 3 stars
fn disliked_course_ids(user_reviews: &[Review]) -> HashSet<i64> {
    user_reviews
        .iter()
        .filter(|r| r.rating < 3)
        .map(|r| r.course_id)
        .collect()
}

/// Recommendation orchestrator
///
/// # Pipeline
/// 1. Drop courses the user already rated poorly
/// 2. Per candidate: fetch weather, score the match, blend in the group
///    score, adjust difficulty, generate an explanation
/// 3. Rank by score and truncate to the requested limit
///
/// Weather and explanation failures degrade per course; the engine itself
/// never fails. Per-candidate work runs concurrently but is joined in
/// candidate order, so ranking output is deterministic for deterministic
/// inputs.
pub struct RecommendationEngine {
    weather: Arc<WeatherClient>,
    openai: Arc<OpenAiClient>,
    weights: ScoringWeights,
}

impl RecommendationEngine {
    pub fn new(
        weather: Arc<WeatherClient>,
        openai: Arc<OpenAiClient>,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            weather,
            openai,
            weights,
        }
    }

    /// Produce ranked recommendations for a user or group
    ///
    /// `user_reviews` is the user's full review history; `candidates` is the
    /// course catalog with per-course reviews, loaded by the caller. Returns
    /// at most `opts.limit` entries, each fully populated (fallback text and
    /// empty weather where the external services failed).
    pub async fn recommend(
        &self,
        user: &User,
        user_reviews: &[Review],
        candidates: Vec<CandidateCourse>,
        opts: &RecommendOptions,
    ) -> Vec<Recommendation> {
        let disliked = disliked_course_ids(user_reviews);
        let now = Utc::now();
        let group_scoring = opts.group_size > 1 && !opts.group_handicaps.is_empty();

        let tasks = candidates
            .into_iter()
            .filter(|candidate| !disliked.contains(&candidate.course.id))
            .map(|candidate| self.evaluate(user, candidate, now, group_scoring, opts));

        let mut recommendations = join_all(tasks).await;

        // Stable sort: equal scores keep their candidate order
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(opts.limit);

        tracing::debug!(
            "Ranked {} recommendations for user {}",
            recommendations.len(),
            user.id
        );

        recommendations
    }

    /// Score a single candidate; external failures degrade, never propagate
    async fn evaluate(
        &self,
        user: &User,
        candidate: CandidateCourse,
        now: chrono::DateTime<Utc>,
        group_scoring: bool,
        opts: &RecommendOptions,
    ) -> Recommendation {
        let CandidateCourse { course, reviews } = candidate;

        let weather = match self.weather.fetch(&course.location).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Weather fetch failed for {}: {}", course.location, e);
                WeatherSnapshot::default()
            }
        };

        let (match_score, factors) =
            calculate_match_score(user, &course, &reviews, now, &self.weights);

        let score = if group_scoring {
            let group_score = calculate_group_score(&course, &opts.group_handicaps, &weather);
            (match_score + group_score) / 2.0
        } else {
            match_score
        };

        let adjusted_difficulty = adjusted_difficulty(&course, user, &weather);

        let reason = self
            .openai
            .generate_explanation(&ExplanationContext {
                course_name: &course.name,
                difficulty_rating: course.difficulty_rating,
                vibe_tags: &course.vibe_tags,
                handicap: user.handicap,
                playing_style: user.playing_style.as_deref(),
                group_size: opts.group_size,
                score,
                weather_condition: weather.condition_text(),
                factors: &factors,
            })
            .await;

        Recommendation {
            course,
            score,
            reason,
            factors,
            weather,
            adjusted_difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn review(course_id: i64, rating: i32) -> Review {
        Review {
            id: course_id * 10 + i64::from(rating),
            user_id: 1,
            course_id,
            rating,
            comment: String::new(),
            sentiment_score: None,
            extracted_features: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_disliked_excludes_low_ratings_only() {
        let reviews = vec![
            review(1, 1),
            review(2, 2),
            review(3, 3),
            review(4, 5),
        ];

        let disliked = disliked_course_ids(&reviews);

        assert!(disliked.contains(&1));
        assert!(disliked.contains(&2));
        assert!(!disliked.contains(&3));
        assert!(!disliked.contains(&4));
    }

    #[test]
    fn test_default_options() {
        let opts = RecommendOptions::default();
        assert_eq!(opts.limit, DEFAULT_LIMIT);
        assert_eq!(opts.group_size, 1);
        assert!(opts.group_handicaps.is_empty());
    }
}

use crate::models::{Course, WeatherSnapshot};

/// Widest handicap spread a course can reasonably accommodate
const MAX_HANDICAP_SPREAD: f64 = 36.0;

/// Calculate how suitable a course is for a group of players
///
/// Hard mismatches short-circuit before the spread-based score: a course
/// rated above max_handicap/4 is too punishing for the weakest player (0.3),
/// one rated below min_handicap/8 bores the strongest (0.5). Otherwise the
/// score falls linearly with the handicap spread and is deliberately left
/// unclamped so pathological spreads surface as negative scores. Rain costs
/// groups larger than two a 20% penalty.
pub fn calculate_group_score(
    course: &Course,
    group_handicaps: &[f64],
    weather: &WeatherSnapshot,
) -> f64 {
    if group_handicaps.is_empty() {
        return 0.0;
    }

    let min_handicap = group_handicaps.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_handicap = group_handicaps
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    let handicap_range = max_handicap - min_handicap;

    if let Some(rating) = course.difficulty_rating {
        if rating > max_handicap / 4.0 {
            return 0.3;
        }
        if rating < min_handicap / 8.0 {
            return 0.5;
        }
    }

    let mut base_score = 1.0 - handicap_range / MAX_HANDICAP_SPREAD;

    if group_handicaps.len() > 2 && weather.precip_mm() > 0.0 {
        base_score *= 0.8;
    }

    base_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrentWeather;

    fn test_course(difficulty: Option<f64>) -> Course {
        Course {
            id: 3,
            name: "Fairway Ridge".to_string(),
            location: "Austin, TX".to_string(),
            difficulty_rating: difficulty,
            description: None,
            price_range: None,
            vibe_tags: vec![],
            features: vec![],
            current_conditions: None,
            last_condition_update: None,
        }
    }

    fn rainy() -> WeatherSnapshot {
        WeatherSnapshot {
            current: Some(CurrentWeather {
                wind_mph: 5.0,
                precip_mm: 4.0,
                condition: "Light rain".to_string(),
            }),
            forecast: vec![],
        }
    }

    #[test]
    fn test_empty_group_scores_zero() {
        let score = calculate_group_score(&test_course(Some(5.0)), &[], &WeatherSnapshot::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_too_hard_short_circuits() {
        // 9 > 30/4 = 7.5, weather must not matter
        let handicaps = [5.0, 30.0];
        let dry = calculate_group_score(&test_course(Some(9.0)), &handicaps, &WeatherSnapshot::default());
        let wet = calculate_group_score(&test_course(Some(9.0)), &handicaps, &rainy());
        assert_eq!(dry, 0.3);
        assert_eq!(wet, 0.3);
    }

    #[test]
    fn test_too_easy_short_circuits() {
        // 2 < 20/8 = 2.5
        let handicaps = [20.0, 24.0];
        let score =
            calculate_group_score(&test_course(Some(2.0)), &handicaps, &WeatherSnapshot::default());
        assert_eq!(score, 0.5);
    }

    #[test]
    fn test_spread_based_score() {
        // Range 9: 1 - 9/36 = 0.75
        let handicaps = [9.0, 18.0];
        let score =
            calculate_group_score(&test_course(Some(4.0)), &handicaps, &WeatherSnapshot::default());
        assert!((score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_unrated_course_skips_difficulty_gates() {
        let handicaps = [9.0, 18.0];
        let score =
            calculate_group_score(&test_course(None), &handicaps, &WeatherSnapshot::default());
        assert!((score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_rain_penalty_large_groups_only() {
        let course = test_course(Some(4.0));
        let pair = [16.0, 20.0];
        let foursome = [16.0, 18.0, 19.0, 20.0];

        // Two players: no penalty even in rain
        let pair_score = calculate_group_score(&course, &pair, &rainy());
        assert!((pair_score - (1.0 - 4.0 / 36.0)).abs() < 1e-9);

        // Four players in rain: 20% penalty
        let four_score = calculate_group_score(&course, &foursome, &rainy());
        assert!((four_score - (1.0 - 4.0 / 36.0) * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_pathological_spread_goes_negative() {
        let handicaps = [0.0, 40.0];
        let score =
            calculate_group_score(&test_course(Some(4.0)), &handicaps, &WeatherSnapshot::default());
        assert!(score < 0.0);
    }
}

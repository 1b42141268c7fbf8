use crate::models::{Course, User, WeatherSnapshot};

/// Wind speed above which a course plays noticeably harder
const STRONG_WIND_MPH: f64 = 15.0;

/// Calculate the difficulty a course will play at for a given user in the
/// current weather
///
/// Formula:
/// adjusted = base_difficulty * handicap_factor * weather_factor
///
/// - base_difficulty defaults to 5.0 for unrated courses
/// - handicap_factor: 1.2 above handicap 20, 0.8 below 10, otherwise 1.0
/// - weather_factor: *1.2 in strong wind, *1.1 in rain (both may apply)
///
/// The result is clamped to the 1-10 difficulty scale. Never fails; missing
/// inputs leave their factor at 1.0.
pub fn adjusted_difficulty(course: &Course, user: &User, weather: &WeatherSnapshot) -> f64 {
    let base = course.difficulty_or_default();

    let handicap_factor = match user.handicap {
        Some(handicap) if handicap > 20.0 => 1.2,
        Some(handicap) if handicap < 10.0 => 0.8,
        _ => 1.0,
    };

    let mut weather_factor = 1.0;
    if weather.wind_mph() > STRONG_WIND_MPH {
        weather_factor *= 1.2;
    }
    if weather.precip_mm() > 0.0 {
        weather_factor *= 1.1;
    }

    (base * handicap_factor * weather_factor).clamp(1.0, 10.0)
}

// End-to-end tests for the recommendation engine over mocked HTTP boundaries

use std::sync::Arc;

use chrono::Utc;
use golfmatch_api::core::{RecommendOptions, RecommendationEngine};
use golfmatch_api::models::{
    CandidateCourse, Course, Review, ScoringWeights, User,
};
use golfmatch_api::services::{OpenAiClient, WeatherClient, FALLBACK_EXPLANATION};

fn test_user(handicap: Option<f64>, style: Option<&str>) -> User {
    User {
        id: 1,
        username: "golfer".to_string(),
        email: "golfer@example.com".to_string(),
        password_hash: "hash".to_string(),
        handicap,
        playing_style: style.map(String::from),
        created_at: Utc::now(),
    }
}

fn course(id: i64, name: &str, difficulty: Option<f64>, vibe_tags: &[&str]) -> Course {
    Course {
        id,
        name: name.to_string(),
        location: format!("{} Valley, CA", name),
        difficulty_rating: difficulty,
        description: None,
        price_range: None,
        vibe_tags: vibe_tags.iter().map(|t| t.to_string()).collect(),
        features: vec![],
        current_conditions: None,
        last_condition_update: None,
    }
}

fn review(course_id: i64, user_id: i64, rating: i32) -> Review {
    Review {
        id: course_id * 100 + user_id,
        user_id,
        course_id,
        rating,
        comment: "a round to remember".to_string(),
        sentiment_score: None,
        extracted_features: vec![],
        created_at: Utc::now(),
    }
}

fn candidate(course: Course, reviews: Vec<Review>) -> CandidateCourse {
    CandidateCourse { course, reviews }
}

const CALM_FORECAST: &str = r#"{
    "current": {"wind_mph": 3.0, "precip_mm": 0.0, "condition": {"text": "Sunny"}},
    "forecast": {"forecastday": []}
}"#;

fn completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

/// Engine wired against two mockito servers (weather + completions)
async fn engine_with_mocks(
    weather_server: &mockito::ServerGuard,
    openai_server: &mockito::ServerGuard,
) -> RecommendationEngine {
    let weather = Arc::new(WeatherClient::new(
        weather_server.url(),
        "test_key".to_string(),
        7,
    ));
    let openai = Arc::new(OpenAiClient::new(
        openai_server.url(),
        "test_key".to_string(),
        "gpt-4".to_string(),
    ));

    RecommendationEngine::new(weather, openai, ScoringWeights::default())
}

async fn mock_calm_weather(server: &mut mockito::ServerGuard) {
    server
        .mock("GET", "/forecast.json")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CALM_FORECAST)
        .create_async()
        .await;
}

async fn mock_explanation(server: &mut mockito::ServerGuard, text: &str) {
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(text))
        .create_async()
        .await;
}

#[tokio::test]
async fn test_end_to_end_ranking_limit_and_exclusion() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut openai_server = mockito::Server::new_async().await;
    mock_calm_weather(&mut weather_server).await;
    mock_explanation(&mut openai_server, "A great fit for your game.").await;

    let engine = engine_with_mocks(&weather_server, &openai_server).await;
    let user = test_user(Some(15.0), Some("Scenic"));

    // Course 1 is the strong match, course 2 weaker, course 3 was disliked
    let candidates = vec![
        candidate(
            course(1, "Cypress", Some(6.0), &["scenic", "challenging"]),
            vec![review(1, 50, 4), review(1, 51, 4), review(1, 52, 4)],
        ),
        candidate(course(2, "Willow", Some(5.0), &[]), vec![]),
        candidate(course(3, "Dunes", Some(4.0), &["scenic"]), vec![]),
    ];
    let user_reviews = vec![review(3, 1, 2)];

    let opts = RecommendOptions {
        limit: 5,
        group_size: 1,
        group_handicaps: vec![],
    };

    let recommendations = engine.recommend(&user, &user_reviews, candidates, &opts).await;

    assert_eq!(recommendations.len(), 2, "disliked course must be excluded");
    assert_eq!(recommendations[0].course.id, 1);
    assert_eq!(recommendations[1].course.id, 2);

    // 0.3 + 0.3 * 0.7 + 0.2 * 0.8 = 0.67
    assert!((recommendations[0].score - 0.67).abs() < 1e-9);
    // difficulty only: 0.3 * (1 - |5 - 3| / 10) = 0.24
    assert!((recommendations[1].score - 0.24).abs() < 1e-9);

    for rec in &recommendations {
        assert_eq!(rec.reason, "A great fit for your game.");
        assert!(rec.weather.current.is_some());
        assert!((1.0..=10.0).contains(&rec.adjusted_difficulty));
    }
}

#[tokio::test]
async fn test_recommend_is_deterministic() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut openai_server = mockito::Server::new_async().await;
    mock_calm_weather(&mut weather_server).await;
    mock_explanation(&mut openai_server, "Steady conditions, solid pick.").await;

    let engine = engine_with_mocks(&weather_server, &openai_server).await;
    let user = test_user(Some(10.0), Some("Social"));

    let make_candidates = || {
        vec![
            candidate(course(1, "Cypress", Some(5.0), &["social"]), vec![review(1, 50, 5)]),
            candidate(course(2, "Willow", Some(5.0), &["social"]), vec![review(2, 51, 5)]),
            candidate(course(3, "Dunes", Some(7.0), &[]), vec![]),
        ]
    };

    let opts = RecommendOptions::default();

    let first = engine.recommend(&user, &[], make_candidates(), &opts).await;
    let second = engine.recommend(&user, &[], make_candidates(), &opts).await;

    let ids = |recs: &[golfmatch_api::models::Recommendation]| {
        recs.iter().map(|r| r.course.id).collect::<Vec<_>>()
    };
    let scores = |recs: &[golfmatch_api::models::Recommendation]| {
        recs.iter().map(|r| r.score).collect::<Vec<_>>()
    };

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(scores(&first), scores(&second));

    // Equal-scored courses 1 and 2 keep catalog order (stable sort)
    assert_eq!(ids(&first)[..2], [1, 2]);
}

#[tokio::test]
async fn test_weather_failure_degrades_per_course() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut openai_server = mockito::Server::new_async().await;

    weather_server
        .mock("GET", "/forecast.json")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .create_async()
        .await;
    mock_explanation(&mut openai_server, "Trust the catalog on this one.").await;

    let engine = engine_with_mocks(&weather_server, &openai_server).await;
    let user = test_user(Some(15.0), None);

    let candidates = vec![candidate(course(1, "Cypress", Some(6.0), &[]), vec![])];
    let opts = RecommendOptions::default();

    let recommendations = engine.recommend(&user, &[], candidates, &opts).await;

    assert_eq!(recommendations.len(), 1);
    let rec = &recommendations[0];

    // Empty snapshot: no weather factors anywhere
    assert!(rec.weather.current.is_none());
    assert_eq!(rec.adjusted_difficulty, 6.0);
    assert!((rec.score - 0.3 * 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn test_explanation_failure_uses_fallback() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut openai_server = mockito::Server::new_async().await;

    mock_calm_weather(&mut weather_server).await;
    openai_server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .create_async()
        .await;

    let engine = engine_with_mocks(&weather_server, &openai_server).await;
    let user = test_user(Some(15.0), Some("Scenic"));

    let candidates = vec![candidate(course(1, "Cypress", Some(6.0), &["scenic"]), vec![])];
    let opts = RecommendOptions::default();

    let recommendations = engine.recommend(&user, &[], candidates, &opts).await;

    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].reason, FALLBACK_EXPLANATION);
}

#[tokio::test]
async fn test_group_score_blending() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut openai_server = mockito::Server::new_async().await;
    mock_calm_weather(&mut weather_server).await;
    mock_explanation(&mut openai_server, "Works for the whole group.").await;

    let engine = engine_with_mocks(&weather_server, &openai_server).await;
    // No handicap or style: the solo match score is 0
    let user = test_user(None, None);

    // difficulty 9 > 30/4: group score short-circuits to 0.3
    let candidates = vec![candidate(course(1, "Gauntlet", Some(9.0), &[]), vec![])];
    let opts = RecommendOptions {
        limit: 5,
        group_size: 2,
        group_handicaps: vec![5.0, 30.0],
    };

    let recommendations = engine.recommend(&user, &[], candidates, &opts).await;

    assert_eq!(recommendations.len(), 1);
    // effective = (0.0 + 0.3) / 2
    assert!((recommendations[0].score - 0.15).abs() < 1e-9);
}

#[tokio::test]
async fn test_limit_is_respected() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut openai_server = mockito::Server::new_async().await;
    mock_calm_weather(&mut weather_server).await;
    mock_explanation(&mut openai_server, "Plenty of golf to go around.").await;

    let engine = engine_with_mocks(&weather_server, &openai_server).await;
    let user = test_user(Some(12.0), None);

    let make_candidates = |n: i64| {
        (1..=n)
            .map(|id| candidate(course(id, "Course", Some(5.0), &[]), vec![]))
            .collect::<Vec<_>>()
    };

    // More candidates than the limit
    let opts = RecommendOptions {
        limit: 5,
        group_size: 1,
        group_handicaps: vec![],
    };
    let recommendations = engine.recommend(&user, &[], make_candidates(8), &opts).await;
    assert_eq!(recommendations.len(), 5);

    // Fewer candidates than the limit
    let recommendations = engine.recommend(&user, &[], make_candidates(3), &opts).await;
    assert_eq!(recommendations.len(), 3);

    // No candidates at all
    let recommendations = engine.recommend(&user, &[], vec![], &opts).await;
    assert!(recommendations.is_empty());
}

use actix_web::{web, HttpResponse, Responder};

use crate::models::{
    Course, CourseDetailResponse, CourseFilterQuery, CourseSummary, ErrorResponse, ReviewSummary,
    WeatherSnapshot,
};
use crate::routes::AppState;
use crate::services::{CacheKey, PostgresError};

/// Configure course browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/courses", web::get().to(list_courses))
        .route("/courses/{course_id}", web::get().to(get_course));
}

fn matches_filters(course: &Course, query: &CourseFilterQuery) -> bool {
    if let Some(location) = &query.location {
        if !course
            .location
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }

    if let Some(vibe) = &query.vibe {
        if !course.vibe_tags.iter().any(|tag| tag.eq_ignore_ascii_case(vibe)) {
            return false;
        }
    }

    if let Some(min_rating) = query.min_rating {
        if course.difficulty_rating.map_or(true, |r| r < min_rating) {
            return false;
        }
    }

    true
}

/// List courses with optional filtering
///
/// GET /api/v1/courses?location=&vibe=&min_rating=
async fn list_courses(
    state: web::Data<AppState>,
    query: web::Query<CourseFilterQuery>,
) -> impl Responder {
    let cache_key = CacheKey::course_list(
        query.location.as_deref(),
        query.vibe.as_deref(),
        query.min_rating,
    );

    if let Ok(cached) = state.cache.get::<Vec<CourseSummary>>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    let courses = match state.postgres.list_courses().await {
        Ok(courses) => courses,
        Err(e) => {
            tracing::error!("Failed to fetch courses: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error fetching courses".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let summaries: Vec<CourseSummary> = courses
        .iter()
        .filter(|course| matches_filters(course, &query))
        .map(CourseSummary::from)
        .collect();

    if let Err(e) = state.cache.set(&cache_key, &summaries).await {
        tracing::warn!("Failed to cache course listing: {}", e);
    }

    HttpResponse::Ok().json(summaries)
}

/// Get detailed information about a specific course
///
/// GET /api/v1/courses/{course_id}
async fn get_course(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let course_id = path.into_inner();

    let course = match state.postgres.get_course(course_id).await {
        Ok(course) => course,
        Err(PostgresError::NotFound(message)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Course not found".to_string(),
                message,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch course {}: {}", course_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error fetching course details".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let reviews = match state.postgres.reviews_by_course(course_id).await {
        Ok(reviews) => reviews,
        Err(e) => {
            tracing::error!("Failed to fetch reviews for course {}: {}", course_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error fetching course details".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Live forecast for the detail view; failures degrade to no forecast
    let weather_key = CacheKey::weather(&course.location);
    let weather = match state.cache.get::<WeatherSnapshot>(&weather_key).await {
        Ok(snapshot) => Some(snapshot),
        Err(_) => match state.weather.fetch(&course.location).await {
            Ok(snapshot) => {
                if let Err(e) = state.cache.set(&weather_key, &snapshot).await {
                    tracing::warn!("Failed to cache forecast: {}", e);
                }
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("Weather fetch failed for {}: {}", course.location, e);
                None
            }
        },
    };

    let response = CourseDetailResponse {
        course: CourseSummary::from(&course),
        features: course.features.clone(),
        current_conditions: course.current_conditions.clone(),
        weather_forecast: weather,
        reviews: reviews.iter().map(ReviewSummary::from).collect(),
    };

    HttpResponse::Ok().json(response)
}

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::core::RecommendOptions;
use crate::models::{ErrorResponse, RecommendationQuery, RecommendationResponse};
use crate::routes::AppState;
use crate::services::PostgresError;

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/recommendations", web::get().to(get_recommendations));
}

/// Get personalized course recommendations for the current user
///
/// GET /api/v1/recommendations?limit=&group_size=&handicaps=8,15,22
///
/// Loading the user or the candidate catalog is fatal; weather and
/// explanation failures degrade per course inside the engine.
async fn get_recommendations(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    query: web::Query<RecommendationQuery>,
) -> impl Responder {
    let user_id = match state.auth.authenticate(&http_req) {
        Ok(id) => id,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    let limit = query
        .limit
        .unwrap_or(state.recommendation.default_limit)
        .min(state.recommendation.max_limit) as usize;
    let group_size = usize::from(query.group_size.unwrap_or(1));
    let group_handicaps = query.parsed_handicaps();

    tracing::info!(
        "Generating recommendations for user {} (limit: {}, group size: {})",
        user_id,
        limit,
        group_size
    );

    let user = match state.postgres.get_user(user_id).await {
        Ok(user) => user,
        Err(PostgresError::NotFound(message)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error generating recommendations".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let user_reviews = match state.postgres.reviews_by_user(user_id).await {
        Ok(reviews) => reviews,
        Err(e) => {
            tracing::error!("Failed to fetch review history for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error generating recommendations".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let candidates = match state.postgres.load_candidates().await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidate courses: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error generating recommendations".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let opts = RecommendOptions {
        limit,
        group_size,
        group_handicaps,
    };

    let recommendations = state
        .engine
        .recommend(&user, &user_reviews, candidates, &opts)
        .await;

    tracing::info!(
        "Returning {} recommendations for user {}",
        recommendations.len(),
        user_id
    );

    let response: Vec<RecommendationResponse> = recommendations
        .into_iter()
        .map(RecommendationResponse::from)
        .collect();

    HttpResponse::Ok().json(response)
}

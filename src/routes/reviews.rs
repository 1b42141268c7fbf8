use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{CreateReviewRequest, CreateReviewResponse, ErrorResponse};
use crate::routes::AppState;
use crate::services::PostgresError;

/// Configure review routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reviews", web::post().to(create_review));
}

/// Submit a new course review
///
/// POST /api/v1/reviews
///
/// Runs sentiment extraction over the comment before persisting; a failed
/// analysis degrades to neutral values and never blocks the submission.
async fn create_review(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<CreateReviewRequest>,
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

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // The reviewed course must exist
    if let Err(e) = state.postgres.get_course(req.course_id).await {
        return match e {
            PostgresError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
                error: "Course not found".to_string(),
                message,
                status_code: 404,
            }),
            _ => {
                tracing::error!("Failed to fetch course {}: {}", req.course_id, e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error submitting review".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                })
            }
        };
    }

    let sentiment = state.openai.analyze_review_sentiment(&req.comment).await;

    match state
        .postgres
        .create_review(user_id, req.course_id, req.rating, &req.comment, &sentiment)
        .await
    {
        Ok(review) => {
            tracing::info!(
                "User {} reviewed course {} ({} stars)",
                user_id,
                req.course_id,
                req.rating
            );

            HttpResponse::Created().json(CreateReviewResponse {
                message: "Review submitted successfully".to_string(),
                review_id: review.id,
            })
        }
        Err(e) => {
            tracing::error!("Failed to create review: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Error submitting review".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

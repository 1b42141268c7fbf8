// Route exports
pub mod auth;
pub mod courses;
pub mod recommendations;
pub mod reviews;

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::auth::Authenticator;
use crate::config::RecommendationSettings;
use crate::core::RecommendationEngine;
use crate::models::HealthResponse;
use crate::services::{CacheManager, OpenAiClient, PostgresClient, WeatherClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub weather: Arc<WeatherClient>,
    pub openai: Arc<OpenAiClient>,
    pub engine: Arc<RecommendationEngine>,
    pub auth: Arc<Authenticator>,
    pub recommendation: RecommendationSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(auth::configure)
            .configure(courses::configure)
            .configure(reviews::configure)
            .configure(recommendations::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::models::HealthResponse;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
